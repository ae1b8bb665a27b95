//! Primitive value types shared by all chains.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::validate_quantity;
use crate::error::DecimalError;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_newtype!(
    /// Identifier of a blockchain, e.g. `iov-mainnet` or `ethereum-eip155-1`.
    ChainId
);
string_newtype!(
    /// Chain-native textual address.
    Address
);
string_newtype!(TokenTicker);
string_newtype!(
    /// Chain-specific transaction hash in its canonical text form.
    TransactionId
);

/// Bytes accepted by a chain's RPC layer for broadcasting.
pub type PostableBytes = Vec<u8>;

/// Per-account replay protection counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nonce(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Ed25519,
    Secp256k1,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519 => f.write_str("ed25519"),
            Self::Secp256k1 => f.write_str("secp256k1"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubkeyBundle {
    pub algo: Algorithm,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl PubkeyBundle {
    pub fn ed25519(data: impl Into<Vec<u8>>) -> Self {
        Self { algo: Algorithm::Ed25519, data: data.into() }
    }

    pub fn secp256k1(data: impl Into<Vec<u8>>) -> Self {
        Self { algo: Algorithm::Secp256k1, data: data.into() }
    }
}

impl fmt::Debug for PubkeyBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubkeyBundle({}:{})", self.algo, hex::encode(&self.data))
    }
}

/// A public key bound to one chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub chain_id: ChainId,
    pub pubkey: PubkeyBundle,
}

impl Identity {
    pub fn new(chain_id: ChainId, pubkey: PubkeyBundle) -> Self {
        Self { chain_id, pubkey }
    }
}

/// A token quantity in atomic units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    pub quantity: String,
    pub fractional_digits: u32,
    pub token_ticker: TokenTicker,
}

impl Amount {
    pub fn new(
        quantity: impl Into<String>,
        fractional_digits: u32,
        token_ticker: impl Into<String>,
    ) -> Result<Self, DecimalError> {
        let quantity = quantity.into();
        validate_quantity(&quantity)?;
        Ok(Self { quantity, fractional_digits, token_ticker: TokenTicker(token_ticker.into()) })
    }
}

/// Transaction fee. BNS charges `tokens`, Ethereum prices gas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub tokens: Option<Amount>,
    pub gas_price: Option<Amount>,
    pub gas_limit: Option<u64>,
}

impl Fee {
    pub fn tokens(amount: Amount) -> Self {
        Self { tokens: Some(amount), ..Self::default() }
    }

    pub fn gas(gas_price: Amount, gas_limit: u64) -> Self {
        Self { tokens: None, gas_price: Some(gas_price), gas_limit: Some(gas_limit) }
    }
}

/// Swap identifier. Chains assign it on offer, so it is opaque bytes here.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapId(#[serde(with = "hex_bytes")] pub Vec<u8>);

impl SwapId {
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SwapId({})", self.to_hex())
    }
}

/// Point after which an open swap may be aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapTimeout {
    /// Unix time in seconds.
    Timestamp(i64),
    Height(u64),
}

/// Hash function applied to signing bytes before the curve operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrehashType {
    None,
    Sha256,
    Sha512,
    Keccak256,
}

/// Canonical bytes to sign together with the prehash the chain expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningJob {
    pub bytes: Vec<u8>,
    pub prehash_type: PrehashType,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullSignature {
    pub nonce: Nonce,
    pub pubkey: PubkeyBundle,
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

impl fmt::Debug for FullSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullSignature")
            .field("nonce", &self.nonce)
            .field("pubkey", &self.pubkey)
            .field("signature", &hex::encode(&self.signature))
            .finish()
    }
}

/// Serde adapter storing byte vectors as lowercase hex strings.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}
