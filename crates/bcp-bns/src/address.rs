//! BNS bech32 addresses.
//!
//! An address is the first 20 bytes of `SHA-256("sigs/ed25519/" || pubkey)`
//! encoded as bech32 (not bech32m) with a chain-dependent prefix.

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};

use bcp_core::crypto::sha256;
use bcp_core::error::CodecError;
use bcp_core::types::{Address, Algorithm, ChainId, Identity};

pub const ADDRESS_LENGTH: usize = 20;

const ED25519_CONDITION_PREFIX: &[u8] = b"sigs/ed25519/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressPrefix {
    Iov,
    Tiov,
}

impl AddressPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iov => "iov",
            Self::Tiov => "tiov",
        }
    }

    fn parse(hrp: &str) -> Option<Self> {
        match hrp {
            "iov" => Some(Self::Iov),
            "tiov" => Some(Self::Tiov),
            _ => None,
        }
    }
}

/// Mainnet chains use `iov`, everything else `tiov`.
pub fn address_prefix(chain_id: &ChainId) -> AddressPrefix {
    if chain_id.as_str().starts_with("iov-mainnet") {
        AddressPrefix::Iov
    } else {
        AddressPrefix::Tiov
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAddress {
    pub prefix: AddressPrefix,
    pub data: [u8; ADDRESS_LENGTH],
}

pub fn encode_bns_address(prefix: AddressPrefix, data: &[u8]) -> Result<Address, CodecError> {
    if data.len() != ADDRESS_LENGTH {
        return Err(CodecError::Validation(format!(
            "invalid address length: expected {ADDRESS_LENGTH}, got {}",
            data.len()
        )));
    }
    let hrp = Hrp::parse(prefix.as_str()).map_err(|e| CodecError::Validation(e.to_string()))?;
    let encoded = bech32::encode::<Bech32>(hrp, data).map_err(|e| CodecError::Validation(e.to_string()))?;
    Ok(Address(encoded))
}

pub fn decode_bns_address(address: &Address) -> Result<DecodedAddress, CodecError> {
    let checked = CheckedHrpstring::new::<Bech32>(address.as_str())
        .map_err(|e| CodecError::Validation(format!("invalid bech32 address {address}: {e}")))?;
    let hrp = checked.hrp().to_lowercase();
    let prefix = AddressPrefix::parse(&hrp)
        .ok_or_else(|| CodecError::Validation(format!("invalid address prefix: {hrp}")))?;
    let bytes: Vec<u8> = checked.byte_iter().collect();
    let data: [u8; ADDRESS_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
        CodecError::Validation(format!(
            "invalid address length: expected {ADDRESS_LENGTH}, got {}",
            bytes.len()
        ))
    })?;
    Ok(DecodedAddress { prefix, data })
}

pub fn is_valid_address(address: &str) -> bool {
    decode_bns_address(&Address::new(address)).is_ok()
}

/// Raw 20-byte address of an ed25519 public key.
pub fn pubkey_to_address_bytes(pubkey: &[u8]) -> [u8; ADDRESS_LENGTH] {
    let mut condition = Vec::with_capacity(ED25519_CONDITION_PREFIX.len() + pubkey.len());
    condition.extend_from_slice(ED25519_CONDITION_PREFIX);
    condition.extend_from_slice(pubkey);
    let hash = sha256(&condition);
    let mut out = [0u8; ADDRESS_LENGTH];
    out.copy_from_slice(&hash[..ADDRESS_LENGTH]);
    out
}

pub fn identity_to_address(identity: &Identity) -> Result<Address, CodecError> {
    if identity.pubkey.algo != Algorithm::Ed25519 {
        return Err(CodecError::Validation(format!(
            "unsupported algorithm: {}",
            identity.pubkey.algo
        )));
    }
    encode_bns_address(address_prefix(&identity.chain_id), &pubkey_to_address_bytes(&identity.pubkey.data))
}

/// Decodes and returns the raw bytes, ignoring the prefix.
pub(crate) fn address_bytes(address: &Address) -> Result<Vec<u8>, CodecError> {
    Ok(decode_bns_address(address)?.data.to_vec())
}

/// Decodes an address that must carry the prefix of `chain_id`.
pub(crate) fn chain_address(address: &Address, chain_id: &ChainId) -> Result<DecodedAddress, CodecError> {
    let decoded = decode_bns_address(address)?;
    let expected = address_prefix(chain_id);
    if decoded.prefix != expected {
        return Err(CodecError::Validation(format!(
            "address {address} has prefix {} but chain {chain_id} uses {}",
            decoded.prefix.as_str(),
            expected.as_str()
        )));
    }
    Ok(decoded)
}
