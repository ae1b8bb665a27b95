//! HD wallets: one BIP-39 mnemonic, identities derived along SLIP-10 paths.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use bcp_core::types::{ChainId, Identity, PrehashType, PubkeyBundle};

use crate::error::WalletError;
use crate::hdpaths::{Slip10RawIndex, path_to_string};
use crate::mnemonic::{Bip39Seed, EnglishMnemonic};
use crate::signing::{ed25519_pubkey, secp256k1_pubkey, sign_ed25519, sign_secp256k1};
use crate::slip10::{Slip10Curve, derive_path};
use crate::wallet::{IdentityBook, IdentityOptions, LocalIdentity, Wallet, WalletId};

pub const ED25519_HD_IMPLEMENTATION_ID: &str = "ed25519-hd";
pub const SECP256K1_HD_IMPLEMENTATION_ID: &str = "secp256k1-hd";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentitySerialization {
    local_identity: LocalIdentity,
    privkey_path: Vec<Slip10RawIndex>,
}

#[derive(Serialize, Deserialize)]
struct WalletSerialization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<WalletId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    secret: String,
    curve: Slip10Curve,
    identities: Vec<IdentitySerialization>,
}

#[derive(Debug, Clone)]
pub struct Slip10Wallet {
    id: WalletId,
    label: Option<String>,
    curve: Slip10Curve,
    secret: EnglishMnemonic,
    seed: Bip39Seed,
    book: IdentityBook<Vec<Slip10RawIndex>>,
}

impl Slip10Wallet {
    fn from_secret(curve: Slip10Curve, secret: EnglishMnemonic) -> Self {
        let seed = secret.to_seed();
        Self { id: WalletId::generate(), label: None, curve, secret, seed, book: IdentityBook::default() }
    }

    pub fn from_mnemonic(curve: Slip10Curve, phrase: &str) -> Result<Self, WalletError> {
        Ok(Self::from_secret(curve, EnglishMnemonic::parse(phrase)?))
    }

    pub fn from_entropy(curve: Slip10Curve, entropy: &[u8]) -> Result<Self, WalletError> {
        Ok(Self::from_secret(curve, EnglishMnemonic::from_entropy(entropy)?))
    }

    pub fn generate(curve: Slip10Curve, word_count: usize) -> Result<Self, WalletError> {
        Ok(Self::from_secret(curve, EnglishMnemonic::generate(word_count)?))
    }

    pub fn curve(&self) -> Slip10Curve {
        self.curve
    }

    pub fn deserialize(data: &str) -> Result<Self, WalletError> {
        let parsed: WalletSerialization = serde_json::from_str(data)?;
        let mut wallet = Self::from_secret(parsed.curve, EnglishMnemonic::parse(&parsed.secret)?);
        if let Some(id) = parsed.id {
            wallet.id = id;
        }
        wallet.label = parsed.label;
        for entry in parsed.identities {
            if wallet.pubkey_at(&entry.privkey_path)? != entry.local_identity.pubkey {
                return Err(WalletError::Serialization(format!(
                    "stored pubkey does not match derivation path {}",
                    path_to_string(&entry.privkey_path)
                )));
            }
            wallet.book.insert(entry.local_identity, entry.privkey_path)?;
        }
        Ok(wallet)
    }

    fn pubkey_at(&self, path: &[Slip10RawIndex]) -> Result<PubkeyBundle, WalletError> {
        let node = derive_path(self.curve, self.seed.as_bytes(), path)?;
        Ok(match self.curve {
            Slip10Curve::Ed25519 => PubkeyBundle::ed25519(ed25519_pubkey(&node.private_key)?),
            Slip10Curve::Secp256k1 => PubkeyBundle::secp256k1(secp256k1_pubkey(&node.private_key)?),
        })
    }
}

#[async_trait]
impl Wallet for Slip10Wallet {
    fn id(&self) -> &WalletId {
        &self.id
    }

    fn implementation_id(&self) -> &'static str {
        match self.curve {
            Slip10Curve::Ed25519 => ED25519_HD_IMPLEMENTATION_ID,
            Slip10Curve::Secp256k1 => SECP256K1_HD_IMPLEMENTATION_ID,
        }
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    async fn create_identity(
        &mut self,
        chain_id: &ChainId,
        options: IdentityOptions,
    ) -> Result<LocalIdentity, WalletError> {
        let IdentityOptions::Path(path) = options else {
            return Err(WalletError::UnsupportedOptions("HD wallet needs a derivation path".into()));
        };
        let identity = LocalIdentity::new(chain_id.clone(), self.pubkey_at(&path)?);
        debug!(wallet = %self.id, chain_id = %chain_id, path = %path_to_string(&path), "hd: identity created");
        self.book.insert(identity.clone(), path)?;
        Ok(identity)
    }

    fn identities(&self) -> Vec<LocalIdentity> {
        self.book.identities()
    }

    fn set_identity_label(&mut self, identity: &Identity, label: Option<String>) -> Result<(), WalletError> {
        self.book.set_label(identity, label)
    }

    fn can_sign(&self) -> bool {
        true
    }

    async fn create_transaction_signature(
        &self,
        identity: &Identity,
        bytes: &[u8],
        prehash_type: PrehashType,
    ) -> Result<Vec<u8>, WalletError> {
        let path = self.book.get(identity)?;
        let node = derive_path(self.curve, self.seed.as_bytes(), path)?;
        match self.curve {
            Slip10Curve::Ed25519 => sign_ed25519(&node.private_key, bytes, prehash_type),
            Slip10Curve::Secp256k1 => sign_secp256k1(&node.private_key, bytes, prehash_type),
        }
    }

    /// The mnemonic.
    fn printable_secret(&self) -> Result<String, WalletError> {
        Ok(self.secret.to_string())
    }

    fn serialize(&self) -> Result<String, WalletError> {
        let identities = self
            .book
            .iter()
            .map(|(identity, path)| IdentitySerialization {
                local_identity: identity.clone(),
                privkey_path: path.clone(),
            })
            .collect();
        let out = WalletSerialization {
            id: Some(self.id.clone()),
            label: self.label.clone(),
            secret: self.secret.to_string(),
            curve: self.curve,
            identities,
        };
        Ok(serde_json::to_string(&out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hdpaths::HdPaths;

    const PHRASE: &str = "melt wisdom mesh wash item catalog talk enjoy gaze hat brush wash";

    fn chain() -> ChainId {
        ChainId::new("test-chain")
    }

    #[tokio::test]
    async fn ed25519_hd_known_identities() {
        let mut wallet = Slip10Wallet::from_mnemonic(Slip10Curve::Ed25519, PHRASE).unwrap();
        assert_eq!(wallet.implementation_id(), "ed25519-hd");
        let iov = wallet.create_identity(&chain(), HdPaths::iov(0).unwrap().into()).await.unwrap();
        assert_eq!(hex::encode(&iov.pubkey.data), "067f0fb9d44c13bc4a147c68b6281bd73632df63ac16bb8d3261ce01d4a18773");
        let simple = wallet.create_identity(&chain(), HdPaths::simple_address(0).unwrap().into()).await.unwrap();
        assert_eq!(
            hex::encode(&simple.pubkey.data),
            "e02af2e541bb5b8d4ffb461f869d6e15c8bf231c8b4379635909fc33832e5e23"
        );
        assert_eq!(wallet.identities(), vec![iov, simple]);
    }

    #[tokio::test]
    async fn secp256k1_hd_known_identity() {
        let mut wallet = Slip10Wallet::from_mnemonic(Slip10Curve::Secp256k1, PHRASE).unwrap();
        assert_eq!(wallet.implementation_id(), "secp256k1-hd");
        let identity = wallet.create_identity(&chain(), HdPaths::ethereum(0).unwrap().into()).await.unwrap();
        assert_eq!(
            hex::encode(&identity.pubkey.data),
            "04eb67c8fd38c380ffad2bd9bfdd87c0294cde3baad7098006a4e68341cd5a52cf1ce4ad0d5b713e0b16d2a0eb97c4a05519da99ce0c123c18a5d0b473210e7d4d"
        );
        let signature = wallet
            .create_transaction_signature(&identity.identity(), b"tx", PrehashType::Keccak256)
            .await
            .unwrap();
        assert_eq!(signature.len(), 65);
    }

    #[tokio::test]
    async fn ed25519_rejects_normal_path() {
        let mut wallet = Slip10Wallet::from_mnemonic(Slip10Curve::Ed25519, PHRASE).unwrap();
        assert!(matches!(
            wallet.create_identity(&chain(), HdPaths::ethereum(0).unwrap().into()).await,
            Err(WalletError::InvalidPath(_))
        ));
        assert!(wallet.identities().is_empty());
    }

    #[tokio::test]
    async fn serialization_round_trip() {
        let mut wallet = Slip10Wallet::from_entropy(
            Slip10Curve::Ed25519,
            &hex::decode("c7f74844892fd7b707e74fc9b6c8ef917c13ddbb380cadbc").unwrap(),
        )
        .unwrap();
        let identity = wallet.create_identity(&chain(), HdPaths::simple_address(0).unwrap().into()).await.unwrap();

        let json = wallet.serialize().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["curve"], "ed25519 seed");
        assert_eq!(value["secret"], wallet.printable_secret().unwrap());
        assert_eq!(value["identities"][0]["privkeyPath"], serde_json::json!([2152288086u32, 2147483648u32]));

        let restored = Slip10Wallet::deserialize(&json).unwrap();
        assert_eq!(restored.id(), wallet.id());
        assert_eq!(restored.identities(), vec![identity.clone()]);
        let a = wallet.create_transaction_signature(&identity.identity(), b"m", PrehashType::Sha512).await.unwrap();
        let b = restored.create_transaction_signature(&identity.identity(), b"m", PrehashType::Sha512).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn tampered_pubkey_is_rejected() {
        let mut wallet = Slip10Wallet::from_mnemonic(Slip10Curve::Ed25519, PHRASE).unwrap();
        wallet.create_identity(&chain(), HdPaths::iov(0).unwrap().into()).await.unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&wallet.serialize().unwrap()).unwrap();
        value["identities"][0]["privkeyPath"] = serde_json::json!([2152288086u32, 2147483648u32]);
        let err = Slip10Wallet::deserialize(&value.to_string()).unwrap_err();
        assert!(matches!(&err, WalletError::Serialization(msg) if msg.contains("does not match")), "{err}");
    }

    #[test]
    fn reads_minimal_format() {
        let data = r#"{"secret":"side ripple bachelor banner word swear buzz try situate rent desk carry scorpion uphold undo account pumpkin throw","curve":"ed25519 seed","identities":[]}"#;
        let wallet = Slip10Wallet::deserialize(data).unwrap();
        assert_eq!(wallet.curve(), Slip10Curve::Ed25519);
        assert!(wallet.identities().is_empty());
        assert!(Slip10Wallet::deserialize(&data.replace("side", "sided")).is_err());
    }

    #[test]
    fn generated_wallets_differ() {
        let a = Slip10Wallet::generate(Slip10Curve::Secp256k1, 24).unwrap();
        let b = Slip10Wallet::generate(Slip10Curve::Secp256k1, 24).unwrap();
        assert_ne!(a.printable_secret().unwrap(), b.printable_secret().unwrap());
        assert_ne!(a.id(), b.id());
    }
}
