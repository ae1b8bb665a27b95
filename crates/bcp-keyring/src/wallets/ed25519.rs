//! Wallet of independently imported ed25519 key pairs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use bcp_core::types::{ChainId, Identity, PrehashType};

use crate::error::WalletError;
use crate::signing::sign_ed25519;
use crate::wallet::{IdentityBook, IdentityOptions, LocalIdentity, SecretBytes, Wallet, WalletId};

pub const ED25519_IMPLEMENTATION_ID: &str = "ed25519";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentitySerialization {
    local_identity: LocalIdentity,
    privkey: String,
}

#[derive(Serialize, Deserialize)]
struct WalletSerialization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<WalletId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    identities: Vec<IdentitySerialization>,
}

#[derive(Debug, Clone)]
pub struct Ed25519Wallet {
    id: WalletId,
    label: Option<String>,
    book: IdentityBook<SecretBytes>,
}

impl Default for Ed25519Wallet {
    fn default() -> Self {
        Self::new()
    }
}

impl Ed25519Wallet {
    pub fn new() -> Self {
        Self { id: WalletId::generate(), label: None, book: IdentityBook::default() }
    }

    pub fn deserialize(data: &str) -> Result<Self, WalletError> {
        let parsed: WalletSerialization = serde_json::from_str(data)?;
        let mut wallet = Self { id: parsed.id.unwrap_or_else(WalletId::generate), label: parsed.label, book: IdentityBook::default() };
        for entry in parsed.identities {
            let privkey = hex::decode(entry.privkey.trim())
                .map_err(|e| WalletError::Serialization(format!("invalid privkey hex: {e}")))?;
            wallet.book.insert(entry.local_identity, SecretBytes(privkey))?;
        }
        Ok(wallet)
    }
}

#[async_trait]
impl Wallet for Ed25519Wallet {
    fn id(&self) -> &WalletId {
        &self.id
    }

    fn implementation_id(&self) -> &'static str {
        ED25519_IMPLEMENTATION_ID
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
        let IdentityOptions::Keypair(keypair) = options else {
            return Err(WalletError::UnsupportedOptions("ed25519 wallet needs a keypair".into()));
        };
        let identity = LocalIdentity::new(chain_id.clone(), keypair.pubkey());
        self.book.insert(identity.clone(), SecretBytes(keypair.privkey().to_vec()))?;
        debug!(wallet = %self.id, chain_id = %chain_id, "ed25519: identity created");
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
        let privkey = self.book.get(identity)?;
        sign_ed25519(&privkey.0, bytes, prehash_type)
    }

    fn printable_secret(&self) -> Result<String, WalletError> {
        Err(WalletError::UnsupportedOperation("imported keys have no common secret".into()))
    }

    fn serialize(&self) -> Result<String, WalletError> {
        let identities = self
            .book
            .iter()
            .map(|(identity, privkey)| IdentitySerialization {
                local_identity: identity.clone(),
                privkey: hex::encode(&privkey.0),
            })
            .collect();
        let out = WalletSerialization { id: Some(self.id.clone()), label: self.label.clone(), identities };
        Ok(serde_json::to_string(&out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Ed25519Keypair;
    use ed25519_dalek::Verifier;

    fn chain() -> ChainId {
        ChainId::new("test-chain")
    }

    #[tokio::test]
    async fn creates_and_signs() {
        let mut wallet = Ed25519Wallet::new();
        let keypair = Ed25519Keypair::from_privkey([9; 32]);
        let identity = wallet.create_identity(&chain(), keypair.clone().into()).await.unwrap();
        assert_eq!(identity.pubkey, keypair.pubkey());
        assert_eq!(wallet.identities(), vec![identity.clone()]);

        let signature = wallet
            .create_transaction_signature(&identity.identity(), b"message", PrehashType::Sha512)
            .await
            .unwrap();
        let key = ed25519_dalek::VerifyingKey::from_bytes(&identity.pubkey.data.clone().try_into().unwrap()).unwrap();
        let sig = ed25519_dalek::Signature::from_slice(&signature).unwrap();
        assert!(key.verify(&bcp_core::crypto::sha512(b"message"), &sig).is_ok());
    }

    #[tokio::test]
    async fn rejects_duplicates_and_wrong_options() {
        let mut wallet = Ed25519Wallet::new();
        let keypair = Ed25519Keypair::generate();
        wallet.create_identity(&chain(), keypair.clone().into()).await.unwrap();
        assert!(matches!(
            wallet.create_identity(&chain(), keypair.clone().into()).await,
            Err(WalletError::DuplicateIdentity(_))
        ));
        // same key on another chain is a different identity
        wallet.create_identity(&ChainId::new("other"), keypair.into()).await.unwrap();
        assert!(matches!(
            wallet.create_identity(&chain(), IdentityOptions::Index(0)).await,
            Err(WalletError::UnsupportedOptions(_))
        ));
    }

    #[tokio::test]
    async fn unknown_identity_cannot_sign() {
        let wallet = Ed25519Wallet::new();
        let stranger = Identity::new(chain(), bcp_core::types::PubkeyBundle::ed25519(vec![1; 32]));
        assert!(matches!(
            wallet.create_transaction_signature(&stranger, b"m", PrehashType::None).await,
            Err(WalletError::IdentityNotFound(_))
        ));
    }

    #[tokio::test]
    async fn serialization_round_trip() {
        let mut wallet = Ed25519Wallet::new();
        wallet.set_label(Some("imported".into()));
        let a = wallet.create_identity(&chain(), Ed25519Keypair::generate().into()).await.unwrap();
        wallet.create_identity(&chain(), Ed25519Keypair::generate().into()).await.unwrap();
        wallet.set_identity_label(&a.identity(), Some("first".into())).unwrap();

        let restored = Ed25519Wallet::deserialize(&wallet.serialize().unwrap()).unwrap();
        assert_eq!(restored.id(), wallet.id());
        assert_eq!(restored.label(), Some("imported"));
        assert_eq!(restored.identities(), wallet.identities());
        assert_eq!(restored.identity_label(&a.identity()).as_deref(), Some("first"));

        let sig_a = wallet.create_transaction_signature(&a.identity(), b"m", PrehashType::None).await.unwrap();
        let sig_b = restored.create_transaction_signature(&a.identity(), b"m", PrehashType::None).await.unwrap();
        assert_eq!(sig_a, sig_b);
    }

    #[test]
    fn reads_legacy_format() {
        let data = r#"{ "identities":[{"localIdentity": { "pubkey": { "algo": "ed25519", "data": "aabbccdd" }, "nickname": "foo" }, "privkey": "223322112233aabb"}] }"#;
        let wallet = Ed25519Wallet::deserialize(data).unwrap();
        assert_eq!(wallet.identities().len(), 1);
        assert_eq!(wallet.identities()[0].label.as_deref(), Some("foo"));
        assert!(Ed25519Wallet::deserialize("{}").is_err());
    }
}
