//! The wallet contract and the identity bookkeeping shared by all wallets.

use std::fmt;

use async_trait::async_trait;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use bcp_core::types::{ChainId, Identity, PrehashType, PubkeyBundle};

use crate::error::WalletError;
use crate::hdpaths::Slip10RawIndex;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(pub String);

impl WalletId {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable key of an identity inside a wallet: `chain|algo|pubkey hex`.
pub fn local_identity_id(identity: &Identity) -> String {
    format!("{}|{}|{}", identity.chain_id, identity.pubkey.algo, hex::encode(&identity.pubkey.data))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentity {
    #[serde(default)]
    pub chain_id: ChainId,
    pub pubkey: PubkeyBundle,
    #[serde(default, alias = "nickname", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LocalIdentity {
    pub fn new(chain_id: ChainId, pubkey: PubkeyBundle) -> Self {
        Self { chain_id, pubkey, label: None }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.chain_id.clone(), self.pubkey.clone())
    }

    pub fn id(&self) -> String {
        local_identity_id(&self.identity())
    }
}

/// An imported ed25519 key pair.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Ed25519Keypair {
    privkey: [u8; 32],
}

impl Ed25519Keypair {
    pub fn generate() -> Self {
        let mut privkey = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut privkey);
        Self { privkey }
    }

    pub fn from_privkey(privkey: [u8; 32]) -> Self {
        Self { privkey }
    }

    pub fn privkey(&self) -> &[u8; 32] {
        &self.privkey
    }

    pub fn pubkey(&self) -> PubkeyBundle {
        let key = ed25519_dalek::SigningKey::from_bytes(&self.privkey);
        PubkeyBundle::ed25519(key.verifying_key().to_bytes().to_vec())
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Keypair").field("pubkey", &self.pubkey()).field("privkey", &"[REDACTED]").finish()
    }
}

/// Private key material stored next to an identity.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct SecretBytes(pub(crate) Vec<u8>);

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretBytes([REDACTED])")
    }
}

/// What a wallet needs to create an identity. Which variant is accepted
/// depends on the wallet.
#[derive(Debug, Clone)]
pub enum IdentityOptions {
    Keypair(Ed25519Keypair),
    Path(Vec<Slip10RawIndex>),
    /// Simple address index on a hardware device.
    Index(u32),
}

impl From<Ed25519Keypair> for IdentityOptions {
    fn from(keypair: Ed25519Keypair) -> Self {
        Self::Keypair(keypair)
    }
}

impl From<Vec<Slip10RawIndex>> for IdentityOptions {
    fn from(path: Vec<Slip10RawIndex>) -> Self {
        Self::Path(path)
    }
}

impl From<u32> for IdentityOptions {
    fn from(index: u32) -> Self {
        Self::Index(index)
    }
}

/// Manages a set of keys and signs with them, in software or by
/// delegating to a device.
#[async_trait]
pub trait Wallet: Send + Sync {
    fn id(&self) -> &WalletId;

    /// Tag used by the keyring to pick the deserializer.
    fn implementation_id(&self) -> &'static str;

    fn label(&self) -> Option<&str>;

    fn set_label(&mut self, label: Option<String>);

    /// Creates an identity bound to `chain_id`. Adding the same key for
    /// the same chain twice is an error.
    async fn create_identity(&mut self, chain_id: &ChainId, options: IdentityOptions)
    -> Result<LocalIdentity, WalletError>;

    fn identities(&self) -> Vec<LocalIdentity>;

    fn set_identity_label(&mut self, identity: &Identity, label: Option<String>) -> Result<(), WalletError>;

    fn identity_label(&self, identity: &Identity) -> Option<String> {
        let id = local_identity_id(identity);
        self.identities().into_iter().find(|i| i.id() == id).and_then(|i| i.label)
    }

    fn can_sign(&self) -> bool;

    /// Detached signature over `bytes` by the key behind `identity`.
    async fn create_transaction_signature(
        &self,
        identity: &Identity,
        bytes: &[u8],
        prehash_type: PrehashType,
    ) -> Result<Vec<u8>, WalletError>;

    /// Secret data for backups. The format is for humans only.
    fn printable_secret(&self) -> Result<String, WalletError>;

    fn serialize(&self) -> Result<String, WalletError>;
}

/// Identities in creation order, each with the wallet-specific data
/// needed to sign for it.
#[derive(Debug, Clone)]
pub(crate) struct IdentityBook<T> {
    entries: Vec<(LocalIdentity, T)>,
}

impl<T> Default for IdentityBook<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> IdentityBook<T> {
    pub(crate) fn insert(&mut self, identity: LocalIdentity, data: T) -> Result<(), WalletError> {
        let id = identity.id();
        if self.entries.iter().any(|(existing, _)| existing.id() == id) {
            return Err(WalletError::DuplicateIdentity(id));
        }
        self.entries.push((identity, data));
        Ok(())
    }

    pub(crate) fn get(&self, identity: &Identity) -> Result<&T, WalletError> {
        let id = local_identity_id(identity);
        self.entries
            .iter()
            .find(|(existing, _)| existing.id() == id)
            .map(|(_, data)| data)
            .ok_or(WalletError::IdentityNotFound(id))
    }

    pub(crate) fn set_label(&mut self, identity: &Identity, label: Option<String>) -> Result<(), WalletError> {
        let id = local_identity_id(identity);
        let entry = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.id() == id)
            .ok_or(WalletError::IdentityNotFound(id))?;
        entry.0.label = label;
        Ok(())
    }

    pub(crate) fn identities(&self) -> Vec<LocalIdentity> {
        self.entries.iter().map(|(identity, _)| identity.clone()).collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &(LocalIdentity, T)> {
        self.entries.iter()
    }
}
