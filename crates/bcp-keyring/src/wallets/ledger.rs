//! Hardware wallet backed by a Ledger running the IOV app.
//!
//! Keys never leave the device. Identities are simple address indices;
//! every signature is a device round trip that can time out, be rejected
//! on the device or be cancelled by the caller.

use std::collections::HashMap;
use std::fmt;
use std::future::{Future, pending};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use bcp_core::types::{ChainId, Identity, PrehashType, PubkeyBundle};

use crate::error::{DeviceError, WalletError};
use crate::wallet::{IdentityBook, IdentityOptions, LocalIdentity, Wallet, WalletId};

pub const LEDGER_IMPLEMENTATION_ID: &str = "ledger";

/// Transport to the device app.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerDevice: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Ed25519 public key of simple address `index`.
    async fn get_pubkey(&self, index: u32) -> Result<Vec<u8>, DeviceError>;

    /// Shows `message` to the user and signs it with the key of `index`.
    /// The device applies its own prehash.
    async fn sign(&self, index: u32, message: &[u8]) -> Result<Vec<u8>, DeviceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Includes the time the user needs to confirm on the device.
    pub sign_timeout: Duration,
    pub pubkey_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { sign_timeout: Duration::from_secs(120), pubkey_timeout: Duration::from_secs(10) }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentitySerialization {
    local_identity: LocalIdentity,
    simple_address_index: u32,
}

#[derive(Serialize, Deserialize)]
struct WalletSerialization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<WalletId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    identities: Vec<IdentitySerialization>,
}

#[derive(Clone)]
pub struct LedgerWallet {
    id: WalletId,
    label: Option<String>,
    config: LedgerConfig,
    device: Option<Arc<dyn LedgerDevice>>,
    book: IdentityBook<u32>,
}

impl fmt::Debug for LedgerWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerWallet")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("config", &self.config)
            .field("connected", &self.device.is_some())
            .field("identities", &self.book.identities().len())
            .finish()
    }
}

impl LedgerWallet {
    pub fn new(device: Arc<dyn LedgerDevice>, config: LedgerConfig) -> Self {
        Self { id: WalletId::generate(), label: None, config, device: Some(device), book: IdentityBook::default() }
    }

    /// Restores identities without a device. Signing fails until
    /// [`LedgerWallet::connect`] is called.
    pub fn deserialize(data: &str) -> Result<Self, WalletError> {
        let parsed: WalletSerialization = serde_json::from_str(data)?;
        let mut wallet = Self {
            id: parsed.id.unwrap_or_else(WalletId::generate),
            label: parsed.label,
            config: LedgerConfig::default(),
            device: None,
            book: IdentityBook::default(),
        };
        for entry in parsed.identities {
            wallet.book.insert(entry.local_identity, entry.simple_address_index)?;
        }
        Ok(wallet)
    }

    pub fn connect(&mut self, device: Arc<dyn LedgerDevice>) {
        self.device = Some(device);
    }

    pub fn disconnect(&mut self) {
        self.device = None;
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LedgerConfig) {
        self.config = config;
    }

    /// Indices of all identities, keyed by local identity id.
    pub fn simple_address_indices(&self) -> HashMap<String, u32> {
        self.book.iter().map(|(identity, index)| (identity.id(), *index)).collect()
    }

    fn connected_device(&self) -> Result<&Arc<dyn LedgerDevice>, DeviceError> {
        match &self.device {
            Some(device) if device.is_connected() => Ok(device),
            _ => Err(DeviceError::NotConnected),
        }
    }

    /// Signs, giving up with [`DeviceError::Cancelled`] once `cancel`
    /// completes or [`DeviceError::Timeout`] after the configured timeout.
    pub async fn sign_with_cancel<C>(
        &self,
        identity: &Identity,
        bytes: &[u8],
        cancel: C,
    ) -> Result<Vec<u8>, WalletError>
    where
        C: Future<Output = ()> + Send,
    {
        let index = *self.book.get(identity)?;
        let device = self.connected_device()?;
        info!(wallet = %self.id, index, "ledger: waiting for confirmation on device");

        let result = tokio::select! {
            res = timeout(self.config.sign_timeout, device.sign(index, bytes)) => match res {
                Ok(signed) => signed,
                Err(_) => Err(DeviceError::Timeout),
            },
            _ = cancel => Err(DeviceError::Cancelled),
        };
        match &result {
            Ok(_) => debug!(wallet = %self.id, index, "ledger: signed"),
            Err(err) => warn!(wallet = %self.id, index, %err, "ledger: signing failed"),
        }
        Ok(result?)
    }
}

#[async_trait]
impl Wallet for LedgerWallet {
    fn id(&self) -> &WalletId {
        &self.id
    }

    fn implementation_id(&self) -> &'static str {
        LEDGER_IMPLEMENTATION_ID
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
        let IdentityOptions::Index(index) = options else {
            return Err(WalletError::UnsupportedOptions("ledger wallet needs a simple address index".into()));
        };
        let device = self.connected_device()?;
        let pubkey = timeout(self.config.pubkey_timeout, device.get_pubkey(index))
            .await
            .map_err(|_| DeviceError::Timeout)??;
        if pubkey.len() != 32 {
            return Err(DeviceError::Communication(format!("expected 32 byte pubkey, got {}", pubkey.len())).into());
        }
        let identity = LocalIdentity::new(chain_id.clone(), PubkeyBundle::ed25519(pubkey));
        self.book.insert(identity.clone(), index)?;
        debug!(wallet = %self.id, chain_id = %chain_id, index, "ledger: identity created");
        Ok(identity)
    }

    fn identities(&self) -> Vec<LocalIdentity> {
        self.book.identities()
    }

    fn set_identity_label(&mut self, identity: &Identity, label: Option<String>) -> Result<(), WalletError> {
        self.book.set_label(identity, label)
    }

    fn can_sign(&self) -> bool {
        self.connected_device().is_ok()
    }

    async fn create_transaction_signature(
        &self,
        identity: &Identity,
        bytes: &[u8],
        _prehash_type: PrehashType,
    ) -> Result<Vec<u8>, WalletError> {
        self.sign_with_cancel(identity, bytes, pending()).await
    }

    fn printable_secret(&self) -> Result<String, WalletError> {
        Err(WalletError::UnsupportedOperation("the secret never leaves the device".into()))
    }

    fn serialize(&self) -> Result<String, WalletError> {
        let identities = self
            .book
            .iter()
            .map(|(identity, index)| IdentitySerialization {
                local_identity: identity.clone(),
                simple_address_index: *index,
            })
            .collect();
        let out = WalletSerialization { id: Some(self.id.clone()), label: self.label.clone(), identities };
        Ok(serde_json::to_string(&out)?)
    }
}
