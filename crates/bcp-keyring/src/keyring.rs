//! Ordered collection of wallets, serialized as one JSON document.
//!
//! Each entry is stored as `{"implementationId", "data"}` where `data` is
//! the wallet's own serialization. Unknown implementation ids fail the
//! whole keyring instead of being dropped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use bcp_core::types::Identity;

use crate::error::WalletError;
use crate::wallet::{Wallet, WalletId};
use crate::wallets::{
    ED25519_HD_IMPLEMENTATION_ID, ED25519_IMPLEMENTATION_ID, Ed25519Wallet, LEDGER_IMPLEMENTATION_ID, LedgerDevice,
    LedgerWallet, SECP256K1_HD_IMPLEMENTATION_ID, Slip10Wallet,
};

#[derive(Debug, Clone)]
pub enum WalletEntry {
    Ed25519(Ed25519Wallet),
    Slip10(Slip10Wallet),
    Ledger(LedgerWallet),
}

impl WalletEntry {
    pub fn wallet(&self) -> &dyn Wallet {
        match self {
            Self::Ed25519(w) => w,
            Self::Slip10(w) => w,
            Self::Ledger(w) => w,
        }
    }

    pub fn wallet_mut(&mut self) -> &mut dyn Wallet {
        match self {
            Self::Ed25519(w) => w,
            Self::Slip10(w) => w,
            Self::Ledger(w) => w,
        }
    }

    fn deserialize(implementation_id: &str, data: &str) -> Result<Self, WalletError> {
        match implementation_id {
            ED25519_IMPLEMENTATION_ID => Ok(Self::Ed25519(Ed25519Wallet::deserialize(data)?)),
            ED25519_HD_IMPLEMENTATION_ID | SECP256K1_HD_IMPLEMENTATION_ID => {
                let wallet = Slip10Wallet::deserialize(data)?;
                if wallet.implementation_id() != implementation_id {
                    return Err(WalletError::Serialization(format!(
                        "curve of wallet data does not match implementation {implementation_id}"
                    )));
                }
                Ok(Self::Slip10(wallet))
            }
            LEDGER_IMPLEMENTATION_ID => Ok(Self::Ledger(LedgerWallet::deserialize(data)?)),
            other => Err(WalletError::UnknownImplementation(other.to_string())),
        }
    }
}

impl From<Ed25519Wallet> for WalletEntry {
    fn from(wallet: Ed25519Wallet) -> Self {
        Self::Ed25519(wallet)
    }
}

impl From<Slip10Wallet> for WalletEntry {
    fn from(wallet: Slip10Wallet) -> Self {
        Self::Slip10(wallet)
    }
}

impl From<LedgerWallet> for WalletEntry {
    fn from(wallet: LedgerWallet) -> Self {
        Self::Ledger(wallet)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntrySerialization {
    implementation_id: String,
    data: String,
}

#[derive(Serialize, Deserialize)]
struct KeyringSerialization {
    entries: Vec<EntrySerialization>,
}

#[derive(Debug, Clone, Default)]
pub struct Keyring {
    entries: Vec<WalletEntry>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deserialize(data: &str) -> Result<Self, WalletError> {
        let parsed: KeyringSerialization = serde_json::from_str(data)?;
        let entries = parsed
            .entries
            .iter()
            .map(|entry| WalletEntry::deserialize(&entry.implementation_id, &entry.data))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(wallets = entries.len(), "keyring: deserialized");
        Ok(Self { entries })
    }

    /// Adds a wallet. Wallet ids must be unique within the keyring.
    pub fn add(&mut self, wallet: impl Into<WalletEntry>) -> Result<&WalletId, WalletError> {
        let entry = wallet.into();
        let id = entry.wallet().id().clone();
        if self.entry_by_id(&id).is_some() {
            return Err(WalletError::DuplicateWallet(id.to_string()));
        }
        info!(wallet = %id, implementation = entry.wallet().implementation_id(), "keyring: wallet added");
        self.entries.push(entry);
        Ok(self.entries[self.entries.len() - 1].wallet().id())
    }

    pub fn entries(&self) -> &[WalletEntry] {
        &self.entries
    }

    pub fn entry_by_id(&self, id: &WalletId) -> Option<&WalletEntry> {
        self.entries.iter().find(|e| e.wallet().id() == id)
    }

    pub fn entry_by_id_mut(&mut self, id: &WalletId) -> Option<&mut WalletEntry> {
        self.entries.iter_mut().find(|e| e.wallet().id() == id)
    }

    pub fn entry_by_index(&self, index: usize) -> Option<&WalletEntry> {
        self.entries.get(index)
    }

    /// Wallet holding `identity`, if any.
    pub fn wallet_for_identity(&self, identity: &Identity) -> Option<&WalletEntry> {
        self.entries
            .iter()
            .find(|e| e.wallet().identities().iter().any(|local| &local.identity() == identity))
    }

    /// Attaches `device` to every Ledger wallet. Returns how many were
    /// connected.
    pub fn connect_ledger(&mut self, device: Arc<dyn LedgerDevice>) -> usize {
        let mut connected = 0;
        for entry in &mut self.entries {
            if let WalletEntry::Ledger(wallet) = entry {
                wallet.connect(device.clone());
                connected += 1;
            }
        }
        connected
    }

    pub fn serialize(&self) -> Result<String, WalletError> {
        let entries = self
            .entries
            .iter()
            .map(|entry| {
                let wallet = entry.wallet();
                Ok(EntrySerialization {
                    implementation_id: wallet.implementation_id().to_string(),
                    data: wallet.serialize()?,
                })
            })
            .collect::<Result<Vec<_>, WalletError>>()?;
        Ok(serde_json::to_string(&KeyringSerialization { entries })?)
    }
}
