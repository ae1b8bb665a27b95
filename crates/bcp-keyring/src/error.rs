//! Wallet and device error types.

use bcp_core::types::PrehashType;
use thiserror::Error;

/// Failures talking to a hardware signer. Kept apart from
/// [`WalletError`]'s validation variants so callers can tell a user
/// abandoning the device from a malformed request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("cancelled by user")] Cancelled,
    #[error("device did not respond in time")] Timeout,
    #[error("rejected on device")] Rejected,
    #[error("device communication: {0}")] Communication(String),
    #[error("device not connected")] NotConnected,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("invalid mnemonic: {0}")] InvalidMnemonic(String),
    #[error("key derivation: {0}")] KeyDerivation(String),
    #[error("invalid path: {0}")] InvalidPath(String),
    #[error("invalid key: {0}")] InvalidKey(String),
    #[error("identity not found: {0}")] IdentityNotFound(String),
    #[error("identity already exists: {0}")] DuplicateIdentity(String),
    #[error("unsupported identity options: {0}")] UnsupportedOptions(String),
    #[error("unsupported prehash type: {0:?}")] UnsupportedPrehash(PrehashType),
    #[error("unsupported operation: {0}")] UnsupportedOperation(String),
    #[error("serialization: {0}")] Serialization(String),
    #[error("unknown wallet implementation: {0}")] UnknownImplementation(String),
    #[error("wallet already in keyring: {0}")] DuplicateWallet(String),
    #[error(transparent)] Device(#[from] DeviceError),
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_errors_are_distinct() {
        let cancelled: WalletError = DeviceError::Cancelled.into();
        let timeout: WalletError = DeviceError::Timeout.into();
        assert_ne!(cancelled, timeout);
        assert_eq!(timeout.to_string(), "device did not respond in time");
        assert_ne!(WalletError::Device(DeviceError::Rejected), WalletError::InvalidKey("x".into()));
    }

    #[test]
    fn display() {
        assert_eq!(
            WalletError::UnknownImplementation("foo".into()).to_string(),
            "unknown wallet implementation: foo"
        );
        assert_eq!(
            WalletError::UnsupportedPrehash(PrehashType::Sha512).to_string(),
            "unsupported prehash type: Sha512"
        );
    }

    #[test]
    fn from_json_error() {
        let err = serde_json::from_str::<u32>("x").unwrap_err();
        assert!(matches!(WalletError::from(err), WalletError::Serialization(_)));
    }
}
