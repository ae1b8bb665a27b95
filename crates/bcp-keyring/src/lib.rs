//! Key management: BIP-39 mnemonics, SLIP-10 derivation, software and
//! Ledger wallets, and the keyring that persists them.

pub mod error;
pub mod hdpaths;
pub mod keyring;
pub mod mnemonic;
pub mod signing;
pub mod slip10;
pub mod wallet;
pub mod wallets;

pub use error::{DeviceError, WalletError};
pub use hdpaths::{HdPaths, Slip10RawIndex};
pub use keyring::{Keyring, WalletEntry};
pub use mnemonic::EnglishMnemonic;
pub use slip10::Slip10Curve;
pub use wallet::{Ed25519Keypair, IdentityOptions, LocalIdentity, Wallet, WalletId};
