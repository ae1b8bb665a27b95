pub mod ed25519;
pub mod hd;
pub mod ledger;

pub use ed25519::{ED25519_IMPLEMENTATION_ID, Ed25519Wallet};
pub use hd::{ED25519_HD_IMPLEMENTATION_ID, SECP256K1_HD_IMPLEMENTATION_ID, Slip10Wallet};
pub use ledger::{LEDGER_IMPLEMENTATION_ID, LedgerConfig, LedgerDevice, LedgerWallet};
