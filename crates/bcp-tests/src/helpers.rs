//! Shared fixtures for the integration tests.

use bcp_core::types::{Address, Amount, ChainId, Fee, Identity, PubkeyBundle};

/// Mnemonic with known derived keys for both curves.
pub const MNEMONIC: &str = "melt wisdom mesh wash item catalog talk enjoy gaze hat brush wash";

pub const BNS_TESTNET: &str = "local-iov-devnet";
pub const ETHEREUM_GANACHE: &str = "ethereum-eip155-5777";

/// Honors `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn bns_chain() -> ChainId {
    ChainId::new(BNS_TESTNET)
}

pub fn bns_identity(seed: u8) -> Identity {
    Identity::new(bns_chain(), PubkeyBundle::ed25519(vec![seed; 32]))
}

/// Testnet address with a payload of `seed` repeated.
pub fn bns_address(seed: u8) -> Address {
    bcp_bns::address::encode_bns_address(bcp_bns::address::AddressPrefix::Tiov, &[seed; 20])
        .expect("20 byte payload")
}

pub fn cash(quantity: &str) -> Amount {
    Amount::new(quantity, 9, "CASH").expect("valid quantity")
}

pub fn bns_fee() -> Fee {
    Fee::tokens(cash("10000000"))
}
