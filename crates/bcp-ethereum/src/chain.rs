//! `ethereum-eip155-<n>` chain ids.

use bcp_core::error::CodecError;
use bcp_core::types::ChainId;

const CHAIN_ID_PREFIX: &str = "ethereum-eip155-";

/// Numeric EIP-155 chain id. `0` selects pre-EIP-155 signing.
pub fn to_ethereum_chain_id(chain_id: &ChainId) -> Result<u64, CodecError> {
    chain_id
        .as_str()
        .strip_prefix(CHAIN_ID_PREFIX)
        .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|n| n.parse::<u64>().ok())
        .ok_or_else(|| CodecError::Validation(format!("invalid ethereum chain id: {chain_id}")))
}

pub fn from_ethereum_chain_id(id: u64) -> ChainId {
    ChainId(format!("{CHAIN_ID_PREFIX}{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_chains() {
        assert_eq!(to_ethereum_chain_id(&ChainId::new("ethereum-eip155-1")).unwrap(), 1);
        assert_eq!(to_ethereum_chain_id(&ChainId::new("ethereum-eip155-5777")).unwrap(), 5777);
        assert_eq!(to_ethereum_chain_id(&ChainId::new("ethereum-eip155-0")).unwrap(), 0);
        assert_eq!(from_ethereum_chain_id(3).as_str(), "ethereum-eip155-3");
    }

    #[test]
    fn rejects_others() {
        for bad in ["ethereum-eip155-", "ethereum-eip155-x", "iov-mainnet", "ethereum-eip155--1"] {
            assert!(to_ethereum_chain_id(&ChainId::new(bad)).is_err(), "accepted {bad}");
        }
    }
}
