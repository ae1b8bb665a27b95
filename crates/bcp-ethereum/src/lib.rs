//! Ethereum transaction codec: legacy and EIP-155 RLP framing, ERC20
//! transfers and ether atomic swap contract calls.

pub mod abi;
pub mod address;
pub mod chain;
pub mod codec;
pub mod config;
pub mod error;
pub mod serialization;

pub use codec::EthereumCodec;
pub use config::{Erc20Options, EthereumCodecOptions};
