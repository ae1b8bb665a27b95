//! # bcp-core
//! Chain-agnostic transaction model, codec contract and atomic swap merger.

pub mod crypto;
pub mod decimal;
pub mod encoding;
pub mod error;
pub mod swap;
pub mod traits;
pub mod transactions;
pub mod types;
