//! ABI error types.
use bcp_core::error::CodecError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("input data empty")] EmptyInput,
    #[error("input data length not divisible by 32")] NotDivisibleBy32,
    #[error("invalid head length")] InvalidHeadLength,
    #[error("start position inside the header")] StartInsideHeader,
    #[error("start position not divisible by 32")] StartNotAligned,
    #[error("start position out of range: {0}")] StartOutOfRange(String),
    #[error("start positions not in ascending order")] StartOrder,
    #[error("input data too short: need {need}, have {have}")] TooShort { need: usize, have: usize },
    #[error("invalid address")] InvalidAddress,
    #[error("value does not fit into 256 bits")] Uint256Overflow,
    #[error("{field} must be 32 bytes but got {len}")] NotBytes32 { field: &'static str, len: usize },
}

impl From<AbiError> for CodecError {
    fn from(err: AbiError) -> Self {
        CodecError::Validation(err.to_string())
    }
}
