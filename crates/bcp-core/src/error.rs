//! Error types shared by every codec.
use thiserror::Error;

/// Failures of encoding, decoding and parsing transactions.
///
/// Decoders are fail-fast: any of these aborts the whole message and no
/// partially decoded transaction is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("validation: {0}")] Validation(String),
    #[error("missing {0}")] MissingField(String),
    #[error("unknown message type in transaction")] UnknownMessageType,
    #[error("unsupported transaction kind: {0}")] UnsupportedKind(String),
    #[error("unsupported operation: {0}")] UnsupportedOperation(String),
    #[error("decode: {0}")] Decode(String),
    #[error("{context}: {source}")] Context { context: String, source: Box<CodecError> },
}

impl CodecError {
    /// Wraps `self` with the name of the enclosing structure.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context { context: context.into(), source: Box::new(self) }
    }

    /// The innermost error, with all context layers removed.
    pub fn root(&self) -> &CodecError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("invalid base64: {0}")] InvalidBase64(String),
    #[error("cannot encode character that is out of printable ASCII range: {0}")] NonPrintableChar(u32),
    #[error("cannot decode character that is out of printable ASCII range: {0}")] NonPrintableByte(u8),
    #[error("invalid UTF-8: {0}")] InvalidUtf8(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("invalid character at position {0}")] InvalidCharacter(usize),
    #[error("more than one separator found")] MultipleSeparators,
    #[error("got more fractional digits than supported")] TooManyFractionalDigits,
    #[error("invalid quantity: {0}")] InvalidQuantity(String),
}

impl From<DecimalError> for CodecError {
    fn from(err: DecimalError) -> Self {
        CodecError::Validation(err.to_string())
    }
}

impl From<EncodingError> for CodecError {
    fn from(err: EncodingError) -> Self {
        CodecError::Decode(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("swap {0} is already open")] DuplicateOpen(String),
    #[error("swap {0} already has a pending settlement")] DuplicateSettlement(String),
    #[error("swap {0} is already settled")] AlreadySettled(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_wraps_and_unwraps() {
        let err = CodecError::MissingField("resolution".into()).context("rawOption");
        assert_eq!(err.to_string(), "rawOption: missing resolution");
        assert_eq!(err.root(), &CodecError::MissingField("resolution".into()));
    }

    #[test]
    fn unknown_message_display() {
        assert_eq!(CodecError::UnknownMessageType.to_string(), "unknown message type in transaction");
    }

    #[test]
    fn decimal_error_maps_to_validation() {
        let err: CodecError = DecimalError::MultipleSeparators.into();
        assert!(matches!(err, CodecError::Validation(ref m) if m.contains("separator")));
    }
}
