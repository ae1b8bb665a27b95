//! Text encodings for binary data.
//!
//! Hex decoding is case-insensitive, hex encoding always lowercase. Base64
//! uses the standard alphabet with padding. The ASCII codec is restricted
//! to the printable range `0x20..=0x7E`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::EncodingError;

pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

pub fn from_hex(input: &str) -> Result<Vec<u8>, EncodingError> {
    hex::decode(input).map_err(|e| EncodingError::InvalidHex(e.to_string()))
}

pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub fn from_base64(input: &str) -> Result<Vec<u8>, EncodingError> {
    STANDARD.decode(input).map_err(|e| EncodingError::InvalidBase64(e.to_string()))
}

/// Encodes printable ASCII text to bytes.
pub fn to_ascii(input: &str) -> Result<Vec<u8>, EncodingError> {
    input
        .chars()
        .map(|c| {
            let code = c as u32;
            if (0x20..=0x7e).contains(&code) {
                Ok(code as u8)
            } else {
                Err(EncodingError::NonPrintableChar(code))
            }
        })
        .collect()
}

/// Decodes bytes holding printable ASCII to text.
pub fn from_ascii(data: &[u8]) -> Result<String, EncodingError> {
    data.iter()
        .map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                Ok(b as char)
            } else {
                Err(EncodingError::NonPrintableByte(b))
            }
        })
        .collect()
}

pub fn to_utf8(input: &str) -> Vec<u8> {
    input.as_bytes().to_vec()
}

pub fn from_utf8(data: &[u8]) -> Result<String, EncodingError> {
    String::from_utf8(data.to_vec()).map_err(|e| EncodingError::InvalidUtf8(e.to_string()))
}
