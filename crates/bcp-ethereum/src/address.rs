//! `0x` addresses with EIP-55 mixed-case checksums.

use k256::PublicKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use bcp_core::crypto::keccak256;
use bcp_core::error::CodecError;
use bcp_core::types::{Address, Algorithm, Identity};

use crate::error::AbiError;

pub const ADDRESS_LENGTH: usize = 20;

/// Checksummed form of a raw 20-byte address.
pub fn to_checksummed_address(data: &[u8; ADDRESS_LENGTH]) -> Address {
    let lower = hex::encode(data);
    let hash = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    Address(out)
}

/// Accepts all-lowercase, all-uppercase or correctly checksummed
/// addresses. The `0x` prefix is case-sensitive.
pub fn is_valid_address(address: &str) -> bool {
    let Some(body) = address.strip_prefix("0x") else {
        return false;
    };
    if body.len() != 2 * ADDRESS_LENGTH || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    let is_lower = body.bytes().all(|b| !b.is_ascii_uppercase());
    let is_upper = body.bytes().all(|b| !b.is_ascii_lowercase());
    if is_lower || is_upper {
        return true;
    }
    match address_bytes(address) {
        Ok(data) => to_checksummed_address(&data).as_str() == address,
        Err(_) => false,
    }
}

/// Raw bytes of a well-formed address. Checksums are not checked here.
fn address_bytes(address: &str) -> Result<[u8; ADDRESS_LENGTH], AbiError> {
    let body = address.strip_prefix("0x").ok_or(AbiError::InvalidAddress)?;
    let bytes = hex::decode(body).map_err(|_| AbiError::InvalidAddress)?;
    bytes.as_slice().try_into().map_err(|_| AbiError::InvalidAddress)
}

/// Validated raw bytes of `address`.
pub fn decode_address(address: &Address) -> Result<[u8; ADDRESS_LENGTH], AbiError> {
    if !is_valid_address(address.as_str()) {
        return Err(AbiError::InvalidAddress);
    }
    address_bytes(address.as_str())
}

/// Address of a secp256k1 key given in compressed or uncompressed SEC1 form.
pub fn pubkey_to_address(pubkey: &[u8]) -> Result<Address, CodecError> {
    let key = PublicKey::from_sec1_bytes(pubkey)
        .map_err(|_| CodecError::Validation("invalid secp256k1 public key".into()))?;
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut data = [0u8; ADDRESS_LENGTH];
    data.copy_from_slice(&hash[12..]);
    Ok(to_checksummed_address(&data))
}

pub fn identity_to_address(identity: &Identity) -> Result<Address, CodecError> {
    if identity.pubkey.algo != Algorithm::Secp256k1 {
        return Err(CodecError::Validation(format!(
            "unsupported algorithm: {}",
            identity.pubkey.algo
        )));
    }
    pubkey_to_address(&identity.pubkey.data)
}
