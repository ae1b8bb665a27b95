//! Hash primitives used by the codecs and wallets.

use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

use crate::types::PrehashType;

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

pub fn sha512(data: &[u8]) -> [u8; 64] {
    Sha512::digest(data).into()
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Applies `prehash_type` to `data`. [`PrehashType::None`] returns the
/// input unchanged.
pub fn prehash(data: &[u8], prehash_type: PrehashType) -> Vec<u8> {
    match prehash_type {
        PrehashType::None => data.to_vec(),
        PrehashType::Sha256 => sha256(data).to_vec(),
        PrehashType::Sha512 => sha512(data).to_vec(),
        PrehashType::Keccak256 => keccak256(data).to_vec(),
    }
}
