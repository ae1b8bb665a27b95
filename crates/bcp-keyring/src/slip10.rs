//! SLIP-10 key derivation for ed25519 and secp256k1.
//!
//! Secp256k1 follows BIP-32 and supports normal (non-hardened) children.
//! Ed25519 has no public derivation, so any normal component is rejected.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::PrimeField;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, Scalar, SecretKey};
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;
use crate::hdpaths::{Slip10RawIndex, path_to_string};

type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slip10Curve {
    #[serde(rename = "ed25519 seed")]
    Ed25519,
    #[serde(rename = "Bitcoin seed")]
    Secp256k1,
}

impl Slip10Curve {
    /// HMAC key of the master node.
    pub fn seed_key(&self) -> &'static [u8] {
        match self {
            Self::Ed25519 => b"ed25519 seed",
            Self::Secp256k1 => b"Bitcoin seed",
        }
    }
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Slip10Result {
    pub chain_code: [u8; 32],
    pub private_key: [u8; 32],
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 64], WalletError> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|e| WalletError::KeyDerivation(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn split(i: &[u8; 64]) -> Slip10Result {
    let mut private_key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    private_key.copy_from_slice(&i[..32]);
    chain_code.copy_from_slice(&i[32..]);
    Slip10Result { chain_code, private_key }
}

/// A scalar in `[0, n)` from 32 big-endian bytes, or `None`.
fn scalar(bytes: &[u8]) -> Option<Scalar> {
    let bytes: [u8; 32] = bytes.try_into().ok()?;
    Scalar::from_repr(FieldBytes::from(bytes)).into()
}

/// A scalar in `[1, n)`, or `None`.
fn valid_scalar(bytes: &[u8]) -> Option<Scalar> {
    scalar(bytes).filter(|s| !bool::from(s.is_zero()))
}

fn master(curve: Slip10Curve, seed: &[u8]) -> Result<Slip10Result, WalletError> {
    let mut i = hmac_sha512(curve.seed_key(), &[seed])?;
    if curve == Slip10Curve::Secp256k1 {
        while valid_scalar(&i[..32]).is_none() {
            i = hmac_sha512(curve.seed_key(), &[&i])?;
        }
    }
    let result = split(&i);
    i.zeroize();
    Ok(result)
}

fn child_ed25519(parent: &Slip10Result, index: Slip10RawIndex) -> Result<Slip10Result, WalletError> {
    if !index.is_hardened() {
        return Err(WalletError::InvalidPath(format!("ed25519 requires hardened components, got {index}")));
    }
    let mut i = hmac_sha512(&parent.chain_code, &[&[0u8], &parent.private_key, &index.to_be_bytes()])?;
    let result = split(&i);
    i.zeroize();
    Ok(result)
}

fn child_secp256k1(parent: &Slip10Result, index: Slip10RawIndex) -> Result<Slip10Result, WalletError> {
    let parent_scalar = valid_scalar(&parent.private_key)
        .ok_or_else(|| WalletError::KeyDerivation("invalid parent key".into()))?;
    let mut data = Vec::with_capacity(37);
    if index.is_hardened() {
        data.push(0);
        data.extend_from_slice(&parent.private_key);
    } else {
        let secret = SecretKey::from_slice(&parent.private_key)
            .map_err(|e| WalletError::KeyDerivation(e.to_string()))?;
        data.extend_from_slice(secret.public_key().to_encoded_point(true).as_bytes());
    }
    data.extend_from_slice(&index.to_be_bytes());

    loop {
        let mut i = hmac_sha512(&parent.chain_code, &[&data])?;
        let child = scalar(&i[..32]).map(|il| il + parent_scalar).filter(|k| !bool::from(k.is_zero()));
        if let Some(child) = child {
            let mut result = split(&i);
            result.private_key.copy_from_slice(&child.to_bytes());
            i.zeroize();
            data.zeroize();
            return Ok(result);
        }
        // IL out of range or zero child: retry with 0x01 || IR || index
        data.clear();
        data.push(1);
        data.extend_from_slice(&i[32..]);
        data.extend_from_slice(&index.to_be_bytes());
        i.zeroize();
    }
}

/// Derives the node at `path` below the master node of `seed`.
pub fn derive_path(curve: Slip10Curve, seed: &[u8], path: &[Slip10RawIndex]) -> Result<Slip10Result, WalletError> {
    let mut node = master(curve, seed)?;
    for index in path {
        node = match curve {
            Slip10Curve::Ed25519 => child_ed25519(&node, *index),
            Slip10Curve::Secp256k1 => child_secp256k1(&node, *index),
        }
        .map_err(|e| match e {
            WalletError::InvalidPath(msg) => WalletError::InvalidPath(format!("{msg} in {}", path_to_string(path))),
            other => other,
        })?;
    }
    Ok(node)
}
