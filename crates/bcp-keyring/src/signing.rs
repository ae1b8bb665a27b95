//! Key pair helpers and the signature formats wallets produce.

use ed25519_dalek::Signer;
use k256::ecdsa::SigningKey;

use bcp_core::crypto::prehash;
use bcp_core::types::PrehashType;

use crate::error::WalletError;

fn ed25519_key(privkey: &[u8]) -> Result<ed25519_dalek::SigningKey, WalletError> {
    let bytes: &[u8; 32] = privkey
        .try_into()
        .map_err(|_| WalletError::InvalidKey(format!("ed25519 private key must be 32 bytes, got {}", privkey.len())))?;
    Ok(ed25519_dalek::SigningKey::from_bytes(bytes))
}

fn secp256k1_key(privkey: &[u8]) -> Result<SigningKey, WalletError> {
    SigningKey::from_slice(privkey).map_err(|e| WalletError::InvalidKey(format!("secp256k1: {e}")))
}

pub fn ed25519_pubkey(privkey: &[u8]) -> Result<Vec<u8>, WalletError> {
    Ok(ed25519_key(privkey)?.verifying_key().to_bytes().to_vec())
}

/// Uncompressed, 65 bytes.
pub fn secp256k1_pubkey(privkey: &[u8]) -> Result<Vec<u8>, WalletError> {
    Ok(secp256k1_key(privkey)?.verifying_key().to_encoded_point(false).as_bytes().to_vec())
}

/// Signs the prehashed message. 64 bytes.
pub fn sign_ed25519(privkey: &[u8], message: &[u8], prehash_type: PrehashType) -> Result<Vec<u8>, WalletError> {
    let key = ed25519_key(privkey)?;
    Ok(key.sign(&prehash(message, prehash_type)).to_bytes().to_vec())
}

/// Recoverable signature `r || s || recovery`, 65 bytes. Needs a 32-byte digest.
pub fn sign_secp256k1(privkey: &[u8], message: &[u8], prehash_type: PrehashType) -> Result<Vec<u8>, WalletError> {
    if !matches!(prehash_type, PrehashType::Sha256 | PrehashType::Keccak256) {
        return Err(WalletError::UnsupportedPrehash(prehash_type));
    }
    let key = secp256k1_key(privkey)?;
    let digest = prehash(message, prehash_type);
    let (signature, recovery) = key
        .sign_prehash_recoverable(&digest)
        .map_err(|e| WalletError::InvalidKey(format!("secp256k1 signing: {e}")))?;
    let mut out = signature.to_bytes().to_vec();
    out.push(recovery.to_byte());
    Ok(out)
}
