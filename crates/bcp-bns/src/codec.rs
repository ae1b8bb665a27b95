//! [`TxCodec`] implementation for BNS.

use prost::Message;
use tracing::debug;

use bcp_core::crypto::sha256;
use bcp_core::error::CodecError;
use bcp_core::traits::TxCodec;
use bcp_core::transactions::{SignedTransaction, UnsignedTransaction};
use bcp_core::types::{
    Address, ChainId, Identity, Nonce, PostableBytes, PrehashType, SigningJob, TransactionId,
};

use crate::address;
use crate::decode::parse_tx;
use crate::encode::{build_signed_tx, build_unsigned_tx};
use crate::proto::bnsd::Tx;

/// Version prefix of the signing bytes.
pub const SIGN_BYTES_VERSION: [u8; 4] = [0x00, 0xca, 0xfe, 0x00];

/// `version || len(chain_id) || chain_id || nonce (int64 BE) || tx`.
pub fn sign_bytes(tx_bytes: &[u8], chain_id: &ChainId, nonce: Nonce) -> Result<Vec<u8>, CodecError> {
    let chain = chain_id.as_str().as_bytes();
    let chain_len = u8::try_from(chain.len())
        .map_err(|_| CodecError::Validation(format!("chain id too long: {} bytes", chain.len())))?;
    let mut out = Vec::with_capacity(SIGN_BYTES_VERSION.len() + 1 + chain.len() + 8 + tx_bytes.len());
    out.extend_from_slice(&SIGN_BYTES_VERSION);
    out.push(chain_len);
    out.extend_from_slice(chain);
    out.extend_from_slice(&nonce.0.to_be_bytes());
    out.extend_from_slice(tx_bytes);
    Ok(out)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BnsCodec;

impl TxCodec for BnsCodec {
    fn bytes_to_sign(&self, unsigned: &UnsignedTransaction, nonce: Nonce) -> Result<SigningJob, CodecError> {
        let tx_bytes = build_unsigned_tx(unsigned)?.encode_to_vec();
        let bytes = sign_bytes(&tx_bytes, &unsigned.creator.chain_id, nonce)?;
        debug!(kind = unsigned.kind.name(), len = bytes.len(), "bns: built signing bytes");
        Ok(SigningJob { bytes, prehash_type: PrehashType::Sha512 })
    }

    fn bytes_to_post(&self, signed: &SignedTransaction) -> Result<PostableBytes, CodecError> {
        Ok(build_signed_tx(signed)?.encode_to_vec())
    }

    /// Uppercase hex SHA-256 of the postable bytes.
    fn identifier(&self, signed: &SignedTransaction) -> Result<TransactionId, CodecError> {
        let hash = sha256(&self.bytes_to_post(signed)?);
        Ok(TransactionId(hex::encode_upper(hash)))
    }

    fn parse_bytes(&self, bytes: &[u8], chain_id: &ChainId) -> Result<SignedTransaction, CodecError> {
        let tx = Tx::decode(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        parse_tx(&tx, chain_id)
    }

    fn identity_to_address(&self, identity: &Identity) -> Result<Address, CodecError> {
        address::identity_to_address(identity)
    }

    fn is_valid_address(&self, address: &str) -> bool {
        address::is_valid_address(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcp_core::transactions::{SwapClaimTx, TxKind};
    use bcp_core::types::{FullSignature, PubkeyBundle, SwapId};

    fn creator() -> Identity {
        Identity::new(ChainId::new("test-123"), PubkeyBundle::ed25519(vec![0x11; 32]))
    }

    fn claim() -> UnsignedTransaction {
        UnsignedTransaction::new(
            creator(),
            TxKind::SwapClaim(SwapClaimTx { swap_id: SwapId(vec![1, 2, 3]), preimage: vec![0xaa; 32] }),
        )
    }

    #[test]
    fn sign_bytes_layout() {
        let bytes = sign_bytes(&[0xde, 0xad], &ChainId::new("abc"), Nonce(0x0102)).unwrap();
        assert_eq!(hex::encode(bytes), "00cafe00036162630000000000000102dead");
    }

    #[test]
    fn signing_job_is_deterministic_and_sha512() {
        let a = BnsCodec.bytes_to_sign(&claim(), Nonce(7)).unwrap();
        let b = BnsCodec.bytes_to_sign(&claim(), Nonce(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.prehash_type, PrehashType::Sha512);
        assert_eq!(&a.bytes[..4], &SIGN_BYTES_VERSION);
        assert_ne!(a.bytes, BnsCodec.bytes_to_sign(&claim(), Nonce(8)).unwrap().bytes);
    }

    #[test]
    fn post_parse_roundtrip_and_identifier() {
        let signed = SignedTransaction::new(
            claim(),
            FullSignature { nonce: Nonce(7), pubkey: creator().pubkey, signature: vec![0x55; 64] },
        );
        let bytes = BnsCodec.bytes_to_post(&signed).unwrap();
        let parsed = BnsCodec.parse_bytes(&bytes, &ChainId::new("test-123")).unwrap();
        assert_eq!(parsed, signed);

        let id = BnsCodec.identifier(&signed).unwrap();
        assert_eq!(id.as_str().len(), 64);
        assert_eq!(id.as_str(), id.as_str().to_uppercase());
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!(matches!(
            BnsCodec.parse_bytes(&[0xff, 0xff, 0xff], &ChainId::new("x")),
            Err(CodecError::Decode(_))
        ));
    }
}
