//! The contract every chain codec implements.

use crate::error::CodecError;
use crate::transactions::{SignedTransaction, UnsignedTransaction};
use crate::types::{Address, ChainId, Identity, Nonce, PostableBytes, SigningJob, TransactionId};

/// Bidirectional mapping between the transaction model and one chain's
/// wire format.
///
/// Implementations are stateless beyond their construction-time options
/// and may be shared across threads.
pub trait TxCodec: Send + Sync {
    /// Canonical, deterministic bytes to sign for `unsigned` at `nonce`.
    fn bytes_to_sign(&self, unsigned: &UnsignedTransaction, nonce: Nonce) -> Result<SigningJob, CodecError>;

    /// Exact bytes the chain's RPC layer accepts for broadcasting.
    fn bytes_to_post(&self, signed: &SignedTransaction) -> Result<PostableBytes, CodecError>;

    /// The chain's transaction hash computed from the postable bytes.
    fn identifier(&self, signed: &SignedTransaction) -> Result<TransactionId, CodecError>;

    /// Inverse of [`TxCodec::bytes_to_post`].
    fn parse_bytes(&self, bytes: &[u8], chain_id: &ChainId) -> Result<SignedTransaction, CodecError>;

    fn identity_to_address(&self, identity: &Identity) -> Result<Address, CodecError>;

    /// Format and checksum validation only.
    fn is_valid_address(&self, address: &str) -> bool;
}
