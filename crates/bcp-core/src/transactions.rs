//! Chain-agnostic transaction model.
//!
//! Every transaction kind is a variant of the closed [`TxKind`] enum, so
//! codecs dispatch by exhaustive `match` and a new kind fails to compile
//! until every codec handles it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, ChainId, Fee, FullSignature, Identity, SwapId, SwapTimeout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub creator: Identity,
    pub fee: Option<Fee>,
    pub kind: TxKind,
}

impl UnsignedTransaction {
    pub fn new(creator: Identity, kind: TxKind) -> Self {
        Self { creator, fee: None, kind }
    }

    pub fn with_fee(mut self, fee: Fee) -> Self {
        self.fee = Some(fee);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub primary_signature: FullSignature,
    pub other_signatures: Vec<FullSignature>,
}

impl SignedTransaction {
    pub fn new(transaction: UnsignedTransaction, primary_signature: FullSignature) -> Self {
        Self { transaction, primary_signature, other_signatures: Vec::new() }
    }

    /// Primary signature followed by all others.
    pub fn signatures(&self) -> impl Iterator<Item = &FullSignature> {
        std::iter::once(&self.primary_signature).chain(self.other_signatures.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    Send(SendTx),
    SwapOffer(SwapOfferTx),
    SwapClaim(SwapClaimTx),
    SwapAbort(SwapAbortTx),
    RegisterUsername(RegisterUsernameTx),
    UpdateTargetsOfUsername(UpdateTargetsOfUsernameTx),
    CreateMultisignature(CreateMultisignatureTx),
    UpdateMultisignature(UpdateMultisignatureTx),
    CreateEscrow(CreateEscrowTx),
    ReleaseEscrow(ReleaseEscrowTx),
    ReturnEscrow(ReturnEscrowTx),
    UpdateEscrowParties(UpdateEscrowPartiesTx),
    CreateProposal(CreateProposalTx),
    Vote(VoteTx),
    Tally(TallyTx),
}

impl TxKind {
    /// Wire-independent kind tag, e.g. `bcp/send`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Send(_) => "bcp/send",
            Self::SwapOffer(_) => "bcp/swap_offer",
            Self::SwapClaim(_) => "bcp/swap_claim",
            Self::SwapAbort(_) => "bcp/swap_abort",
            Self::RegisterUsername(_) => "bns/register_username",
            Self::UpdateTargetsOfUsername(_) => "bns/update_targets_of_username",
            Self::CreateMultisignature(_) => "bns/create_multisignature_contract",
            Self::UpdateMultisignature(_) => "bns/update_multisignature_contract",
            Self::CreateEscrow(_) => "bns/create_escrow",
            Self::ReleaseEscrow(_) => "bns/release_escrow",
            Self::ReturnEscrow(_) => "bns/return_escrow",
            Self::UpdateEscrowParties(_) => "bns/update_escrow_parties",
            Self::CreateProposal(_) => "bns/create_proposal",
            Self::Vote(_) => "bns/vote",
            Self::Tally(_) => "bns/tally",
        }
    }
}

// Token sends and atomic swaps

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTx {
    pub sender: Address,
    pub recipient: Address,
    pub amount: Amount,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOfferTx {
    /// Chains that let the offerer pick the id (Ethereum) need it here.
    pub swap_id: Option<SwapId>,
    pub recipient: Address,
    pub amounts: Vec<Amount>,
    /// SHA-256 of the preimage.
    pub hash: Vec<u8>,
    pub timeout: SwapTimeout,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapClaimTx {
    pub swap_id: SwapId,
    pub preimage: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapAbortTx {
    pub swap_id: SwapId,
}

// Usernames

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainAddressPair {
    pub chain_id: ChainId,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUsernameTx {
    /// Full name including the namespace, e.g. `alice*iov`.
    pub username: String,
    pub targets: Vec<ChainAddressPair>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTargetsOfUsernameTx {
    pub username: String,
    pub targets: Vec<ChainAddressPair>,
}

// Multisignature contracts

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub address: Address,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMultisignatureTx {
    pub participants: Vec<Participant>,
    pub activation_threshold: u32,
    pub admin_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMultisignatureTx {
    pub contract_id: Vec<u8>,
    pub participants: Vec<Participant>,
    pub activation_threshold: u32,
    pub admin_threshold: u32,
}

// Escrows

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEscrowTx {
    pub sender: Address,
    pub arbiter: Address,
    pub recipient: Address,
    pub amounts: Vec<Amount>,
    pub timeout: SwapTimeout,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEscrowTx {
    pub escrow_id: u64,
    pub amounts: Vec<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnEscrowTx {
    pub escrow_id: u64,
}

/// Replaces exactly one of the escrow's parties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEscrowPartiesTx {
    pub escrow_id: u64,
    pub sender: Option<Address>,
    pub arbiter: Option<Address>,
    pub recipient: Option<Address>,
}

// Governance

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOption {
    Yes,
    No,
    Abstain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorProperties {
    pub power: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectorProperties {
    pub weight: u32,
}

/// Validator updates keyed by `ed25519_<pubkey hex>`.
pub type Validators = BTreeMap<String, ValidatorProperties>;

/// Elector weights keyed by address.
pub type Electors = BTreeMap<Address, ElectorProperties>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalAction {
    CreateTextResolution { resolution: String },
    SetValidators { validator_updates: Validators },
    UpdateElectorate { electorate_id: u64, diff_electors: Electors },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProposalTx {
    pub title: String,
    pub action: ProposalAction,
    pub description: String,
    pub election_rule_id: u64,
    /// Unix time in seconds.
    pub start_time: i64,
    pub author: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTx {
    pub proposal_id: u64,
    pub selection: VoteOption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyTx {
    pub proposal_id: u64,
}
