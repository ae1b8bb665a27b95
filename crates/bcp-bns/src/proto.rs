//! Wire schema of bnsd transactions and state objects.
//!
//! Defined by hand with `prost` derives, laid out per weave package. Every
//! message carries `metadata { schema: 1 }` as field 1. Enum fields are kept
//! as raw `i32` so the decoder can reject the `0` sentinel explicitly.

/// Schema version written into every message's metadata.
pub const SCHEMA_VERSION: i32 = 1;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Metadata {
    #[prost(int32, tag = "1")]
    pub schema: i32,
}

impl Metadata {
    pub fn current() -> Option<Self> {
        Some(Self { schema: SCHEMA_VERSION })
    }
}

pub mod coin {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Coin {
        #[prost(int64, tag = "1")]
        pub whole: i64,
        #[prost(int64, tag = "2")]
        pub fractional: i64,
        #[prost(string, tag = "3")]
        pub ticker: String,
    }
}

pub mod crypto {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct PublicKey {
        #[prost(bytes = "vec", optional, tag = "1")]
        pub ed25519: Option<Vec<u8>>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Signature {
        #[prost(bytes = "vec", optional, tag = "1")]
        pub ed25519: Option<Vec<u8>>,
    }
}

pub mod sigs {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct StdSignature {
        #[prost(int64, tag = "1")]
        pub sequence: i64,
        #[prost(message, optional, tag = "2")]
        pub pubkey: Option<super::crypto::PublicKey>,
        #[prost(message, optional, tag = "4")]
        pub signature: Option<super::crypto::Signature>,
    }
}

pub mod cash {
    use super::Metadata;
    use super::coin::Coin;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct SendMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub source: Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub destination: Vec<u8>,
        #[prost(message, optional, tag = "4")]
        pub amount: Option<Coin>,
        #[prost(string, tag = "5")]
        pub memo: String,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct FeeInfo {
        #[prost(bytes = "vec", tag = "2")]
        pub payer: Vec<u8>,
        #[prost(message, optional, tag = "3")]
        pub fees: Option<Coin>,
    }
}

pub mod aswap {
    use super::Metadata;
    use super::coin::Coin;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct CreateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub source: Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub preimage_hash: Vec<u8>,
        #[prost(bytes = "vec", tag = "4")]
        pub destination: Vec<u8>,
        #[prost(message, repeated, tag = "5")]
        pub amount: Vec<Coin>,
        #[prost(int64, tag = "6")]
        pub timeout: i64,
        #[prost(string, tag = "7")]
        pub memo: String,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ReleaseMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub swap_id: Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub preimage: Vec<u8>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ReturnMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub swap_id: Vec<u8>,
    }
}

pub mod escrow {
    use super::Metadata;
    use super::coin::Coin;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct CreateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub source: Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub arbiter: Vec<u8>,
        #[prost(bytes = "vec", tag = "4")]
        pub destination: Vec<u8>,
        #[prost(message, repeated, tag = "5")]
        pub amount: Vec<Coin>,
        #[prost(int64, tag = "6")]
        pub timeout: i64,
        #[prost(string, tag = "7")]
        pub memo: String,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ReleaseMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub escrow_id: Vec<u8>,
        #[prost(message, repeated, tag = "3")]
        pub amount: Vec<Coin>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ReturnMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub escrow_id: Vec<u8>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct UpdatePartiesMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub escrow_id: Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub source: Vec<u8>,
        #[prost(bytes = "vec", tag = "4")]
        pub arbiter: Vec<u8>,
        #[prost(bytes = "vec", tag = "5")]
        pub destination: Vec<u8>,
    }
}

pub mod multisig {
    use super::Metadata;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Participant {
        #[prost(bytes = "vec", tag = "1")]
        pub signature: Vec<u8>,
        #[prost(uint32, tag = "2")]
        pub weight: u32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct CreateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(message, repeated, tag = "2")]
        pub participants: Vec<Participant>,
        #[prost(uint32, tag = "3")]
        pub activation_threshold: u32,
        #[prost(uint32, tag = "4")]
        pub admin_threshold: u32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct UpdateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub contract_id: Vec<u8>,
        #[prost(message, repeated, tag = "3")]
        pub participants: Vec<Participant>,
        #[prost(uint32, tag = "4")]
        pub activation_threshold: u32,
        #[prost(uint32, tag = "5")]
        pub admin_threshold: u32,
    }
}

pub mod username {
    use super::Metadata;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct BlockchainAddress {
        #[prost(string, tag = "1")]
        pub blockchain_id: String,
        #[prost(string, tag = "2")]
        pub address: String,
    }

    /// Stored username token; the username itself is the state key.
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Token {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(message, repeated, tag = "2")]
        pub targets: Vec<BlockchainAddress>,
        #[prost(bytes = "vec", tag = "3")]
        pub owner: Vec<u8>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RegisterTokenMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(string, tag = "2")]
        pub username: String,
        #[prost(message, repeated, tag = "3")]
        pub targets: Vec<BlockchainAddress>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ChangeTokenTargetsMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(string, tag = "2")]
        pub username: String,
        #[prost(message, repeated, tag = "3")]
        pub new_targets: Vec<BlockchainAddress>,
    }
}

pub mod validators {
    use super::Metadata;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct PubKey {
        #[prost(string, tag = "1")]
        pub r#type: String,
        #[prost(bytes = "vec", tag = "2")]
        pub data: Vec<u8>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ValidatorUpdate {
        #[prost(message, optional, tag = "1")]
        pub pub_key: Option<PubKey>,
        #[prost(int64, tag = "2")]
        pub power: i64,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ApplyDiffMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(message, repeated, tag = "2")]
        pub validator_updates: Vec<ValidatorUpdate>,
    }
}

pub mod gov {
    use super::Metadata;

    pub const VOTE_OPTION_INVALID: i32 = 0;
    pub const VOTE_OPTION_YES: i32 = 1;
    pub const VOTE_OPTION_NO: i32 = 2;
    pub const VOTE_OPTION_ABSTAIN: i32 = 3;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Elector {
        #[prost(bytes = "vec", tag = "1")]
        pub address: Vec<u8>,
        #[prost(uint32, tag = "2")]
        pub weight: u32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Electorate {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub admin: Vec<u8>,
        #[prost(string, tag = "3")]
        pub title: String,
        #[prost(message, repeated, tag = "4")]
        pub electors: Vec<Elector>,
        #[prost(uint64, tag = "5")]
        pub total_electorate_weight: u64,
        #[prost(uint32, tag = "6")]
        pub version: u32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct VersionedIdRef {
        #[prost(bytes = "vec", tag = "1")]
        pub id: Vec<u8>,
        #[prost(uint32, tag = "2")]
        pub version: u32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Fraction {
        #[prost(uint32, tag = "1")]
        pub numerator: u32,
        #[prost(uint32, tag = "2")]
        pub denominator: u32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct TallyResult {
        #[prost(uint64, tag = "1")]
        pub total_yes: u64,
        #[prost(uint64, tag = "2")]
        pub total_no: u64,
        #[prost(uint64, tag = "3")]
        pub total_abstain: u64,
        #[prost(uint64, tag = "4")]
        pub total_electorate_weight: u64,
        #[prost(message, optional, tag = "5")]
        pub quorum: Option<Fraction>,
        #[prost(message, optional, tag = "6")]
        pub threshold: Option<Fraction>,
    }

    pub const PROPOSAL_STATUS_INVALID: i32 = 0;
    pub const PROPOSAL_STATUS_SUBMITTED: i32 = 1;
    pub const PROPOSAL_STATUS_CLOSED: i32 = 2;
    pub const PROPOSAL_STATUS_WITHDRAWN: i32 = 3;

    pub const PROPOSAL_RESULT_INVALID: i32 = 0;
    pub const PROPOSAL_RESULT_UNDEFINED: i32 = 1;
    pub const PROPOSAL_RESULT_ACCEPTED: i32 = 2;
    pub const PROPOSAL_RESULT_REJECTED: i32 = 3;

    pub const EXECUTOR_RESULT_INVALID: i32 = 0;
    pub const EXECUTOR_RESULT_NOT_RUN: i32 = 1;
    pub const EXECUTOR_RESULT_SUCCESS: i32 = 2;
    pub const EXECUTOR_RESULT_FAILURE: i32 = 3;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Proposal {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(string, tag = "2")]
        pub title: String,
        #[prost(bytes = "vec", tag = "3")]
        pub raw_option: Vec<u8>,
        #[prost(string, tag = "4")]
        pub description: String,
        #[prost(message, optional, tag = "5")]
        pub election_rule_ref: Option<VersionedIdRef>,
        #[prost(message, optional, tag = "6")]
        pub electorate_ref: Option<VersionedIdRef>,
        #[prost(int64, tag = "7")]
        pub voting_start_time: i64,
        #[prost(int64, tag = "8")]
        pub voting_end_time: i64,
        #[prost(int64, tag = "9")]
        pub submission_time: i64,
        #[prost(bytes = "vec", tag = "10")]
        pub author: Vec<u8>,
        #[prost(message, optional, tag = "11")]
        pub vote_state: Option<TallyResult>,
        #[prost(int32, tag = "12")]
        pub status: i32,
        #[prost(int32, tag = "13")]
        pub result: i32,
        #[prost(int32, tag = "14")]
        pub executor_result: i32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct CreateProposalMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(string, tag = "2")]
        pub title: String,
        #[prost(bytes = "vec", tag = "3")]
        pub raw_option: Vec<u8>,
        #[prost(string, tag = "4")]
        pub description: String,
        #[prost(bytes = "vec", tag = "5")]
        pub election_rule_id: Vec<u8>,
        #[prost(int64, tag = "6")]
        pub start_time: i64,
        #[prost(bytes = "vec", tag = "7")]
        pub author: Vec<u8>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct VoteMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub proposal_id: Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub voter: Vec<u8>,
        #[prost(int32, tag = "4")]
        pub selected: i32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct TallyMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub proposal_id: Vec<u8>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct TextResolutionMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(string, tag = "2")]
        pub resolution: String,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct UpdateElectorateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: Option<Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub electorate_id: Vec<u8>,
        #[prost(message, repeated, tag = "3")]
        pub diff_electors: Vec<Elector>,
    }
}

pub mod bnsd {
    use super::{aswap, cash, escrow, gov, multisig, sigs, username, validators};

    /// Top-level transaction. Exactly one `*_msg` field is set.
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Tx {
        #[prost(message, optional, tag = "1")]
        pub fees: Option<cash::FeeInfo>,
        #[prost(message, repeated, tag = "2")]
        pub signatures: Vec<sigs::StdSignature>,
        #[prost(message, optional, tag = "51")]
        pub cash_send_msg: Option<cash::SendMsg>,
        #[prost(message, optional, tag = "52")]
        pub escrow_create_msg: Option<escrow::CreateMsg>,
        #[prost(message, optional, tag = "53")]
        pub escrow_release_msg: Option<escrow::ReleaseMsg>,
        #[prost(message, optional, tag = "54")]
        pub escrow_return_msg: Option<escrow::ReturnMsg>,
        #[prost(message, optional, tag = "55")]
        pub escrow_update_parties_msg: Option<escrow::UpdatePartiesMsg>,
        #[prost(message, optional, tag = "56")]
        pub multisig_create_msg: Option<multisig::CreateMsg>,
        #[prost(message, optional, tag = "57")]
        pub multisig_update_msg: Option<multisig::UpdateMsg>,
        #[prost(message, optional, tag = "61")]
        pub username_register_token_msg: Option<username::RegisterTokenMsg>,
        #[prost(message, optional, tag = "63")]
        pub username_change_token_targets_msg: Option<username::ChangeTokenTargetsMsg>,
        #[prost(message, optional, tag = "70")]
        pub aswap_create_msg: Option<aswap::CreateMsg>,
        #[prost(message, optional, tag = "71")]
        pub aswap_release_msg: Option<aswap::ReleaseMsg>,
        #[prost(message, optional, tag = "72")]
        pub aswap_return_msg: Option<aswap::ReturnMsg>,
        #[prost(message, optional, tag = "73")]
        pub gov_create_proposal_msg: Option<gov::CreateProposalMsg>,
        #[prost(message, optional, tag = "75")]
        pub gov_vote_msg: Option<gov::VoteMsg>,
        #[prost(message, optional, tag = "76")]
        pub gov_tally_msg: Option<gov::TallyMsg>,
    }

    /// The message slot of a [`Tx`], as an explicit sum type.
    #[derive(Clone, Debug, PartialEq)]
    pub enum TxMsg {
        CashSend(cash::SendMsg),
        EscrowCreate(escrow::CreateMsg),
        EscrowRelease(escrow::ReleaseMsg),
        EscrowReturn(escrow::ReturnMsg),
        EscrowUpdateParties(escrow::UpdatePartiesMsg),
        MultisigCreate(multisig::CreateMsg),
        MultisigUpdate(multisig::UpdateMsg),
        UsernameRegisterToken(username::RegisterTokenMsg),
        UsernameChangeTokenTargets(username::ChangeTokenTargetsMsg),
        AswapCreate(aswap::CreateMsg),
        AswapRelease(aswap::ReleaseMsg),
        AswapReturn(aswap::ReturnMsg),
        GovCreateProposal(gov::CreateProposalMsg),
        GovVote(gov::VoteMsg),
        GovTally(gov::TallyMsg),
    }

    impl Tx {
        pub fn set_msg(&mut self, msg: TxMsg) {
            match msg {
                TxMsg::CashSend(m) => self.cash_send_msg = Some(m),
                TxMsg::EscrowCreate(m) => self.escrow_create_msg = Some(m),
                TxMsg::EscrowRelease(m) => self.escrow_release_msg = Some(m),
                TxMsg::EscrowReturn(m) => self.escrow_return_msg = Some(m),
                TxMsg::EscrowUpdateParties(m) => self.escrow_update_parties_msg = Some(m),
                TxMsg::MultisigCreate(m) => self.multisig_create_msg = Some(m),
                TxMsg::MultisigUpdate(m) => self.multisig_update_msg = Some(m),
                TxMsg::UsernameRegisterToken(m) => self.username_register_token_msg = Some(m),
                TxMsg::UsernameChangeTokenTargets(m) => self.username_change_token_targets_msg = Some(m),
                TxMsg::AswapCreate(m) => self.aswap_create_msg = Some(m),
                TxMsg::AswapRelease(m) => self.aswap_release_msg = Some(m),
                TxMsg::AswapReturn(m) => self.aswap_return_msg = Some(m),
                TxMsg::GovCreateProposal(m) => self.gov_create_proposal_msg = Some(m),
                TxMsg::GovVote(m) => self.gov_vote_msg = Some(m),
                TxMsg::GovTally(m) => self.gov_tally_msg = Some(m),
            }
        }

        /// Every populated message slot.
        pub fn msgs(&self) -> Vec<TxMsg> {
            let slots = [
                self.cash_send_msg.clone().map(TxMsg::CashSend),
                self.escrow_create_msg.clone().map(TxMsg::EscrowCreate),
                self.escrow_release_msg.clone().map(TxMsg::EscrowRelease),
                self.escrow_return_msg.clone().map(TxMsg::EscrowReturn),
                self.escrow_update_parties_msg.clone().map(TxMsg::EscrowUpdateParties),
                self.multisig_create_msg.clone().map(TxMsg::MultisigCreate),
                self.multisig_update_msg.clone().map(TxMsg::MultisigUpdate),
                self.username_register_token_msg.clone().map(TxMsg::UsernameRegisterToken),
                self.username_change_token_targets_msg.clone().map(TxMsg::UsernameChangeTokenTargets),
                self.aswap_create_msg.clone().map(TxMsg::AswapCreate),
                self.aswap_release_msg.clone().map(TxMsg::AswapRelease),
                self.aswap_return_msg.clone().map(TxMsg::AswapReturn),
                self.gov_create_proposal_msg.clone().map(TxMsg::GovCreateProposal),
                self.gov_vote_msg.clone().map(TxMsg::GovVote),
                self.gov_tally_msg.clone().map(TxMsg::GovTally),
            ];
            slots.into_iter().flatten().collect()
        }
    }

    /// Governance action nested in `CreateProposalMsg.raw_option`.
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct ProposalOptions {
        #[prost(message, optional, tag = "58")]
        pub validators_apply_diff_msg: Option<validators::ApplyDiffMsg>,
        #[prost(message, optional, tag = "77")]
        pub gov_update_electorate_msg: Option<gov::UpdateElectorateMsg>,
        #[prost(message, optional, tag = "79")]
        pub gov_create_text_resolution_msg: Option<gov::TextResolutionMsg>,
    }

    #[derive(Clone, Debug, PartialEq)]
    pub enum ProposalOption {
        ValidatorsApplyDiff(validators::ApplyDiffMsg),
        GovUpdateElectorate(gov::UpdateElectorateMsg),
        GovCreateTextResolution(gov::TextResolutionMsg),
    }

    impl ProposalOptions {
        pub fn from_option(option: ProposalOption) -> Self {
            let mut options = Self::default();
            match option {
                ProposalOption::ValidatorsApplyDiff(m) => options.validators_apply_diff_msg = Some(m),
                ProposalOption::GovUpdateElectorate(m) => options.gov_update_electorate_msg = Some(m),
                ProposalOption::GovCreateTextResolution(m) => options.gov_create_text_resolution_msg = Some(m),
            }
            options
        }

        pub fn options(&self) -> Vec<ProposalOption> {
            let slots = [
                self.validators_apply_diff_msg.clone().map(ProposalOption::ValidatorsApplyDiff),
                self.gov_update_electorate_msg.clone().map(ProposalOption::GovUpdateElectorate),
                self.gov_create_text_resolution_msg.clone().map(ProposalOption::GovCreateTextResolution),
            ];
            slots.into_iter().flatten().collect()
        }
    }
}
