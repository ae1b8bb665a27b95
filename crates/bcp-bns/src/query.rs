//! Decoders for state objects returned by chain queries.

use bcp_core::error::CodecError;
use bcp_core::transactions::{ChainAddressPair, Electors, ProposalAction};
use bcp_core::types::{Address, ChainId};

use crate::address::{AddressPrefix, address_prefix, encode_bns_address};
use crate::decode::{decode_electors, decode_numeric_id, decode_raw_proposal_option, ensure};
use crate::proto::{gov, username};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnsUsernameNft {
    pub id: String,
    pub owner: Address,
    pub targets: Vec<ChainAddressPair>,
}

/// `key` is the username the token is stored under.
pub fn decode_username_nft(
    key: &[u8],
    token: &username::Token,
    registry_chain_id: &ChainId,
) -> Result<BnsUsernameNft, CodecError> {
    let id = String::from_utf8(key.to_vec()).map_err(|e| CodecError::Decode(format!("username: {e}")))?;
    if token.owner.is_empty() {
        return Err(CodecError::MissingField("owner".into()));
    }
    let targets = token
        .targets
        .iter()
        .enumerate()
        .map(|(i, t)| {
            if t.blockchain_id.is_empty() {
                return Err(CodecError::MissingField(format!("targets[{i}].blockchainId")));
            }
            Ok(ChainAddressPair { chain_id: ChainId(t.blockchain_id.clone()), address: Address(t.address.clone()) })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BnsUsernameNft {
        id,
        owner: encode_bns_address(address_prefix(registry_chain_id), &token.owner)?,
        targets,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Electorate {
    pub id: u64,
    pub version: u32,
    pub admin: Address,
    pub title: String,
    pub electors: Electors,
    pub total_weight: u64,
}

pub fn decode_electorate(
    prefix: AddressPrefix,
    id: u64,
    electorate: &gov::Electorate,
) -> Result<Electorate, CodecError> {
    if electorate.admin.is_empty() {
        return Err(CodecError::MissingField("admin".into()));
    }
    Ok(Electorate {
        id,
        version: electorate.version,
        admin: encode_bns_address(prefix, &electorate.admin)?,
        title: electorate.title.clone(),
        electors: decode_electors(prefix, &electorate.electors)?,
        total_weight: electorate.total_electorate_weight,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    Submitted,
    Closed,
    Withdrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalResult {
    Undefined,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalExecutorResult {
    NotRun,
    Succeeded,
    Failed,
}

pub fn decode_proposal_status(value: i32) -> Result<ProposalStatus, CodecError> {
    match value {
        gov::PROPOSAL_STATUS_SUBMITTED => Ok(ProposalStatus::Submitted),
        gov::PROPOSAL_STATUS_CLOSED => Ok(ProposalStatus::Closed),
        gov::PROPOSAL_STATUS_WITHDRAWN => Ok(ProposalStatus::Withdrawn),
        gov::PROPOSAL_STATUS_INVALID => Err(CodecError::Validation("PROPOSAL_STATUS_INVALID must not be used".into())),
        other => Err(CodecError::Validation(format!("unknown proposal status {other}"))),
    }
}

pub fn decode_proposal_result(value: i32) -> Result<ProposalResult, CodecError> {
    match value {
        gov::PROPOSAL_RESULT_UNDEFINED => Ok(ProposalResult::Undefined),
        gov::PROPOSAL_RESULT_ACCEPTED => Ok(ProposalResult::Accepted),
        gov::PROPOSAL_RESULT_REJECTED => Ok(ProposalResult::Rejected),
        gov::PROPOSAL_RESULT_INVALID => Err(CodecError::Validation("PROPOSAL_RESULT_INVALID must not be used".into())),
        other => Err(CodecError::Validation(format!("unknown proposal result {other}"))),
    }
}

pub fn decode_executor_result(value: i32) -> Result<ProposalExecutorResult, CodecError> {
    match value {
        gov::EXECUTOR_RESULT_NOT_RUN => Ok(ProposalExecutorResult::NotRun),
        gov::EXECUTOR_RESULT_SUCCESS => Ok(ProposalExecutorResult::Succeeded),
        gov::EXECUTOR_RESULT_FAILURE => Ok(ProposalExecutorResult::Failed),
        gov::EXECUTOR_RESULT_INVALID => Err(CodecError::Validation("EXECUTOR_RESULT_INVALID must not be used".into())),
        other => Err(CodecError::Validation(format!("unknown executor result {other}"))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionedId {
    pub id: u64,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteState {
    pub total_yes: u64,
    pub total_no: u64,
    pub total_abstain: u64,
    pub total_electorate_weight: u64,
    pub quorum: Option<Fraction>,
    pub threshold: Fraction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub id: u64,
    pub title: String,
    pub action: ProposalAction,
    pub description: String,
    pub election_rule: VersionedId,
    pub electorate: VersionedId,
    pub voting_start_time: i64,
    pub voting_end_time: i64,
    pub submission_time: i64,
    pub author: Address,
    pub state: VoteState,
    pub status: ProposalStatus,
    pub result: ProposalResult,
    pub executor_result: ProposalExecutorResult,
}

fn decode_versioned_id(value: Option<&gov::VersionedIdRef>, field: &str) -> Result<VersionedId, CodecError> {
    let value = ensure(value, field)?;
    Ok(VersionedId { id: decode_numeric_id(&value.id, &format!("{field}.id"))?, version: value.version })
}

fn decode_fraction(value: &gov::Fraction) -> Fraction {
    Fraction { numerator: value.numerator, denominator: value.denominator }
}

fn decode_vote_state(state: &gov::TallyResult) -> Result<VoteState, CodecError> {
    Ok(VoteState {
        total_yes: state.total_yes,
        total_no: state.total_no,
        total_abstain: state.total_abstain,
        total_electorate_weight: state.total_electorate_weight,
        quorum: state.quorum.as_ref().map(decode_fraction),
        threshold: decode_fraction(ensure(state.threshold.as_ref(), "voteState.threshold")?),
    })
}

pub fn decode_proposal(prefix: AddressPrefix, id: u64, proposal: &gov::Proposal) -> Result<Proposal, CodecError> {
    if proposal.raw_option.is_empty() {
        return Err(CodecError::MissingField("rawOption".into()));
    }
    let action = decode_raw_proposal_option(prefix, &proposal.raw_option).map_err(|e| e.context("rawOption"))?;
    if proposal.author.is_empty() {
        return Err(CodecError::MissingField("author".into()));
    }
    Ok(Proposal {
        id,
        title: proposal.title.clone(),
        action,
        description: proposal.description.clone(),
        election_rule: decode_versioned_id(proposal.election_rule_ref.as_ref(), "electionRuleRef")?,
        electorate: decode_versioned_id(proposal.electorate_ref.as_ref(), "electorateRef")?,
        voting_start_time: proposal.voting_start_time,
        voting_end_time: proposal.voting_end_time,
        submission_time: proposal.submission_time,
        author: encode_bns_address(prefix, &proposal.author)?,
        state: decode_vote_state(ensure(proposal.vote_state.as_ref(), "voteState")?)?,
        status: decode_proposal_status(proposal.status)?,
        result: decode_proposal_result(proposal.result)?,
        executor_result: decode_executor_result(proposal.executor_result)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_numeric_id, encode_proposal_option};
    use crate::proto::Metadata;
    use prost::Message;

    fn proposal() -> gov::Proposal {
        let action = ProposalAction::CreateTextResolution { resolution: "be nice".into() };
        gov::Proposal {
            metadata: Metadata::current(),
            title: "Kindness".into(),
            raw_option: encode_proposal_option(&action).unwrap().encode_to_vec(),
            description: "A resolution".into(),
            election_rule_ref: Some(gov::VersionedIdRef { id: encode_numeric_id(2), version: 1 }),
            electorate_ref: Some(gov::VersionedIdRef { id: encode_numeric_id(3), version: 4 }),
            voting_start_time: 100,
            voting_end_time: 200,
            submission_time: 90,
            author: vec![7; 20],
            vote_state: Some(gov::TallyResult {
                total_yes: 5,
                total_no: 1,
                total_abstain: 0,
                total_electorate_weight: 10,
                quorum: None,
                threshold: Some(gov::Fraction { numerator: 1, denominator: 2 }),
            }),
            status: gov::PROPOSAL_STATUS_CLOSED,
            result: gov::PROPOSAL_RESULT_ACCEPTED,
            executor_result: gov::EXECUTOR_RESULT_SUCCESS,
        }
    }

    #[test]
    fn proposal_decodes() {
        let decoded = decode_proposal(AddressPrefix::Tiov, 9, &proposal()).unwrap();
        assert_eq!(decoded.id, 9);
        assert_eq!(decoded.action, ProposalAction::CreateTextResolution { resolution: "be nice".into() });
        assert_eq!(decoded.electorate, VersionedId { id: 3, version: 4 });
        assert_eq!(decoded.status, ProposalStatus::Closed);
        assert_eq!(decoded.result, ProposalResult::Accepted);
        assert_eq!(decoded.executor_result, ProposalExecutorResult::Succeeded);
        assert_eq!(decoded.state.threshold, Fraction { numerator: 1, denominator: 2 });
    }

    #[test]
    fn proposal_invalid_sentinels_rejected() {
        let mut p = proposal();
        p.status = gov::PROPOSAL_STATUS_INVALID;
        assert!(decode_proposal(AddressPrefix::Tiov, 1, &p).is_err());

        let mut p = proposal();
        p.result = gov::PROPOSAL_RESULT_INVALID;
        assert!(decode_proposal(AddressPrefix::Tiov, 1, &p).is_err());

        let mut p = proposal();
        p.executor_result = gov::EXECUTOR_RESULT_INVALID;
        assert!(decode_proposal(AddressPrefix::Tiov, 1, &p).is_err());
    }

    #[test]
    fn electorate_decodes() {
        let electorate = gov::Electorate {
            metadata: Metadata::current(),
            admin: vec![1; 20],
            title: "Council".into(),
            electors: vec![
                gov::Elector { address: vec![2; 20], weight: 3 },
                gov::Elector { address: vec![3; 20], weight: 4 },
            ],
            total_electorate_weight: 7,
            version: 2,
        };
        let decoded = decode_electorate(AddressPrefix::Iov, 5, &electorate).unwrap();
        assert_eq!(decoded.electors.len(), 2);
        assert_eq!(decoded.total_weight, 7);
        assert!(decoded.admin.as_str().starts_with("iov1"));
    }

    #[test]
    fn username_nft_decodes() {
        let token = username::Token {
            metadata: Metadata::current(),
            targets: vec![username::BlockchainAddress {
                blockchain_id: "ethereum-eip155-1".into(),
                address: "0x0A65766695A712Af41B5cfECAaD217B1a11CB22A".into(),
            }],
            owner: vec![9; 20],
        };
        let nft = decode_username_nft(b"alice*iov", &token, &ChainId::new("iov-mainnet")).unwrap();
        assert_eq!(nft.id, "alice*iov");
        assert!(nft.owner.as_str().starts_with("iov1"));
        assert_eq!(nft.targets[0].chain_id.as_str(), "ethereum-eip155-1");
    }

    #[test]
    fn username_nft_requires_owner() {
        let token = username::Token { metadata: Metadata::current(), targets: vec![], owner: vec![] };
        let err = decode_username_nft(b"bob*iov", &token, &ChainId::new("x")).unwrap_err();
        assert_eq!(err, CodecError::MissingField("owner".into()));
    }
}
