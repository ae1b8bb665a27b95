//! Wire messages to transaction model.
//!
//! Every function here fails on the first missing or invalid field.

use num_bigint::BigUint;
use prost::Message;

use bcp_core::error::CodecError;
use bcp_core::transactions::{
    ChainAddressPair, CreateEscrowTx, CreateMultisignatureTx, CreateProposalTx, ElectorProperties, Electors,
    Participant, ProposalAction, RegisterUsernameTx, ReleaseEscrowTx, ReturnEscrowTx, SendTx, SignedTransaction,
    SwapAbortTx, SwapClaimTx, SwapOfferTx, TallyTx, TxKind, UnsignedTransaction, UpdateEscrowPartiesTx,
    UpdateMultisignatureTx, UpdateTargetsOfUsernameTx, ValidatorProperties, Validators, VoteOption, VoteTx,
};
use bcp_core::types::{
    Address, Amount, ChainId, Fee, FullSignature, Identity, Nonce, PubkeyBundle, SwapId, SwapTimeout, TokenTicker,
};

use crate::address::{AddressPrefix, address_prefix, encode_bns_address, identity_to_address};
use crate::encode::FRACTIONAL_DIGITS;
use crate::proto::bnsd::{ProposalOption, ProposalOptions, Tx, TxMsg};
use crate::proto::{aswap, cash, coin, crypto, escrow, gov, multisig, sigs, username, validators};

const FRACTIONAL_SCALE: i64 = 1_000_000_000;

pub(crate) fn ensure<T>(value: Option<T>, field: &str) -> Result<T, CodecError> {
    value.ok_or_else(|| CodecError::MissingField(field.to_string()))
}

fn ensure_bytes<'a>(value: &'a [u8], field: &str) -> Result<&'a [u8], CodecError> {
    if value.is_empty() {
        return Err(CodecError::MissingField(field.to_string()));
    }
    Ok(value)
}

fn optional_string(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub fn decode_pubkey(pubkey: &crypto::PublicKey) -> Result<PubkeyBundle, CodecError> {
    match &pubkey.ed25519 {
        Some(data) => Ok(PubkeyBundle::ed25519(data.clone())),
        None => Err(CodecError::Validation("unknown public key algorithm".into())),
    }
}

pub fn decode_signature(signature: &crypto::Signature) -> Result<Vec<u8>, CodecError> {
    match &signature.ed25519 {
        Some(data) => Ok(data.clone()),
        None => Err(CodecError::Validation("unknown signature algorithm".into())),
    }
}

pub fn decode_full_signature(signature: &sigs::StdSignature) -> Result<FullSignature, CodecError> {
    Ok(FullSignature {
        nonce: Nonce(signature.sequence),
        pubkey: decode_pubkey(ensure(signature.pubkey.as_ref(), "pubkey")?)?,
        signature: decode_signature(ensure(signature.signature.as_ref(), "signature")?)?,
    })
}

/// Recombines `whole * 10^9 + fractional` without leaving integer space.
pub fn decode_amount(coin: &coin::Coin) -> Result<Amount, CodecError> {
    if coin.whole < 0 {
        return Err(CodecError::Validation("component `whole` must not be negative".into()));
    }
    if coin.fractional < 0 {
        return Err(CodecError::Validation("component `fractional` must not be negative".into()));
    }
    if coin.fractional >= FRACTIONAL_SCALE {
        return Err(CodecError::Validation(format!(
            "component `fractional` must be less than {FRACTIONAL_SCALE}"
        )));
    }
    let quantity = BigUint::from(coin.whole as u64) * BigUint::from(FRACTIONAL_SCALE as u64)
        + BigUint::from(coin.fractional as u64);
    Ok(Amount {
        quantity: quantity.to_string(),
        fractional_digits: FRACTIONAL_DIGITS,
        token_ticker: TokenTicker(coin.ticker.clone()),
    })
}

fn decode_amounts(coins: &[coin::Coin]) -> Result<Vec<Amount>, CodecError> {
    coins.iter().map(decode_amount).collect()
}

/// Inverse of [`crate::encode::encode_numeric_id`]. Values wider than 64
/// bits are rejected rather than truncated.
pub fn decode_numeric_id(data: &[u8], field: &str) -> Result<u64, CodecError> {
    let value = BigUint::from_bytes_be(ensure_bytes(data, field)?);
    u64::try_from(&value).map_err(|_| CodecError::Validation(format!("{field} out of range: {value}")))
}

fn decode_address(prefix: AddressPrefix, data: &[u8], field: &str) -> Result<Address, CodecError> {
    encode_bns_address(prefix, ensure_bytes(data, field)?)
}

pub fn decode_participants(
    prefix: AddressPrefix,
    participants: &[multisig::Participant],
) -> Result<Vec<Participant>, CodecError> {
    if participants.is_empty() {
        return Err(CodecError::MissingField("participants".into()));
    }
    participants
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if p.weight == 0 {
                return Err(CodecError::MissingField(format!("participants.${i}.weight")));
            }
            Ok(Participant {
                address: decode_address(prefix, &p.signature, &format!("participants.${i}.signature"))?,
                weight: p.weight,
            })
        })
        .collect()
}

/// Folds an elector list into an address-keyed map.
pub fn decode_electors(prefix: AddressPrefix, electors: &[gov::Elector]) -> Result<Electors, CodecError> {
    electors.iter().enumerate().try_fold(Electors::new(), |mut map, (i, elector)| {
        let address = decode_address(prefix, &elector.address, &format!("electors.${i}.address"))?;
        if elector.weight == 0 {
            return Err(CodecError::MissingField(format!("electors.${i}.weight")));
        }
        if map.insert(address.clone(), ElectorProperties { weight: elector.weight }).is_some() {
            return Err(CodecError::Validation(format!("duplicate elector {address} at electors.${i}")));
        }
        Ok(map)
    })
}

fn decode_targets(targets: &[username::BlockchainAddress]) -> Result<Vec<ChainAddressPair>, CodecError> {
    targets
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            if pair.blockchain_id.is_empty() {
                return Err(CodecError::MissingField(format!("targets.${i}.blockchainId")));
            }
            if pair.address.is_empty() {
                return Err(CodecError::MissingField(format!("targets.${i}.address")));
            }
            Ok(ChainAddressPair { chain_id: ChainId(pair.blockchain_id.clone()), address: Address(pair.address.clone()) })
        })
        .collect()
}

pub fn decode_vote_option(value: i32) -> Result<VoteOption, CodecError> {
    match value {
        gov::VOTE_OPTION_YES => Ok(VoteOption::Yes),
        gov::VOTE_OPTION_NO => Ok(VoteOption::No),
        gov::VOTE_OPTION_ABSTAIN => Ok(VoteOption::Abstain),
        gov::VOTE_OPTION_INVALID => Err(CodecError::Validation("VOTE_OPTION_INVALID must not be used".into())),
        other => Err(CodecError::Validation(format!("unknown vote option {other}"))),
    }
}

fn decode_validators(updates: &[validators::ValidatorUpdate]) -> Result<Validators, CodecError> {
    updates.iter().enumerate().try_fold(Validators::new(), |mut map, (i, update)| {
        let pub_key = ensure(update.pub_key.as_ref(), &format!("validatorUpdates.${i}.pubKey"))?;
        let data = ensure_bytes(&pub_key.data, &format!("validatorUpdates.${i}.pubKey.data"))?;
        map.insert(format!("ed25519_{}", hex::encode(data)), ValidatorProperties { power: update.power });
        Ok(map)
    })
}

/// Decodes the nested `rawOption` of a proposal.
pub fn decode_raw_proposal_option(prefix: AddressPrefix, raw: &[u8]) -> Result<ProposalAction, CodecError> {
    let options = ProposalOptions::decode(raw).map_err(|e| CodecError::Decode(e.to_string()))?;
    let mut found = options.options();
    if found.len() > 1 {
        return Err(CodecError::Validation("multiple proposal options set".into()));
    }
    match found.pop() {
        Some(ProposalOption::GovCreateTextResolution(msg)) => {
            Ok(ProposalAction::CreateTextResolution { resolution: msg.resolution })
        }
        Some(ProposalOption::ValidatorsApplyDiff(msg)) => {
            Ok(ProposalAction::SetValidators { validator_updates: decode_validators(&msg.validator_updates)? })
        }
        Some(ProposalOption::GovUpdateElectorate(msg)) => Ok(ProposalAction::UpdateElectorate {
            electorate_id: decode_numeric_id(&msg.electorate_id, "electorateId")?,
            diff_electors: decode_electors(prefix, &msg.diff_electors)?,
        }),
        None => Err(CodecError::Validation("unsupported proposal option".into())),
    }
}

// Token sends and atomic swaps

fn parse_send(creator: &Identity, prefix: AddressPrefix, msg: &cash::SendMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::Send(SendTx {
        sender: identity_to_address(creator)?,
        recipient: decode_address(prefix, &msg.destination, "destination")?,
        amount: decode_amount(ensure(msg.amount.as_ref(), "amount")?)?,
        memo: optional_string(&msg.memo),
    }))
}

fn parse_swap_offer(prefix: AddressPrefix, msg: &aswap::CreateMsg) -> Result<TxKind, CodecError> {
    let hash = ensure_bytes(&msg.preimage_hash, "preimageHash")?;
    if hash.len() != 32 {
        return Err(CodecError::Validation("hash must be 32 bytes (sha256)".into()));
    }
    if msg.timeout == 0 {
        return Err(CodecError::MissingField("timeout".into()));
    }
    Ok(TxKind::SwapOffer(SwapOfferTx {
        swap_id: None,
        recipient: decode_address(prefix, &msg.destination, "destination")?,
        amounts: decode_amounts(&msg.amount)?,
        hash: hash.to_vec(),
        timeout: SwapTimeout::Timestamp(msg.timeout),
        memo: optional_string(&msg.memo),
    }))
}

fn parse_swap_claim(msg: &aswap::ReleaseMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::SwapClaim(SwapClaimTx {
        swap_id: SwapId(ensure_bytes(&msg.swap_id, "swapId")?.to_vec()),
        preimage: ensure_bytes(&msg.preimage, "preimage")?.to_vec(),
    }))
}

fn parse_swap_abort(msg: &aswap::ReturnMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::SwapAbort(SwapAbortTx { swap_id: SwapId(ensure_bytes(&msg.swap_id, "swapId")?.to_vec()) }))
}

// Usernames

fn parse_register_username(msg: &username::RegisterTokenMsg) -> Result<TxKind, CodecError> {
    if msg.username.is_empty() {
        return Err(CodecError::MissingField("username".into()));
    }
    Ok(TxKind::RegisterUsername(RegisterUsernameTx {
        username: msg.username.clone(),
        targets: decode_targets(&msg.targets)?,
    }))
}

fn parse_update_targets(msg: &username::ChangeTokenTargetsMsg) -> Result<TxKind, CodecError> {
    if msg.username.is_empty() {
        return Err(CodecError::MissingField("username".into()));
    }
    Ok(TxKind::UpdateTargetsOfUsername(UpdateTargetsOfUsernameTx {
        username: msg.username.clone(),
        targets: decode_targets(&msg.new_targets)?,
    }))
}

// Multisignature contracts

fn ensure_threshold(value: u32, field: &str) -> Result<u32, CodecError> {
    if value == 0 {
        return Err(CodecError::MissingField(field.to_string()));
    }
    Ok(value)
}

fn parse_create_multisig(prefix: AddressPrefix, msg: &multisig::CreateMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::CreateMultisignature(CreateMultisignatureTx {
        participants: decode_participants(prefix, &msg.participants)?,
        activation_threshold: ensure_threshold(msg.activation_threshold, "activationThreshold")?,
        admin_threshold: ensure_threshold(msg.admin_threshold, "adminThreshold")?,
    }))
}

fn parse_update_multisig(prefix: AddressPrefix, msg: &multisig::UpdateMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::UpdateMultisignature(UpdateMultisignatureTx {
        contract_id: ensure_bytes(&msg.contract_id, "contractId")?.to_vec(),
        participants: decode_participants(prefix, &msg.participants)?,
        activation_threshold: ensure_threshold(msg.activation_threshold, "activationThreshold")?,
        admin_threshold: ensure_threshold(msg.admin_threshold, "adminThreshold")?,
    }))
}

// Escrows

fn parse_create_escrow(prefix: AddressPrefix, msg: &escrow::CreateMsg) -> Result<TxKind, CodecError> {
    if msg.amount.is_empty() {
        return Err(CodecError::MissingField("amount".into()));
    }
    if msg.timeout == 0 {
        return Err(CodecError::MissingField("timeout".into()));
    }
    Ok(TxKind::CreateEscrow(CreateEscrowTx {
        sender: decode_address(prefix, &msg.source, "source")?,
        arbiter: decode_address(prefix, &msg.arbiter, "arbiter")?,
        recipient: decode_address(prefix, &msg.destination, "destination")?,
        amounts: decode_amounts(&msg.amount)?,
        timeout: SwapTimeout::Timestamp(msg.timeout),
        memo: optional_string(&msg.memo),
    }))
}

fn parse_release_escrow(msg: &escrow::ReleaseMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::ReleaseEscrow(ReleaseEscrowTx {
        escrow_id: decode_numeric_id(&msg.escrow_id, "escrowId")?,
        amounts: decode_amounts(&msg.amount)?,
    }))
}

fn parse_return_escrow(msg: &escrow::ReturnMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::ReturnEscrow(ReturnEscrowTx { escrow_id: decode_numeric_id(&msg.escrow_id, "escrowId")? }))
}

fn parse_update_escrow_parties(prefix: AddressPrefix, msg: &escrow::UpdatePartiesMsg) -> Result<TxKind, CodecError> {
    let optional = |data: &[u8]| -> Result<Option<Address>, CodecError> {
        if data.is_empty() { Ok(None) } else { encode_bns_address(prefix, data).map(Some) }
    };
    Ok(TxKind::UpdateEscrowParties(UpdateEscrowPartiesTx {
        escrow_id: decode_numeric_id(&msg.escrow_id, "escrowId")?,
        sender: optional(&msg.source)?,
        arbiter: optional(&msg.arbiter)?,
        recipient: optional(&msg.destination)?,
    }))
}

// Governance

fn parse_create_proposal(prefix: AddressPrefix, msg: &gov::CreateProposalMsg) -> Result<TxKind, CodecError> {
    let raw_option = ensure_bytes(&msg.raw_option, "rawOption")?;
    let action = decode_raw_proposal_option(prefix, raw_option).map_err(|e| e.context("rawOption"))?;
    Ok(TxKind::CreateProposal(CreateProposalTx {
        title: msg.title.clone(),
        action,
        description: msg.description.clone(),
        election_rule_id: decode_numeric_id(&msg.election_rule_id, "electionRuleId")?,
        start_time: msg.start_time,
        author: decode_address(prefix, &msg.author, "author")?,
    }))
}

fn parse_vote(msg: &gov::VoteMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::Vote(VoteTx {
        proposal_id: decode_numeric_id(&msg.proposal_id, "proposalId")?,
        selection: decode_vote_option(msg.selected)?,
    }))
}

fn parse_tally(msg: &gov::TallyMsg) -> Result<TxKind, CodecError> {
    Ok(TxKind::Tally(TallyTx { proposal_id: decode_numeric_id(&msg.proposal_id, "proposalId")? }))
}

/// Routes the single populated message slot to its parser.
pub fn parse_msg(creator: &Identity, tx: &Tx) -> Result<TxKind, CodecError> {
    let prefix = address_prefix(&creator.chain_id);
    let mut msgs = tx.msgs();
    if msgs.len() > 1 {
        return Err(CodecError::Validation(format!("expected exactly one message, got {}", msgs.len())));
    }
    let Some(msg) = msgs.pop() else {
        return Err(CodecError::UnknownMessageType);
    };
    match msg {
        TxMsg::CashSend(m) => parse_send(creator, prefix, &m),
        TxMsg::AswapCreate(m) => parse_swap_offer(prefix, &m),
        TxMsg::AswapRelease(m) => parse_swap_claim(&m),
        TxMsg::AswapReturn(m) => parse_swap_abort(&m),
        TxMsg::UsernameRegisterToken(m) => parse_register_username(&m),
        TxMsg::UsernameChangeTokenTargets(m) => parse_update_targets(&m),
        TxMsg::MultisigCreate(m) => parse_create_multisig(prefix, &m),
        TxMsg::MultisigUpdate(m) => parse_update_multisig(prefix, &m),
        TxMsg::EscrowCreate(m) => parse_create_escrow(prefix, &m),
        TxMsg::EscrowRelease(m) => parse_release_escrow(&m),
        TxMsg::EscrowReturn(m) => parse_return_escrow(&m),
        TxMsg::EscrowUpdateParties(m) => parse_update_escrow_parties(prefix, &m),
        TxMsg::GovCreateProposal(m) => parse_create_proposal(prefix, &m),
        TxMsg::GovVote(m) => parse_vote(&m),
        TxMsg::GovTally(m) => parse_tally(&m),
    }
}

fn parse_fee(tx: &Tx) -> Result<Option<Fee>, CodecError> {
    match tx.fees.as_ref().and_then(|info| info.fees.as_ref()) {
        Some(coin) => Ok(Some(Fee::tokens(decode_amount(coin)?))),
        None => Ok(None),
    }
}

/// The creator is taken from the first signature's public key.
pub fn parse_tx(tx: &Tx, chain_id: &ChainId) -> Result<SignedTransaction, CodecError> {
    let mut signatures = tx
        .signatures
        .iter()
        .map(decode_full_signature)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let primary_signature = signatures.next().ok_or_else(|| CodecError::MissingField("first signature".into()))?;
    let creator = Identity::new(chain_id.clone(), primary_signature.pubkey.clone());
    let kind = parse_msg(&creator, tx)?;
    Ok(SignedTransaction {
        transaction: UnsignedTransaction { creator, fee: parse_fee(tx)?, kind },
        primary_signature,
        other_signatures: signatures.collect(),
    })
}
