//! Transaction model to wire messages.

use bcp_core::error::CodecError;
use bcp_core::transactions::{
    ChainAddressPair, CreateEscrowTx, CreateMultisignatureTx, CreateProposalTx, Participant,
    ProposalAction, RegisterUsernameTx, ReleaseEscrowTx, ReturnEscrowTx, SendTx, SignedTransaction,
    SwapAbortTx, SwapClaimTx, SwapOfferTx, TallyTx, TxKind, UnsignedTransaction, UpdateEscrowPartiesTx,
    UpdateMultisignatureTx, UpdateTargetsOfUsernameTx, Validators, VoteOption, VoteTx,
};
use bcp_core::types::{Address, Algorithm, Amount, FullSignature, Identity, PubkeyBundle, SwapTimeout};
use prost::Message;

use crate::address::{address_bytes, chain_address, decode_bns_address, identity_to_address};
use crate::proto::bnsd::{ProposalOption, ProposalOptions, Tx, TxMsg};
use crate::proto::{Metadata, aswap, cash, coin, crypto, escrow, gov, multisig, sigs, username, validators};

/// Fixed precision of every BNS token.
pub const FRACTIONAL_DIGITS: u32 = 9;

pub const USERNAME_NAMESPACE_SUFFIX: &str = "*iov";

pub fn encode_pubkey(pubkey: &PubkeyBundle) -> Result<crypto::PublicKey, CodecError> {
    match pubkey.algo {
        Algorithm::Ed25519 => Ok(crypto::PublicKey { ed25519: Some(pubkey.data.clone()) }),
        other => Err(CodecError::Validation(format!("unsupported algorithm: {other}"))),
    }
}

/// Splits the quantity string into `whole` and 9-digit `fractional` parts.
pub fn encode_amount(amount: &Amount) -> Result<coin::Coin, CodecError> {
    if amount.fractional_digits != FRACTIONAL_DIGITS {
        return Err(CodecError::Validation(format!(
            "fractional digits must be {FRACTIONAL_DIGITS} but was {}",
            amount.fractional_digits
        )));
    }
    let quantity = amount.quantity.as_str();
    if quantity.is_empty() || !quantity.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::Validation(format!("invalid quantity: {quantity:?}")));
    }
    let split = quantity.len().saturating_sub(FRACTIONAL_DIGITS as usize);
    let (whole, fractional) = quantity.split_at(split);
    Ok(coin::Coin {
        whole: parse_component(whole, "whole")?,
        fractional: parse_component(fractional, "fractional")?,
        ticker: amount.token_ticker.0.clone(),
    })
}

fn parse_component(digits: &str, name: &str) -> Result<i64, CodecError> {
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<i64>()
        .map_err(|_| CodecError::Validation(format!("component `{name}` out of range: {digits}")))
}

pub fn encode_full_signature(signature: &FullSignature) -> Result<sigs::StdSignature, CodecError> {
    let encoded_signature = match signature.pubkey.algo {
        Algorithm::Ed25519 => crypto::Signature { ed25519: Some(signature.signature.clone()) },
        other => return Err(CodecError::Validation(format!("unsupported algorithm: {other}"))),
    };
    Ok(sigs::StdSignature {
        sequence: signature.nonce.0,
        pubkey: Some(encode_pubkey(&signature.pubkey)?),
        signature: Some(encoded_signature),
    })
}

/// 8-byte big-endian encoding of numeric entity ids.
pub fn encode_numeric_id(id: u64) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

fn encode_participants(participants: &[Participant]) -> Result<Vec<multisig::Participant>, CodecError> {
    participants
        .iter()
        .map(|p| Ok(multisig::Participant { signature: address_bytes(&p.address)?, weight: p.weight }))
        .collect()
}

fn encode_targets(targets: &[ChainAddressPair]) -> Vec<username::BlockchainAddress> {
    targets
        .iter()
        .map(|pair| username::BlockchainAddress {
            blockchain_id: pair.chain_id.0.clone(),
            address: pair.address.0.clone(),
        })
        .collect()
}

fn encode_amounts(amounts: &[Amount]) -> Result<Vec<coin::Coin>, CodecError> {
    amounts.iter().map(encode_amount).collect()
}

fn timestamp(timeout: &SwapTimeout) -> Result<i64, CodecError> {
    match timeout {
        SwapTimeout::Timestamp(ts) => Ok(*ts),
        SwapTimeout::Height(_) => Err(CodecError::Validation("got unsupported timeout type".into())),
    }
}

fn memo(memo: &Option<String>) -> String {
    memo.clone().unwrap_or_default()
}

// Token sends and atomic swaps

fn build_send(creator: &Identity, tx: &SendTx) -> Result<TxMsg, CodecError> {
    let source = decode_bns_address(&identity_to_address(creator)?)?;
    if chain_address(&tx.sender, &creator.chain_id)? != source {
        return Err(CodecError::Validation("sender and creator do not match (currently unsupported)".into()));
    }
    Ok(TxMsg::CashSend(cash::SendMsg {
        metadata: Metadata::current(),
        source: source.data.to_vec(),
        destination: chain_address(&tx.recipient, &creator.chain_id)?.data.to_vec(),
        amount: Some(encode_amount(&tx.amount)?),
        memo: memo(&tx.memo),
    }))
}

fn build_swap_offer(creator: &Identity, tx: &SwapOfferTx) -> Result<TxMsg, CodecError> {
    if tx.hash.len() != 32 {
        return Err(CodecError::Validation("hash must be 32 bytes (sha256)".into()));
    }
    Ok(TxMsg::AswapCreate(aswap::CreateMsg {
        metadata: Metadata::current(),
        source: address_bytes(&identity_to_address(creator)?)?,
        preimage_hash: tx.hash.clone(),
        destination: chain_address(&tx.recipient, &creator.chain_id)?.data.to_vec(),
        amount: encode_amounts(&tx.amounts)?,
        timeout: timestamp(&tx.timeout)?,
        memo: memo(&tx.memo),
    }))
}

fn required_bytes(value: &[u8], field: &str) -> Result<Vec<u8>, CodecError> {
    if value.is_empty() {
        return Err(CodecError::MissingField(field.to_string()));
    }
    Ok(value.to_vec())
}

fn build_swap_claim(tx: &SwapClaimTx) -> Result<TxMsg, CodecError> {
    Ok(TxMsg::AswapRelease(aswap::ReleaseMsg {
        metadata: Metadata::current(),
        swap_id: required_bytes(&tx.swap_id.0, "swapId")?,
        preimage: required_bytes(&tx.preimage, "preimage")?,
    }))
}

fn build_swap_abort(tx: &SwapAbortTx) -> Result<TxMsg, CodecError> {
    Ok(TxMsg::AswapReturn(aswap::ReturnMsg {
        metadata: Metadata::current(),
        swap_id: required_bytes(&tx.swap_id.0, "swapId")?,
    }))
}

// Usernames

fn build_register_username(tx: &RegisterUsernameTx) -> Result<TxMsg, CodecError> {
    if !tx.username.ends_with(USERNAME_NAMESPACE_SUFFIX) {
        return Err(CodecError::Validation(format!(
            "username must be a full human readable address including the namespace suffix {USERNAME_NAMESPACE_SUFFIX:?}"
        )));
    }
    Ok(TxMsg::UsernameRegisterToken(username::RegisterTokenMsg {
        metadata: Metadata::current(),
        username: tx.username.clone(),
        targets: encode_targets(&tx.targets),
    }))
}

fn build_update_targets(tx: &UpdateTargetsOfUsernameTx) -> TxMsg {
    TxMsg::UsernameChangeTokenTargets(username::ChangeTokenTargetsMsg {
        metadata: Metadata::current(),
        username: tx.username.clone(),
        new_targets: encode_targets(&tx.targets),
    })
}

// Multisignature contracts

fn build_create_multisig(tx: &CreateMultisignatureTx) -> Result<TxMsg, CodecError> {
    Ok(TxMsg::MultisigCreate(multisig::CreateMsg {
        metadata: Metadata::current(),
        participants: encode_participants(&tx.participants)?,
        activation_threshold: tx.activation_threshold,
        admin_threshold: tx.admin_threshold,
    }))
}

fn build_update_multisig(tx: &UpdateMultisignatureTx) -> Result<TxMsg, CodecError> {
    Ok(TxMsg::MultisigUpdate(multisig::UpdateMsg {
        metadata: Metadata::current(),
        contract_id: tx.contract_id.clone(),
        participants: encode_participants(&tx.participants)?,
        activation_threshold: tx.activation_threshold,
        admin_threshold: tx.admin_threshold,
    }))
}

// Escrows

fn build_create_escrow(tx: &CreateEscrowTx) -> Result<TxMsg, CodecError> {
    Ok(TxMsg::EscrowCreate(escrow::CreateMsg {
        metadata: Metadata::current(),
        source: address_bytes(&tx.sender)?,
        arbiter: address_bytes(&tx.arbiter)?,
        destination: address_bytes(&tx.recipient)?,
        amount: encode_amounts(&tx.amounts)?,
        timeout: timestamp(&tx.timeout)?,
        memo: memo(&tx.memo),
    }))
}

fn build_release_escrow(tx: &ReleaseEscrowTx) -> Result<TxMsg, CodecError> {
    Ok(TxMsg::EscrowRelease(escrow::ReleaseMsg {
        metadata: Metadata::current(),
        escrow_id: encode_numeric_id(tx.escrow_id),
        amount: encode_amounts(&tx.amounts)?,
    }))
}

fn build_return_escrow(tx: &ReturnEscrowTx) -> TxMsg {
    TxMsg::EscrowReturn(escrow::ReturnMsg {
        metadata: Metadata::current(),
        escrow_id: encode_numeric_id(tx.escrow_id),
    })
}

fn build_update_escrow_parties(tx: &UpdateEscrowPartiesTx) -> Result<TxMsg, CodecError> {
    let parties = [&tx.sender, &tx.arbiter, &tx.recipient];
    let count = parties.iter().filter(|p| p.is_some()).count();
    if count != 1 {
        return Err(CodecError::Validation(format!("only one party can be updated at a time, got {count}")));
    }
    let optional = |party: &Option<Address>| -> Result<Vec<u8>, CodecError> {
        party.as_ref().map(address_bytes).transpose().map(Option::unwrap_or_default)
    };
    Ok(TxMsg::EscrowUpdateParties(escrow::UpdatePartiesMsg {
        metadata: Metadata::current(),
        escrow_id: encode_numeric_id(tx.escrow_id),
        source: optional(&tx.sender)?,
        arbiter: optional(&tx.arbiter)?,
        destination: optional(&tx.recipient)?,
    }))
}

// Governance

fn encode_validators(validators: &Validators) -> Result<Vec<validators::ValidatorUpdate>, CodecError> {
    validators
        .iter()
        .map(|(key, props)| {
            let pubkey_hex = key
                .strip_prefix("ed25519_")
                .filter(|h| h.len() == 64 && h.bytes().all(|b| b.is_ascii_hexdigit()))
                .ok_or_else(|| {
                    CodecError::Validation(format!(
                        "validators key {key:?} has unexpected format, must be 'ed25519_<pubkey_hex>'"
                    ))
                })?;
            let data = hex::decode(pubkey_hex).map_err(|e| CodecError::Validation(e.to_string()))?;
            Ok(validators::ValidatorUpdate {
                pub_key: Some(validators::PubKey { r#type: "ed25519".into(), data }),
                power: props.power,
            })
        })
        .collect()
}

pub fn encode_proposal_option(action: &ProposalAction) -> Result<ProposalOptions, CodecError> {
    let option = match action {
        ProposalAction::CreateTextResolution { resolution } => {
            ProposalOption::GovCreateTextResolution(gov::TextResolutionMsg {
                metadata: Metadata::current(),
                resolution: resolution.clone(),
            })
        }
        ProposalAction::SetValidators { validator_updates } => {
            ProposalOption::ValidatorsApplyDiff(validators::ApplyDiffMsg {
                metadata: Metadata::current(),
                validator_updates: encode_validators(validator_updates)?,
            })
        }
        ProposalAction::UpdateElectorate { electorate_id, diff_electors } => {
            let diff_electors = diff_electors
                .iter()
                .map(|(address, props)| {
                    Ok(gov::Elector { address: address_bytes(address)?, weight: props.weight })
                })
                .collect::<Result<Vec<_>, CodecError>>()?;
            ProposalOption::GovUpdateElectorate(gov::UpdateElectorateMsg {
                metadata: Metadata::current(),
                electorate_id: encode_numeric_id(*electorate_id),
                diff_electors,
            })
        }
    };
    Ok(ProposalOptions::from_option(option))
}

fn build_create_proposal(tx: &CreateProposalTx) -> Result<TxMsg, CodecError> {
    Ok(TxMsg::GovCreateProposal(gov::CreateProposalMsg {
        metadata: Metadata::current(),
        title: tx.title.clone(),
        raw_option: encode_proposal_option(&tx.action)?.encode_to_vec(),
        description: tx.description.clone(),
        election_rule_id: encode_numeric_id(tx.election_rule_id),
        start_time: tx.start_time,
        author: address_bytes(&tx.author)?,
    }))
}

pub fn encode_vote_option(option: VoteOption) -> i32 {
    match option {
        VoteOption::Yes => gov::VOTE_OPTION_YES,
        VoteOption::No => gov::VOTE_OPTION_NO,
        VoteOption::Abstain => gov::VOTE_OPTION_ABSTAIN,
    }
}

fn build_vote(tx: &VoteTx) -> TxMsg {
    TxMsg::GovVote(gov::VoteMsg {
        metadata: Metadata::current(),
        proposal_id: encode_numeric_id(tx.proposal_id),
        voter: Vec::new(),
        selected: encode_vote_option(tx.selection),
    })
}

fn build_tally(tx: &TallyTx) -> TxMsg {
    TxMsg::GovTally(gov::TallyMsg { metadata: Metadata::current(), proposal_id: encode_numeric_id(tx.proposal_id) })
}

pub fn build_msg(tx: &UnsignedTransaction) -> Result<TxMsg, CodecError> {
    match &tx.kind {
        TxKind::Send(send) => build_send(&tx.creator, send),
        TxKind::SwapOffer(offer) => build_swap_offer(&tx.creator, offer),
        TxKind::SwapClaim(claim) => build_swap_claim(claim),
        TxKind::SwapAbort(abort) => build_swap_abort(abort),
        TxKind::RegisterUsername(register) => build_register_username(register),
        TxKind::UpdateTargetsOfUsername(update) => Ok(build_update_targets(update)),
        TxKind::CreateMultisignature(create) => build_create_multisig(create),
        TxKind::UpdateMultisignature(update) => build_update_multisig(update),
        TxKind::CreateEscrow(create) => build_create_escrow(create),
        TxKind::ReleaseEscrow(release) => build_release_escrow(release),
        TxKind::ReturnEscrow(ret) => Ok(build_return_escrow(ret)),
        TxKind::UpdateEscrowParties(update) => build_update_escrow_parties(update),
        TxKind::CreateProposal(proposal) => build_create_proposal(proposal),
        TxKind::Vote(vote) => Ok(build_vote(vote)),
        TxKind::Tally(tally) => Ok(build_tally(tally)),
    }
}

pub fn build_unsigned_tx(tx: &UnsignedTransaction) -> Result<Tx, CodecError> {
    let mut built = Tx::default();
    built.set_msg(build_msg(tx)?);
    if let Some(tokens) = tx.fee.as_ref().and_then(|fee| fee.tokens.as_ref()) {
        built.fees = Some(cash::FeeInfo {
            payer: address_bytes(&identity_to_address(&tx.creator)?)?,
            fees: Some(encode_amount(tokens)?),
        });
    }
    Ok(built)
}

pub fn build_signed_tx(tx: &SignedTransaction) -> Result<Tx, CodecError> {
    let mut built = build_unsigned_tx(&tx.transaction)?;
    built.signatures = tx.signatures().map(encode_full_signature).collect::<Result<_, _>>()?;
    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcp_core::types::{ChainId, SwapId, TokenTicker};
    use crate::address::{AddressPrefix, encode_bns_address};

    fn amount(quantity: &str) -> Amount {
        Amount { quantity: quantity.into(), fractional_digits: 9, token_ticker: TokenTicker::new("CASH") }
    }

    #[test]
    fn amount_split() {
        let coin = encode_amount(&amount("1234000000001")).unwrap();
        assert_eq!((coin.whole, coin.fractional), (1234, 1));
        let coin = encode_amount(&amount("5")).unwrap();
        assert_eq!((coin.whole, coin.fractional), (0, 5));
        let coin = encode_amount(&amount("0")).unwrap();
        assert_eq!((coin.whole, coin.fractional), (0, 0));
        assert_eq!(coin.ticker, "CASH");
    }

    #[test]
    fn amount_requires_nine_digits() {
        let mut a = amount("1");
        a.fractional_digits = 6;
        let err = encode_amount(&a).unwrap_err();
        assert_eq!(err, CodecError::Validation("fractional digits must be 9 but was 6".into()));
    }

    #[test]
    fn amount_rejects_garbage() {
        assert!(encode_amount(&amount("")).is_err());
        assert!(encode_amount(&amount("1e9")).is_err());
        assert!(encode_amount(&amount("99999999999999999999000000000")).is_err());
    }

    #[test]
    fn numeric_id_is_big_endian() {
        assert_eq!(encode_numeric_id(1), vec![0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(encode_numeric_id(0x0102), vec![0, 0, 0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn username_needs_namespace() {
        let tx = RegisterUsernameTx { username: "alice".into(), targets: vec![] };
        assert!(matches!(build_register_username(&tx), Err(CodecError::Validation(_))));
        let tx = RegisterUsernameTx { username: "alice*iov".into(), targets: vec![] };
        assert!(build_register_username(&tx).is_ok());
    }

    #[test]
    fn escrow_party_update_needs_exactly_one() {
        let none = UpdateEscrowPartiesTx { escrow_id: 1, sender: None, arbiter: None, recipient: None };
        let err = build_update_escrow_parties(&none).unwrap_err();
        assert_eq!(err, CodecError::Validation("only one party can be updated at a time, got 0".into()));

        let addr = Address::new("tiov17m9dug55pryn525drqwk9m7wgmlkp5ss4j2mky");
        let two = UpdateEscrowPartiesTx {
            escrow_id: 1,
            sender: Some(addr.clone()),
            arbiter: Some(addr.clone()),
            recipient: None,
        };
        assert!(build_update_escrow_parties(&two).is_err());

        let one = UpdateEscrowPartiesTx { escrow_id: 1, sender: None, arbiter: Some(addr), recipient: None };
        assert!(build_update_escrow_parties(&one).is_ok());
    }

    #[test]
    fn validator_keys_are_checked() {
        let mut validators = Validators::new();
        validators.insert("ed25519_abc".into(), bcp_core::transactions::ValidatorProperties { power: 1 });
        assert!(encode_validators(&validators).is_err());

        let mut validators = Validators::new();
        validators.insert(format!("ed25519_{}", "ab".repeat(32)), bcp_core::transactions::ValidatorProperties { power: 5 });
        let updates = encode_validators(&validators).unwrap();
        assert_eq!(updates[0].power, 5);
        assert_eq!(updates[0].pub_key.as_ref().unwrap().data, vec![0xab; 32]);
    }

    #[test]
    fn send_requires_sender_to_match_creator() {
        let creator = Identity::new(ChainId::new("local-iov-devnet"), PubkeyBundle::ed25519(vec![1; 32]));
        let other = Address::new("tiov17m9dug55pryn525drqwk9m7wgmlkp5ss4j2mky");
        let send = SendTx { sender: other.clone(), recipient: other, amount: amount("1"), memo: None };
        assert!(matches!(build_send(&creator, &send), Err(CodecError::Validation(_))));
    }

    #[test]
    fn swap_offer_rejects_height_timeout() {
        let creator = Identity::new(ChainId::new("local-iov-devnet"), PubkeyBundle::ed25519(vec![1; 32]));
        let offer = SwapOfferTx {
            swap_id: None,
            recipient: Address::new("tiov17m9dug55pryn525drqwk9m7wgmlkp5ss4j2mky"),
            amounts: vec![amount("1")],
            hash: vec![0; 32],
            timeout: SwapTimeout::Height(10),
            memo: None,
        };
        assert!(build_swap_offer(&creator, &offer).is_err());
    }

    #[test]
    fn send_checks_address_prefixes() {
        let creator = Identity::new(ChainId::new("local-iov-devnet"), PubkeyBundle::ed25519(vec![1; 32]));
        let source = decode_bns_address(&identity_to_address(&creator).unwrap()).unwrap();
        let mainnet_sender = encode_bns_address(AddressPrefix::Iov, &source.data).unwrap();
        let recipient = Address::new("tiov17m9dug55pryn525drqwk9m7wgmlkp5ss4j2mky");

        let send = SendTx { sender: mainnet_sender, recipient: recipient.clone(), amount: amount("1"), memo: None };
        assert!(matches!(build_send(&creator, &send), Err(CodecError::Validation(_))));

        let sender = identity_to_address(&creator).unwrap();
        let send = SendTx { sender: sender.clone(), recipient, amount: amount("1"), memo: None };
        assert!(build_send(&creator, &send).is_ok());

        let mainnet_recipient = encode_bns_address(AddressPrefix::Iov, &[7; 20]).unwrap();
        let send = SendTx { sender, recipient: mainnet_recipient, amount: amount("1"), memo: None };
        assert!(matches!(build_send(&creator, &send), Err(CodecError::Validation(_))));
    }

    #[test]
    fn swap_fields_are_checked() {
        let creator = Identity::new(ChainId::new("local-iov-devnet"), PubkeyBundle::ed25519(vec![1; 32]));
        let offer = SwapOfferTx {
            swap_id: None,
            recipient: Address::new("tiov17m9dug55pryn525drqwk9m7wgmlkp5ss4j2mky"),
            amounts: vec![amount("1")],
            hash: vec![0; 20],
            timeout: SwapTimeout::Timestamp(1_600_000_000),
            memo: None,
        };
        assert_eq!(
            build_swap_offer(&creator, &offer).unwrap_err(),
            CodecError::Validation("hash must be 32 bytes (sha256)".into())
        );
        assert!(build_swap_offer(&creator, &SwapOfferTx { hash: vec![0; 32], ..offer }).is_ok());

        let claim = SwapClaimTx { swap_id: SwapId(vec![]), preimage: vec![1; 32] };
        assert_eq!(build_swap_claim(&claim).unwrap_err(), CodecError::MissingField("swapId".into()));
        let claim = SwapClaimTx { swap_id: SwapId(vec![9]), preimage: vec![] };
        assert_eq!(build_swap_claim(&claim).unwrap_err(), CodecError::MissingField("preimage".into()));
        assert_eq!(
            build_swap_abort(&SwapAbortTx { swap_id: SwapId(vec![]) }).unwrap_err(),
            CodecError::MissingField("swapId".into())
        );
    }
}
