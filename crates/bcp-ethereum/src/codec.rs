//! [`TxCodec`] implementation for Ethereum.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use num_bigint::BigUint;
use tracing::debug;

use bcp_core::crypto::keccak256;
use bcp_core::error::CodecError;
use bcp_core::traits::TxCodec;
use bcp_core::transactions::{
    SendTx, SignedTransaction, SwapAbortTx, SwapClaimTx, SwapOfferTx, TxKind, UnsignedTransaction,
};
use bcp_core::types::{
    Address, Amount, ChainId, Fee, FullSignature, Identity, Nonce, PostableBytes, PrehashType,
    PubkeyBundle, SigningJob, SwapTimeout, TokenTicker, TransactionId,
};

use crate::abi::{self, ContractCall};
use crate::address::{self, decode_address, pubkey_to_address, to_checksummed_address};
use crate::chain::to_ethereum_chain_id;
use crate::config::{ETHER_FRACTIONAL_DIGITS, ETHER_TICKER, EthereumCodecOptions};
use crate::serialization::{
    RawSignature, TxFields, deserialize_signed, serialize_signed, serialize_unsigned, split_v,
};

#[derive(Debug, Clone, Default)]
pub struct EthereumCodec {
    options: EthereumCodecOptions,
}

fn parse_quantity(amount: &Amount) -> Result<BigUint, CodecError> {
    amount
        .quantity
        .parse()
        .map_err(|_| CodecError::Validation(format!("invalid quantity: {:?}", amount.quantity)))
}

fn ether_value(amount: &Amount) -> Result<BigUint, CodecError> {
    if amount.token_ticker.as_str() != ETHER_TICKER {
        return Err(CodecError::Validation(format!(
            "expected {ETHER_TICKER} amount but got {}",
            amount.token_ticker
        )));
    }
    if amount.fractional_digits != ETHER_FRACTIONAL_DIGITS {
        return Err(CodecError::Validation(format!(
            "fractional digits must be {ETHER_FRACTIONAL_DIGITS} but was {}",
            amount.fractional_digits
        )));
    }
    parse_quantity(amount)
}

fn ether_amount(value: &BigUint) -> Amount {
    Amount {
        quantity: value.to_string(),
        fractional_digits: ETHER_FRACTIONAL_DIGITS,
        token_ticker: TokenTicker::new(ETHER_TICKER),
    }
}

/// Secp256k1 key that produced `signature` over `hash`, uncompressed.
fn recover_pubkey(hash: &[u8; 32], signature: &RawSignature) -> Result<Vec<u8>, CodecError> {
    let mut rs = [0u8; 64];
    rs[..32].copy_from_slice(&signature.r);
    rs[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&rs).map_err(|e| CodecError::Validation(format!("invalid signature: {e}")))?;
    let recovery = RecoveryId::from_byte(signature.recovery)
        .ok_or_else(|| CodecError::Validation(format!("invalid recovery param: {}", signature.recovery)))?;
    let key = VerifyingKey::recover_from_prehash(hash, &sig, recovery)
        .map_err(|e| CodecError::Validation(format!("cannot recover public key: {e}")))?;
    Ok(key.to_encoded_point(false).as_bytes().to_vec())
}

impl EthereumCodec {
    pub fn new(options: EthereumCodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EthereumCodecOptions {
        &self.options
    }

    fn swap_contract(&self) -> Result<[u8; 20], CodecError> {
        let contract = self
            .options
            .atomic_swap_ether_contract
            .as_ref()
            .ok_or_else(|| CodecError::Validation("no atomic swap contract configured".into()))?;
        Ok(decode_address(contract)?)
    }

    fn send_payload(&self, send: &SendTx) -> Result<([u8; 20], BigUint, Vec<u8>), CodecError> {
        if send.amount.token_ticker.as_str() == ETHER_TICKER {
            let memo = send.memo.as_deref().unwrap_or_default().as_bytes().to_vec();
            return Ok((decode_address(&send.recipient)?, ether_value(&send.amount)?, memo));
        }
        let token = self
            .options
            .erc20_tokens
            .get(&send.amount.token_ticker)
            .ok_or_else(|| CodecError::Validation(format!("unsupported token ticker: {}", send.amount.token_ticker)))?;
        if send.amount.fractional_digits != token.decimals {
            return Err(CodecError::Validation(format!(
                "fractional digits must be {} but was {}",
                token.decimals, send.amount.fractional_digits
            )));
        }
        if send.memo.is_some() {
            return Err(CodecError::Validation("memo is not supported for ERC20 transfers".into()));
        }
        let data = abi::encode_erc20_transfer(&send.recipient, &parse_quantity(&send.amount)?)?;
        Ok((decode_address(&token.contract_address)?, BigUint::default(), data))
    }

    fn offer_payload(&self, offer: &SwapOfferTx) -> Result<([u8; 20], BigUint, Vec<u8>), CodecError> {
        let contract = self.swap_contract()?;
        let swap_id = offer.swap_id.as_ref().ok_or_else(|| CodecError::MissingField("swapId".into()))?;
        let [amount] = offer.amounts.as_slice() else {
            return Err(CodecError::Validation(format!(
                "swap offer must contain exactly one amount but got {}",
                offer.amounts.len()
            )));
        };
        let SwapTimeout::Height(height) = offer.timeout else {
            return Err(CodecError::Validation("swap timeout must be a block height".into()));
        };
        if offer.memo.is_some() {
            return Err(CodecError::Validation("memo is not supported for swap offers".into()));
        }
        let data = abi::encode_swap_open(swap_id, &offer.recipient, &offer.hash, height)?;
        Ok((contract, ether_value(amount)?, data))
    }

    fn tx_fields(&self, unsigned: &UnsignedTransaction, nonce: Nonce) -> Result<TxFields, CodecError> {
        let nonce = u64::try_from(nonce.0)
            .map_err(|_| CodecError::Validation(format!("nonce must not be negative but was {}", nonce.0)))?;
        let fee = unsigned.fee.as_ref();
        let gas_price = fee
            .and_then(|f| f.gas_price.as_ref())
            .ok_or_else(|| CodecError::Validation("gasPrice must be set".into()))?;
        let gas_limit = fee
            .and_then(|f| f.gas_limit)
            .ok_or_else(|| CodecError::Validation("gasLimit must be set".into()))?;

        let (to, value, data) = match &unsigned.kind {
            TxKind::Send(send) => self.send_payload(send)?,
            TxKind::SwapOffer(offer) => self.offer_payload(offer)?,
            TxKind::SwapClaim(claim) => {
                (self.swap_contract()?, BigUint::default(), abi::encode_swap_claim(&claim.swap_id, &claim.preimage)?)
            }
            TxKind::SwapAbort(abort) => {
                (self.swap_contract()?, BigUint::default(), abi::encode_swap_abort(&abort.swap_id)?)
            }
            other => return Err(CodecError::UnsupportedKind(other.name().into())),
        };
        Ok(TxFields { nonce, gas_price: parse_quantity(gas_price)?, gas_limit, to, value, data })
    }

    fn parse_kind(&self, fields: &TxFields, sender: Address) -> Result<TxKind, CodecError> {
        let to = to_checksummed_address(&fields.to);

        if self.options.is_swap_contract(&to) {
            return match abi::decode_swap_call(&fields.data)? {
                Some(ContractCall::SwapOpen { swap_id, recipient, hash, timeout_height }) => {
                    Ok(TxKind::SwapOffer(SwapOfferTx {
                        swap_id: Some(swap_id),
                        recipient,
                        amounts: vec![ether_amount(&fields.value)],
                        hash,
                        timeout: SwapTimeout::Height(timeout_height),
                        memo: None,
                    }))
                }
                Some(ContractCall::SwapClaim { swap_id, preimage }) => {
                    Ok(TxKind::SwapClaim(SwapClaimTx { swap_id, preimage }))
                }
                Some(ContractCall::SwapAbort { swap_id }) => Ok(TxKind::SwapAbort(SwapAbortTx { swap_id })),
                _ => Err(CodecError::Validation("unknown atomic swap contract method".into())),
            };
        }

        if let Some(token) = self.options.erc20_by_contract(&to) {
            return match abi::decode_erc20_call(&fields.data)? {
                Some(ContractCall::Erc20Transfer { recipient, quantity }) => Ok(TxKind::Send(SendTx {
                    sender,
                    recipient,
                    amount: Amount {
                        quantity: quantity.to_string(),
                        fractional_digits: token.decimals,
                        token_ticker: token.symbol.clone(),
                    },
                    memo: None,
                })),
                _ => Err(CodecError::UnsupportedOperation(format!("unknown ERC20 method on {to}"))),
            };
        }

        let memo = match fields.data.as_slice() {
            [] => None,
            data => Some(
                String::from_utf8(data.to_vec())
                    .map_err(|_| CodecError::UnsupportedOperation("contract call data is not a text memo".into()))?,
            ),
        };
        Ok(TxKind::Send(SendTx { sender, recipient: to, amount: ether_amount(&fields.value), memo }))
    }
}

impl TxCodec for EthereumCodec {
    fn bytes_to_sign(&self, unsigned: &UnsignedTransaction, nonce: Nonce) -> Result<SigningJob, CodecError> {
        let chain_id = to_ethereum_chain_id(&unsigned.creator.chain_id)?;
        let fields = self.tx_fields(unsigned, nonce)?;
        let bytes = serialize_unsigned(&fields, chain_id);
        debug!(kind = unsigned.kind.name(), chain_id, len = bytes.len(), "ethereum: built signing bytes");
        Ok(SigningJob { bytes, prehash_type: PrehashType::Keccak256 })
    }

    fn bytes_to_post(&self, signed: &SignedTransaction) -> Result<PostableBytes, CodecError> {
        let unsigned = &signed.transaction;
        let chain_id = to_ethereum_chain_id(&unsigned.creator.chain_id)?;
        let fields = self.tx_fields(unsigned, signed.primary_signature.nonce)?;
        let signature = RawSignature::from_bytes(&signed.primary_signature.signature)?;
        serialize_signed(&fields, chain_id, &signature)
    }

    /// `0x` followed by the lowercase hex Keccak-256 of the postable bytes.
    fn identifier(&self, signed: &SignedTransaction) -> Result<TransactionId, CodecError> {
        let hash = keccak256(&self.bytes_to_post(signed)?);
        Ok(TransactionId(format!("0x{}", hex::encode(hash))))
    }

    fn parse_bytes(&self, bytes: &[u8], chain_id: &ChainId) -> Result<SignedTransaction, CodecError> {
        let expected_chain = to_ethereum_chain_id(chain_id)?;
        let decoded = deserialize_signed(bytes)?;
        let (tx_chain, recovery) = split_v(decoded.v)?;
        if tx_chain != expected_chain {
            return Err(CodecError::Validation(format!(
                "chain id mismatch: expected {expected_chain} but transaction is for {tx_chain}"
            )));
        }
        let signature = RawSignature { r: decoded.r, s: decoded.s, recovery };
        let message = serialize_unsigned(&decoded.fields, tx_chain);
        let pubkey = PubkeyBundle::secp256k1(recover_pubkey(&keccak256(&message), &signature)?);
        let sender = pubkey_to_address(&pubkey.data)?;

        let kind = self.parse_kind(&decoded.fields, sender)?;
        let nonce = i64::try_from(decoded.fields.nonce)
            .map_err(|_| CodecError::Decode(format!("nonce out of range: {}", decoded.fields.nonce)))?;
        let fee = Fee::gas(ether_amount(&decoded.fields.gas_price), decoded.fields.gas_limit);
        let creator = Identity::new(chain_id.clone(), pubkey.clone());
        debug!(kind = kind.name(), chain_id = tx_chain, "ethereum: parsed transaction");

        Ok(SignedTransaction::new(
            UnsignedTransaction::new(creator, kind).with_fee(fee),
            FullSignature { nonce: Nonce(nonce), pubkey, signature: signature.to_bytes() },
        ))
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
    use crate::config::Erc20Options;
    use bcp_core::transactions::CreateEscrowTx;
    use k256::ecdsa::SigningKey;

    const PUBKEY: &str = "041d4c015b00cbd914e280b871d3c6ae2a047ca650d3ecea4b5246bb3036d4d74960b7feb09068164d2b82f1c7df9e95839b29ae38e90d60578b2318a54e108cf8";
    const SWAP_CONTRACT: &str = "0xE1C9Ea25A621Cf5C934a7E112ECaB640eC7D8d18";
    const HOT_CONTRACT: &str = "0x6c6EE5e31d828De241282B9606C8e98Ea48526E2";
    const RECIPIENT: &str = "0x8fEC1C262599f4169401fF48A9D63503CEaAf742";
    const HOT_QUANTITY: &str = "266151442407390000000000";
    const SIG_R: &str = "6a6bbd9d45779c81a24172a1c90e9790033cce1fd6893a49ac31d972e436ee37";
    const SIG_S: &str = "443fbc313ff9e4399da1b285bd3f9b9c776349b61d0334c83f4eb51ba67a0a7d";

    fn codec() -> EthereumCodec {
        EthereumCodec::new(
            EthereumCodecOptions::default()
                .with_atomic_swap_ether_contract(Address::new(SWAP_CONTRACT))
                .with_erc20(Erc20Options {
                    contract_address: Address::new(HOT_CONTRACT),
                    decimals: 18,
                    symbol: TokenTicker::new("HOT"),
                }),
        )
    }

    fn creator(chain: &str) -> Identity {
        Identity::new(ChainId::new(chain), PubkeyBundle::secp256k1(hex::decode(PUBKEY).unwrap()))
    }

    fn eth(quantity: &str) -> Amount {
        Amount::new(quantity, 18, "ETH").unwrap()
    }

    fn mainnet_fee() -> Fee {
        Fee::gas(eth("6000000000"), 52669)
    }

    fn hot_send() -> UnsignedTransaction {
        let creator = creator("ethereum-eip155-1");
        UnsignedTransaction::new(
            creator.clone(),
            TxKind::Send(SendTx {
                sender: address::identity_to_address(&creator).unwrap(),
                recipient: Address::new(RECIPIENT),
                amount: Amount::new(HOT_QUANTITY, 18, "HOT").unwrap(),
                memo: None,
            }),
        )
        .with_fee(mainnet_fee())
    }

    fn claim(swap_id: Vec<u8>, preimage: Vec<u8>) -> UnsignedTransaction {
        UnsignedTransaction::new(
            creator("ethereum-eip155-1"),
            TxKind::SwapClaim(SwapClaimTx { swap_id: bcp_core::types::SwapId(swap_id), preimage }),
        )
        .with_fee(mainnet_fee())
    }

    fn vector_signature() -> FullSignature {
        let mut signature = hex::decode(format!("{SIG_R}{SIG_S}")).unwrap();
        signature.push(0);
        FullSignature { nonce: Nonce(26), pubkey: creator("ethereum-eip155-1").pubkey, signature }
    }

    #[test]
    fn ether_send_signing_bytes() {
        let creator = creator("ethereum-eip155-5777");
        let tx = UnsignedTransaction::new(
            creator.clone(),
            TxKind::Send(SendTx {
                sender: address::identity_to_address(&creator).unwrap(),
                recipient: Address::new("0x43aa18FAAE961c23715735682dC75662d90F4DDe"),
                amount: eth("20000000000000000000"),
                memo: None,
            }),
        )
        .with_fee(Fee::gas(eth("20000000000"), 21000));
        let job = EthereumCodec::default().bytes_to_sign(&tx, Nonce(0)).unwrap();
        assert_eq!(job.prehash_type, PrehashType::Keccak256);
        assert_eq!(
            hex::encode(job.bytes),
            "ef808504a817c8008252089443aa18faae961c23715735682dc75662d90f4dde8901158e460913d00000808216918080"
        );
    }

    #[test]
    fn erc20_signing_bytes() {
        let job = codec().bytes_to_sign(&hot_send(), Nonce(26)).unwrap();
        assert_eq!(
            hex::encode(job.bytes),
            "f8691a850165a0bc0082cdbd946c6ee5e31d828de241282b9606c8e98ea48526e280b844a9059cbb0000000000000000000000008fec1c262599f4169401ff48a9d63503ceaaf74200000000000000000000000000000000000000000000385c193e12be6d312c00018080"
        );
    }

    #[test]
    fn swap_offer_signing_bytes() {
        let tx = UnsignedTransaction::new(
            creator("ethereum-eip155-1"),
            TxKind::SwapOffer(SwapOfferTx {
                swap_id: Some(bcp_core::types::SwapId(vec![0x11; 32])),
                recipient: Address::new(RECIPIENT),
                amounts: vec![eth(HOT_QUANTITY)],
                hash: vec![0x22; 32],
                timeout: SwapTimeout::Height(1),
                memo: None,
            }),
        )
        .with_fee(mainnet_fee());
        let job = codec().bytes_to_sign(&tx, Nonce(26)).unwrap();
        assert_eq!(
            hex::encode(job.bytes),
            "f8b31a850165a0bc0082cdbd94e1c9ea25a621cf5c934a7e112ecab640ec7d8d188a385c193e12be6d312c00b8840eed8548\
             1111111111111111111111111111111111111111111111111111111111111111\
             0000000000000000000000008fec1c262599f4169401ff48a9d63503ceaaf742\
             2222222222222222222222222222222222222222222222222222222222222222\
             0000000000000000000000000000000000000000000000000000000000000001018080"
        );
    }

    #[test]
    fn swap_claim_signing_bytes() {
        let job = codec().bytes_to_sign(&claim(vec![0x11; 32], vec![0x33; 32]), Nonce(26)).unwrap();
        assert_eq!(
            hex::encode(job.bytes),
            "f8691a850165a0bc0082cdbd94e1c9ea25a621cf5c934a7e112ecab640ec7d8d1880b84484cc9dfb\
             1111111111111111111111111111111111111111111111111111111111111111\
             3333333333333333333333333333333333333333333333333333333333333333018080"
        );
        assert_eq!(
            codec().bytes_to_sign(&claim(Vec::new(), vec![0x33; 32]), Nonce(26)).unwrap_err(),
            CodecError::Validation("swap id must be 32 bytes but got 0".into())
        );
    }

    #[test]
    fn signed_erc20_and_claim() {
        let signed = SignedTransaction::new(hot_send(), vector_signature());
        assert_eq!(
            hex::encode(codec().bytes_to_post(&signed).unwrap()),
            "f8a91a850165a0bc0082cdbd946c6ee5e31d828de241282b9606c8e98ea48526e280b844a9059cbb0000000000000000000000008fec1c262599f4169401ff48a9d63503ceaaf74200000000000000000000000000000000000000000000385c193e12be6d312c0025a06a6bbd9d45779c81a24172a1c90e9790033cce1fd6893a49ac31d972e436ee37a0443fbc313ff9e4399da1b285bd3f9b9c776349b61d0334c83f4eb51ba67a0a7d"
        );

        let signed = SignedTransaction::new(claim(vec![0x11; 32], vec![0x33; 32]), vector_signature());
        assert_eq!(
            hex::encode(codec().bytes_to_post(&signed).unwrap()),
            "f8a91a850165a0bc0082cdbd94e1c9ea25a621cf5c934a7e112ecab640ec7d8d1880b84484cc9dfb\
             1111111111111111111111111111111111111111111111111111111111111111\
             3333333333333333333333333333333333333333333333333333333333333333\
             25a06a6bbd9d45779c81a24172a1c90e9790033cce1fd6893a49ac31d972e436ee37a0443fbc313ff9e4399da1b285bd3f9b9c776349b61d0334c83f4eb51ba67a0a7d"
        );

        let id = codec().identifier(&signed).unwrap();
        assert!(id.as_str().starts_with("0x"));
        assert_eq!(id.as_str().len(), 66);
    }

    #[test]
    fn fee_and_nonce_are_required() {
        let mut tx = hot_send();
        tx.fee.as_mut().unwrap().gas_price = None;
        assert_eq!(
            codec().bytes_to_sign(&tx, Nonce(1)).unwrap_err(),
            CodecError::Validation("gasPrice must be set".into())
        );
        let mut tx = hot_send();
        tx.fee.as_mut().unwrap().gas_limit = None;
        assert_eq!(
            codec().bytes_to_sign(&tx, Nonce(1)).unwrap_err(),
            CodecError::Validation("gasLimit must be set".into())
        );
        assert!(codec().bytes_to_sign(&hot_send(), Nonce(-1)).is_err());

        let mut tx = hot_send();
        tx.fee = None;
        assert_eq!(
            codec().bytes_to_sign(&tx, Nonce(1)).unwrap_err(),
            CodecError::Validation("gasPrice must be set".into())
        );
    }

    #[test]
    fn rejects_unsupported_input() {
        let creator = creator("ethereum-eip155-1");
        let escrow = UnsignedTransaction::new(
            creator.clone(),
            TxKind::CreateEscrow(CreateEscrowTx {
                sender: Address::new(RECIPIENT),
                arbiter: Address::new(RECIPIENT),
                recipient: Address::new(RECIPIENT),
                amounts: vec![],
                timeout: SwapTimeout::Height(1),
                memo: None,
            }),
        )
        .with_fee(mainnet_fee());
        assert!(matches!(codec().bytes_to_sign(&escrow, Nonce(0)), Err(CodecError::UnsupportedKind(_))));

        // swaps need a configured contract
        assert!(EthereumCodec::default().bytes_to_sign(&claim(vec![1; 32], vec![2; 32]), Nonce(0)).is_err());

        let mut unknown = hot_send();
        if let TxKind::Send(send) = &mut unknown.kind {
            send.amount.token_ticker = TokenTicker::new("XYZ");
        }
        assert!(codec().bytes_to_sign(&unknown, Nonce(0)).is_err());
    }

    fn sign(tx: &UnsignedTransaction, key: &SigningKey, nonce: Nonce) -> SignedTransaction {
        let job = codec().bytes_to_sign(tx, nonce).unwrap();
        let (sig, recovery) = key.sign_prehash_recoverable(&keccak256(&job.bytes)).unwrap();
        let mut signature = sig.to_bytes().to_vec();
        signature.push(recovery.to_byte());
        SignedTransaction::new(
            tx.clone(),
            FullSignature { nonce, pubkey: tx.creator.pubkey.clone(), signature },
        )
    }

    fn keyed_creator(key: &SigningKey, chain: &str) -> Identity {
        let pubkey = key.verifying_key().to_encoded_point(false).as_bytes().to_vec();
        Identity::new(ChainId::new(chain), PubkeyBundle::secp256k1(pubkey))
    }

    #[test]
    fn parse_recovers_creator_and_kind() {
        let key = SigningKey::from_slice(&[0x42; 32]).unwrap();
        let creator = keyed_creator(&key, "ethereum-eip155-1");
        let sender = address::identity_to_address(&creator).unwrap();
        let kinds = vec![
            TxKind::Send(SendTx {
                sender: sender.clone(),
                recipient: Address::new(RECIPIENT),
                amount: eth("1234567890"),
                memo: Some("hello".into()),
            }),
            TxKind::Send(SendTx {
                sender: sender.clone(),
                recipient: Address::new(RECIPIENT),
                amount: Amount::new(HOT_QUANTITY, 18, "HOT").unwrap(),
                memo: None,
            }),
            TxKind::SwapOffer(SwapOfferTx {
                swap_id: Some(bcp_core::types::SwapId(vec![0xab; 32])),
                recipient: Address::new(RECIPIENT),
                amounts: vec![eth("1000")],
                hash: vec![0xcd; 32],
                timeout: SwapTimeout::Height(8_000_000),
                memo: None,
            }),
            TxKind::SwapClaim(SwapClaimTx { swap_id: bcp_core::types::SwapId(vec![1; 32]), preimage: vec![2; 32] }),
            TxKind::SwapAbort(SwapAbortTx { swap_id: bcp_core::types::SwapId(vec![3; 32]) }),
        ];
        for kind in kinds {
            let tx = UnsignedTransaction::new(creator.clone(), kind).with_fee(mainnet_fee());
            let signed = sign(&tx, &key, Nonce(26));
            let bytes = codec().bytes_to_post(&signed).unwrap();
            let parsed = codec().parse_bytes(&bytes, &ChainId::new("ethereum-eip155-1")).unwrap();
            assert_eq!(parsed, signed);
        }
    }

    #[test]
    fn parse_checks_chain() {
        let key = SigningKey::from_slice(&[0x42; 32]).unwrap();
        let creator = keyed_creator(&key, "ethereum-eip155-1");
        let mut tx = claim(vec![1; 32], vec![2; 32]);
        tx.creator = creator;
        let signed = sign(&tx, &key, Nonce(0));
        let bytes = codec().bytes_to_post(&signed).unwrap();
        assert!(codec().parse_bytes(&bytes, &ChainId::new("ethereum-eip155-3")).is_err());
        assert!(codec().parse_bytes(&bytes, &ChainId::new("iov-mainnet")).is_err());
        assert!(codec().parse_bytes(&bytes[1..], &ChainId::new("ethereum-eip155-1")).is_err());
    }

    #[test]
    fn legacy_chain_round_trip() {
        let key = SigningKey::from_slice(&[0x07; 32]).unwrap();
        let creator = keyed_creator(&key, "ethereum-eip155-0");
        let tx = UnsignedTransaction::new(
            creator.clone(),
            TxKind::Send(SendTx {
                sender: address::identity_to_address(&creator).unwrap(),
                recipient: Address::new(RECIPIENT),
                amount: eth("10"),
                memo: None,
            }),
        )
        .with_fee(Fee::gas(eth("1"), 21000));
        let signed = sign(&tx, &key, Nonce(0));
        let bytes = codec().bytes_to_post(&signed).unwrap();
        assert!(matches!(deserialize_signed(&bytes).unwrap().v, 27 | 28));
        assert_eq!(codec().parse_bytes(&bytes, &ChainId::new("ethereum-eip155-0")).unwrap(), signed);
    }
}
