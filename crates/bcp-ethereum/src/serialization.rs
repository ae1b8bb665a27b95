//! RLP framing of legacy and EIP-155 transactions.

use num_bigint::BigUint;
use rlp::{Rlp, RlpStream};

use bcp_core::error::CodecError;

use crate::address::ADDRESS_LENGTH;

const UNSIGNED_EIP155_ITEMS: usize = 9;
const UNSIGNED_LEGACY_ITEMS: usize = 6;
const SIGNED_ITEMS: usize = 9;

/// Transaction fields in wire order, before `v`, `r` and `s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxFields {
    pub nonce: u64,
    pub gas_price: BigUint,
    pub gas_limit: u64,
    pub to: [u8; ADDRESS_LENGTH],
    pub value: BigUint,
    pub data: Vec<u8>,
}

/// Ethereum signature split into its components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery: u8,
}

impl RawSignature {
    /// Parses `r || s || recovery`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != 65 {
            return Err(CodecError::Validation(format!(
                "signature must be 65 bytes (r, s, recovery) but was {}",
                bytes.len()
            )));
        }
        let recovery = bytes[64];
        if recovery > 1 {
            return Err(CodecError::Validation(format!("invalid recovery param: {recovery}")));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, recovery })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&self.r);
        out.extend_from_slice(&self.s);
        out.push(self.recovery);
        out
    }
}

/// `35 + 2 * chain_id + recovery`, or `27 + recovery` without replay protection.
pub fn signature_v(chain_id: u64, recovery: u8) -> Result<u64, CodecError> {
    let base = if chain_id == 0 {
        Some(27)
    } else {
        chain_id.checked_mul(2).and_then(|c| c.checked_add(35))
    };
    base.map(|b| b + u64::from(recovery))
        .ok_or_else(|| CodecError::Validation(format!("chain id too large: {chain_id}")))
}

/// Inverse of [`signature_v`]: `(chain_id, recovery)`.
pub fn split_v(v: u64) -> Result<(u64, u8), CodecError> {
    match v {
        27 | 28 => Ok((0, (v - 27) as u8)),
        v if v >= 35 => Ok(((v - 35) / 2, ((v - 35) % 2) as u8)),
        other => Err(CodecError::Validation(format!("invalid signature v: {other}"))),
    }
}

fn minimal(value: &BigUint) -> Vec<u8> {
    if value.bits() == 0 { Vec::new() } else { value.to_bytes_be() }
}

fn trim_zeros(data: &[u8]) -> Vec<u8> {
    let start = data.iter().position(|b| *b != 0).unwrap_or(data.len());
    data[start..].to_vec()
}

fn append_fields(stream: &mut RlpStream, fields: &TxFields) {
    stream.append(&fields.nonce);
    stream.append(&minimal(&fields.gas_price));
    stream.append(&fields.gas_limit);
    stream.append(&fields.to.to_vec());
    stream.append(&minimal(&fields.value));
    stream.append(&fields.data);
}

/// The list whose Keccak-256 gets signed. EIP-155 appends
/// `[chain_id, 0, 0]` for any non-zero chain.
pub fn serialize_unsigned(fields: &TxFields, chain_id: u64) -> Vec<u8> {
    if chain_id == 0 {
        let mut stream = RlpStream::new_list(UNSIGNED_LEGACY_ITEMS);
        append_fields(&mut stream, fields);
        return stream.out().to_vec();
    }
    let mut stream = RlpStream::new_list(UNSIGNED_EIP155_ITEMS);
    append_fields(&mut stream, fields);
    stream.append(&chain_id);
    stream.append_empty_data();
    stream.append_empty_data();
    stream.out().to_vec()
}

pub fn serialize_signed(fields: &TxFields, chain_id: u64, signature: &RawSignature) -> Result<Vec<u8>, CodecError> {
    let v = signature_v(chain_id, signature.recovery)?;
    let mut stream = RlpStream::new_list(SIGNED_ITEMS);
    append_fields(&mut stream, fields);
    stream.append(&v);
    stream.append(&trim_zeros(&signature.r));
    stream.append(&trim_zeros(&signature.s));
    Ok(stream.out().to_vec())
}

fn rlp_error(err: rlp::DecoderError) -> CodecError {
    CodecError::Decode(format!("rlp: {err}"))
}

fn item<'a>(list: &Rlp<'a>, index: usize, name: &str) -> Result<&'a [u8], CodecError> {
    list.at(index)
        .and_then(|i| i.data())
        .map_err(|e| CodecError::Decode(format!("rlp field {name}: {e}")))
}

/// Big-endian integer without leading zero bytes.
fn quantity(list: &Rlp<'_>, index: usize, name: &str) -> Result<BigUint, CodecError> {
    let data = item(list, index, name)?;
    if data.first() == Some(&0) {
        return Err(CodecError::Decode(format!("{name} has leading zeros")));
    }
    Ok(BigUint::from_bytes_be(data))
}

fn small_quantity(list: &Rlp<'_>, index: usize, name: &str) -> Result<u64, CodecError> {
    let value = quantity(list, index, name)?;
    u64::try_from(&value).map_err(|_| CodecError::Decode(format!("{name} out of range: {value}")))
}

fn scalar(list: &Rlp<'_>, index: usize, name: &str) -> Result<[u8; 32], CodecError> {
    let data = item(list, index, name)?;
    if data.len() > 32 {
        return Err(CodecError::Decode(format!("{name} longer than 32 bytes")));
    }
    let mut out = [0u8; 32];
    out[32 - data.len()..].copy_from_slice(data);
    Ok(out)
}

/// A decoded signed transaction before `v` is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedFields {
    pub fields: TxFields,
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

pub fn deserialize_signed(bytes: &[u8]) -> Result<SignedFields, CodecError> {
    let list = Rlp::new(bytes);
    let info = list.payload_info().map_err(rlp_error)?;
    if info.total() != bytes.len() {
        return Err(CodecError::Decode("trailing bytes after transaction".into()));
    }
    if !list.is_list() {
        return Err(CodecError::Decode("transaction is not an rlp list".into()));
    }
    let count = list.item_count().map_err(rlp_error)?;
    if count != SIGNED_ITEMS {
        return Err(CodecError::Decode(format!("expected {SIGNED_ITEMS} rlp items but got {count}")));
    }

    let to = item(&list, 3, "to")?;
    let to: [u8; ADDRESS_LENGTH] = match to.len() {
        0 => return Err(CodecError::UnsupportedOperation("contract creation".into())),
        _ => to
            .try_into()
            .map_err(|_| CodecError::Decode(format!("recipient must be 20 bytes but was {}", to.len())))?,
    };
    let fields = TxFields {
        nonce: small_quantity(&list, 0, "nonce")?,
        gas_price: quantity(&list, 1, "gasPrice")?,
        gas_limit: small_quantity(&list, 2, "gasLimit")?,
        to,
        value: quantity(&list, 4, "value")?,
        data: item(&list, 5, "data")?.to_vec(),
    };
    Ok(SignedFields {
        fields,
        v: small_quantity(&list, 6, "v")?,
        r: scalar(&list, 7, "r")?,
        s: scalar(&list, 8, "s")?,
    })
}
