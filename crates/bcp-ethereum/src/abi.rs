//! Contract call data: method selectors, 32-byte words and the head/tail
//! layout of dynamic arguments.

use num_bigint::BigUint;

use bcp_core::crypto::keccak256;
use bcp_core::types::{Address, SwapId};

use crate::address::{ADDRESS_LENGTH, decode_address, to_checksummed_address};
use crate::error::AbiError;

pub const WORD: usize = 32;

/// `transfer(address,uint256)`
pub const ERC20_TRANSFER: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
/// `open(bytes32,address,bytes32,uint256)`
pub const SWAP_OPEN: [u8; 4] = [0x0e, 0xed, 0x85, 0x48];
/// `claim(bytes32,bytes32)`
pub const SWAP_CLAIM: [u8; 4] = [0x84, 0xcc, 0x9d, 0xfb];
/// `abort(bytes32)`
pub const SWAP_ABORT: [u8; 4] = [0x09, 0xd6, 0xce, 0x0e];

/// First four bytes of the Keccak-256 of a canonical method signature.
pub fn method_id(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

pub fn encode_address(address: &Address) -> Result<[u8; WORD], AbiError> {
    let data = decode_address(address)?;
    let mut word = [0u8; WORD];
    word[WORD - ADDRESS_LENGTH..].copy_from_slice(&data);
    Ok(word)
}

pub fn encode_uint256(value: &BigUint) -> Result<[u8; WORD], AbiError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > WORD {
        return Err(AbiError::Uint256Overflow);
    }
    let mut word = [0u8; WORD];
    // zero encodes to [0], which still fits
    word[WORD - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

/// Address in the low 20 bytes of a word. The upper 12 must be zero.
pub fn decode_address_word(word: &[u8]) -> Result<Address, AbiError> {
    let word = as_word(word)?;
    if word[..WORD - ADDRESS_LENGTH].iter().any(|b| *b != 0) {
        return Err(AbiError::InvalidAddress);
    }
    let mut data = [0u8; ADDRESS_LENGTH];
    data.copy_from_slice(&word[WORD - ADDRESS_LENGTH..]);
    Ok(to_checksummed_address(&data))
}

pub fn decode_uint256(word: &[u8]) -> Result<BigUint, AbiError> {
    Ok(BigUint::from_bytes_be(as_word(word)?))
}

fn as_word(data: &[u8]) -> Result<&[u8; WORD], AbiError> {
    data.try_into().map_err(|_| AbiError::TooShort { need: WORD, have: data.len() })
}

/// A word holding a byte offset or length into the same buffer.
fn decode_position(word: &[u8], limit: usize) -> Result<usize, AbiError> {
    let value = decode_uint256(word)?;
    usize::try_from(&value)
        .ok()
        .filter(|v| *v <= limit)
        .ok_or_else(|| AbiError::StartOutOfRange(value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadTail {
    /// Start positions of the arguments, in bytes.
    pub head: Vec<usize>,
    /// Raw argument data, split at the start positions.
    pub tail: Vec<Vec<u8>>,
}

/// Splits the encoding of a list of dynamic arguments. The first start
/// position doubles as the head length.
pub fn decode_head_tail(data: &[u8]) -> Result<HeadTail, AbiError> {
    if data.is_empty() {
        return Err(AbiError::EmptyInput);
    }
    if data.len() % WORD != 0 {
        return Err(AbiError::NotDivisibleBy32);
    }

    let head_length = decode_position(&data[..WORD], data.len()).map_err(|_| AbiError::InvalidHeadLength)?;
    if head_length == 0 || head_length % WORD != 0 || head_length >= data.len() {
        return Err(AbiError::InvalidHeadLength);
    }

    let mut head = Vec::with_capacity(head_length / WORD);
    for word in data[..head_length].chunks(WORD) {
        let start = decode_position(word, data.len())?;
        if start < head_length {
            return Err(AbiError::StartInsideHeader);
        }
        if start % WORD != 0 {
            return Err(AbiError::StartNotAligned);
        }
        if start >= data.len() {
            return Err(AbiError::StartOutOfRange(start.to_string()));
        }
        if head.last().is_some_and(|prev| *prev >= start) {
            return Err(AbiError::StartOrder);
        }
        head.push(start);
    }

    let tail = head
        .iter()
        .enumerate()
        .map(|(i, start)| {
            let end = head.get(i + 1).copied().unwrap_or(data.len());
            data[*start..end].to_vec()
        })
        .collect();
    Ok(HeadTail { head, tail })
}

/// Reads `length || data || padding` and returns `data`.
pub fn decode_variable_length(data: &[u8]) -> Result<Vec<u8>, AbiError> {
    if data.len() < WORD {
        return Err(AbiError::TooShort { need: WORD, have: data.len() });
    }
    let length = decode_position(&data[..WORD], data.len())?;
    let end = WORD + length;
    if data.len() < end {
        return Err(AbiError::TooShort { need: end, have: data.len() });
    }
    Ok(data[WORD..end].to_vec())
}

fn call(selector: [u8; 4], parts: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + parts.iter().map(|p| p.len()).sum::<usize>());
    out.extend_from_slice(&selector);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

pub fn encode_erc20_transfer(recipient: &Address, quantity: &BigUint) -> Result<Vec<u8>, AbiError> {
    Ok(call(ERC20_TRANSFER, &[&encode_address(recipient)?, &encode_uint256(quantity)?]))
}

fn bytes32<'a>(field: &'static str, value: &'a [u8]) -> Result<&'a [u8], AbiError> {
    if value.len() != WORD {
        return Err(AbiError::NotBytes32 { field, len: value.len() });
    }
    Ok(value)
}

/// Swap ids, hashes and preimages are `bytes32`.
pub fn encode_swap_open(
    swap_id: &SwapId,
    recipient: &Address,
    hash: &[u8],
    timeout_height: u64,
) -> Result<Vec<u8>, AbiError> {
    let timeout = encode_uint256(&BigUint::from(timeout_height))?;
    Ok(call(
        SWAP_OPEN,
        &[bytes32("swap id", &swap_id.0)?, &encode_address(recipient)?, bytes32("hash", hash)?, &timeout],
    ))
}

pub fn encode_swap_claim(swap_id: &SwapId, preimage: &[u8]) -> Result<Vec<u8>, AbiError> {
    Ok(call(SWAP_CLAIM, &[bytes32("swap id", &swap_id.0)?, bytes32("preimage", preimage)?]))
}

pub fn encode_swap_abort(swap_id: &SwapId) -> Result<Vec<u8>, AbiError> {
    Ok(call(SWAP_ABORT, &[bytes32("swap id", &swap_id.0)?]))
}

/// Decoded call to one of the known contract methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    Erc20Transfer { recipient: Address, quantity: BigUint },
    SwapOpen { swap_id: SwapId, recipient: Address, hash: Vec<u8>, timeout_height: u64 },
    SwapClaim { swap_id: SwapId, preimage: Vec<u8> },
    SwapAbort { swap_id: SwapId },
}

fn words(args: &[u8], count: usize) -> Result<Vec<&[u8]>, AbiError> {
    let need = count * WORD;
    if args.len() != need {
        return Err(AbiError::TooShort { need, have: args.len() });
    }
    Ok(args.chunks(WORD).collect())
}

/// Decodes `transfer` call data. `None` for any other selector.
pub fn decode_erc20_call(data: &[u8]) -> Result<Option<ContractCall>, AbiError> {
    match data.split_first_chunk::<4>() {
        Some((&ERC20_TRANSFER, args)) => {
            let w = words(args, 2)?;
            Ok(Some(ContractCall::Erc20Transfer {
                recipient: decode_address_word(w[0])?,
                quantity: decode_uint256(w[1])?,
            }))
        }
        _ => Ok(None),
    }
}

/// Decodes swap contract call data. `None` for an unknown selector.
pub fn decode_swap_call(data: &[u8]) -> Result<Option<ContractCall>, AbiError> {
    let Some((selector, args)) = data.split_first_chunk::<4>() else {
        return Ok(None);
    };
    let decoded = match *selector {
        SWAP_OPEN => {
            let w = words(args, 4)?;
            let timeout = decode_uint256(w[3])?;
            ContractCall::SwapOpen {
                swap_id: SwapId(w[0].to_vec()),
                recipient: decode_address_word(w[1])?,
                hash: w[2].to_vec(),
                timeout_height: u64::try_from(&timeout)
                    .map_err(|_| AbiError::StartOutOfRange(timeout.to_string()))?,
            }
        }
        SWAP_CLAIM => {
            let w = words(args, 2)?;
            ContractCall::SwapClaim { swap_id: SwapId(w[0].to_vec()), preimage: w[1].to_vec() }
        }
        SWAP_ABORT => {
            let w = words(args, 1)?;
            ContractCall::SwapAbort { swap_id: SwapId(w[0].to_vec()) }
        }
        _ => return Ok(None),
    };
    Ok(Some(decoded))
}
