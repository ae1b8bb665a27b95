//! SLIP-10 path components and the derivation path conventions in use.
//!
//! Every function here is pure: equal inputs give bit-identical paths.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// One path component as stored on the wire: hardened indices carry
/// the top bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slip10RawIndex(pub u32);

impl Slip10RawIndex {
    /// Fails unless `index` is below 2^31.
    pub fn hardened(index: u32) -> Result<Self, WalletError> {
        Ok(Self(in_range(index)? | HARDENED_OFFSET))
    }

    /// Fails unless `index` is below 2^31.
    pub fn normal(index: u32) -> Result<Self, WalletError> {
        Ok(Self(in_range(index)?))
    }

    pub fn is_hardened(&self) -> bool {
        self.0 >= HARDENED_OFFSET
    }

    /// Index without the hardened flag.
    pub fn index(&self) -> u32 {
        self.0 & !HARDENED_OFFSET
    }

    pub fn to_be_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

fn in_range(index: u32) -> Result<u32, WalletError> {
    if index >= HARDENED_OFFSET {
        return Err(WalletError::InvalidPath(format!("index {index} does not fit into 31 bits")));
    }
    Ok(index)
}

impl fmt::Display for Slip10RawIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

/// `m/44'/234'/0'` notation.
pub fn path_to_string(path: &[Slip10RawIndex]) -> String {
    let mut out = String::from("m");
    for component in path {
        out.push('/');
        out.push_str(&component.to_string());
    }
    out
}

pub fn parse_path(input: &str) -> Result<Vec<Slip10RawIndex>, WalletError> {
    let mut parts = input.split('/');
    if parts.next() != Some("m") {
        return Err(WalletError::InvalidPath(format!("path must start with m: {input}")));
    }
    parts
        .map(|part| {
            let (digits, hardened) = match part.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            let index: u32 = digits
                .parse()
                .map_err(|_| WalletError::InvalidPath(format!("invalid component {part:?} in {input}")))?;
            if hardened { Slip10RawIndex::hardened(index) } else { Slip10RawIndex::normal(index) }
        })
        .collect()
}

/// Path presets. Each fails when an index does not fit into 31 bits.
pub struct HdPaths;

type PathResult = Result<Vec<Slip10RawIndex>, WalletError>;

impl HdPaths {
    /// `m/4804438'/i'`
    pub fn simple_address(index: u32) -> PathResult {
        Ok(vec![Slip10RawIndex::hardened(4_804_438)?, Slip10RawIndex::hardened(index)?])
    }

    /// Full five-component BIP-44 path. The last two components are not
    /// hardened, so ed25519 cannot use it.
    pub fn bip44(coin_type: u32, account: u32, change: u32, address: u32) -> PathResult {
        Ok(vec![
            Slip10RawIndex::hardened(44)?,
            Slip10RawIndex::hardened(coin_type)?,
            Slip10RawIndex::hardened(account)?,
            Slip10RawIndex::normal(change)?,
            Slip10RawIndex::normal(address)?,
        ])
    }

    /// `m/44'/c'/a'` for account based coins.
    pub fn bip44_like(coin_type: u32, account: u32) -> PathResult {
        Ok(vec![
            Slip10RawIndex::hardened(44)?,
            Slip10RawIndex::hardened(coin_type)?,
            Slip10RawIndex::hardened(account)?,
        ])
    }

    pub fn iov(account: u32) -> PathResult {
        Self::bip44_like(234, account)
    }

    /// `m/44'/60'/0'/0/a`
    pub fn ethereum(account: u32) -> PathResult {
        Self::bip44(60, 0, 0, account)
    }

    /// Same as [`HdPaths::ethereum`].
    pub fn metamask(account: u32) -> PathResult {
        Self::ethereum(account)
    }
}
