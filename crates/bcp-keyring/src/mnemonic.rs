//! BIP-39 English mnemonics.

use std::fmt;

use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::WalletError;

/// 64-byte BIP-39 seed, the input of SLIP-10 master key derivation.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Bip39Seed([u8; 64]);

impl Bip39Seed {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Bip39Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bip39Seed").field(&"[REDACTED]").finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct EnglishMnemonic(Mnemonic);

impl EnglishMnemonic {
    /// Parses a phrase of 12 to 24 words. Whitespace and case are normalized.
    pub fn parse(phrase: &str) -> Result<Self, WalletError> {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let mnemonic = Mnemonic::parse_in(Language::English, &normalized)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        Ok(Self(mnemonic))
    }

    /// 16 to 32 bytes of entropy, in steps of 4.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self, WalletError> {
        Mnemonic::from_entropy_in(Language::English, entropy)
            .map(Self)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
    }

    /// Fresh mnemonic from the OS RNG. `word_count` is one of 12, 15, 18, 21, 24.
    pub fn generate(word_count: usize) -> Result<Self, WalletError> {
        if !matches!(word_count, 12 | 15 | 18 | 21 | 24) {
            return Err(WalletError::InvalidMnemonic(format!("unsupported word count: {word_count}")));
        }
        let mut entropy = vec![0u8; word_count * 4 / 3];
        rand::rngs::OsRng.fill_bytes(&mut entropy);
        let mnemonic = Self::from_entropy(&entropy);
        entropy.zeroize();
        mnemonic
    }

    pub fn word_count(&self) -> usize {
        self.0.word_count()
    }

    /// Seed with an empty passphrase.
    pub fn to_seed(&self) -> Bip39Seed {
        Bip39Seed(self.0.to_seed(""))
    }
}

impl fmt::Display for EnglishMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EnglishMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnglishMnemonic({} words)", self.word_count())
    }
}
