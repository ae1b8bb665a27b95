//! Arbitrary precision, non-negative decimals.
//!
//! A [`Decimal`] is an integer count of atomic units plus a fixed number of
//! fractional digits. Arithmetic stays in [`BigUint`] so no quantity is
//! ever routed through floating point.

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::DecimalError;
use crate::types::{Amount, TokenTicker};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    atomics: BigUint,
    fractional_digits: u32,
}

impl Decimal {
    /// Parses a human-entered decimal such as `"1.5"` or `".25"`.
    ///
    /// Only digits and at most one `.` are accepted. Trailing zeros in the
    /// fractional part are ignored before the precision check.
    pub fn from_user_input(input: &str, fractional_digits: u32) -> Result<Self, DecimalError> {
        if let Some(pos) = input.chars().position(|c| !(c.is_ascii_digit() || c == '.')) {
            return Err(DecimalError::InvalidCharacter(pos + 1));
        }

        let mut parts = input.split('.');
        let whole = parts.next().unwrap_or("");
        let fractional = parts.next().unwrap_or("").trim_end_matches('0');
        if parts.next().is_some() {
            return Err(DecimalError::MultipleSeparators);
        }
        if fractional.len() > fractional_digits as usize {
            return Err(DecimalError::TooManyFractionalDigits);
        }

        let mut quantity = String::with_capacity(whole.len() + fractional_digits as usize);
        quantity.push_str(whole);
        quantity.push_str(fractional);
        quantity.extend(std::iter::repeat_n('0', fractional_digits as usize - fractional.len()));

        Ok(Self { atomics: parse_digits(&quantity)?, fractional_digits })
    }

    /// Builds a decimal from its atomic integer representation.
    pub fn from_atomics(atomics: &str, fractional_digits: u32) -> Result<Self, DecimalError> {
        if atomics.is_empty() {
            return Err(DecimalError::InvalidQuantity("empty".into()));
        }
        Ok(Self { atomics: parse_digits(atomics)?, fractional_digits })
    }

    /// Canonical base-10 string of the atomic units.
    pub fn atomics(&self) -> String {
        self.atomics.to_string()
    }

    pub fn fractional_digits(&self) -> u32 {
        self.fractional_digits
    }

    pub fn to_amount(&self, token_ticker: TokenTicker) -> Amount {
        Amount {
            quantity: self.atomics(),
            fractional_digits: self.fractional_digits,
            token_ticker,
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = BigUint::from(10u32).pow(self.fractional_digits);
        let whole = &self.atomics / &scale;
        let fractional = &self.atomics % &scale;
        if fractional.is_zero() {
            return write!(f, "{whole}");
        }
        let padded = format!("{:0>width$}", fractional.to_string(), width = self.fractional_digits as usize);
        write!(f, "{whole}.{}", padded.trim_end_matches('0'))
    }
}

fn parse_digits(digits: &str) -> Result<BigUint, DecimalError> {
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| DecimalError::InvalidQuantity(digits.to_string()))
}

/// Checks the canonical form of an amount quantity: base-10 digits, no
/// sign, no leading zeros beyond `"0"` itself.
pub fn validate_quantity(quantity: &str) -> Result<(), DecimalError> {
    if quantity.is_empty() || !quantity.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecimalError::InvalidQuantity(quantity.to_string()));
    }
    if quantity.len() > 1 && quantity.starts_with('0') {
        return Err(DecimalError::InvalidQuantity(format!("leading zeros in {quantity}")));
    }
    Ok(())
}
