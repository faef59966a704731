//! Fixed-precision money type.
//!
//! All monetary values in the ledger are [`Amount`]s: non-negative scaled
//! integers over micro units (6 decimal places). Binary floating point is
//! never used, so repeated top-up/deduct cycles cannot accumulate rounding
//! drift. Amounts serialize as decimal strings ("5.000000") to match the
//! on-disk ledger files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::constants::{AMOUNT_DECIMALS, AMOUNT_SCALE};

/// Errors produced when parsing a decimal string into an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Input was empty or contained non-digit characters.
    #[error("invalid amount: {0:?}")]
    Invalid(String),

    /// More fractional digits than the ledger precision carries.
    #[error("too many decimal places in {0:?} (max {AMOUNT_DECIMALS})")]
    TooPrecise(String),

    /// Value does not fit in the underlying integer.
    #[error("amount out of range: {0:?}")]
    Overflow(String),
}

/// A non-negative amount of stablecoin in micro units (10^-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Construct from raw micro units.
    pub const fn from_micros(micros: u64) -> Self {
        Amount(micros)
    }

    /// Raw micro units.
    pub const fn micros(&self) -> u64 {
        self.0
    }

    /// Parse a decimal string such as `"5"`, `"5.00"`, or `"0.000001"`.
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        s.parse()
    }

    /// True when the amount is exactly zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition, `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction, `None` when `other` exceeds `self`.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / AMOUNT_SCALE;
        let frac = self.0 % AMOUNT_SCALE;
        write!(f, "{whole}.{frac:0width$}", width = AMOUNT_DECIMALS as usize)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Invalid(s.to_string()));
        }

        let (whole_str, frac_str) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole_str.is_empty() && frac_str.is_empty() {
            return Err(AmountError::Invalid(s.to_string()));
        }
        if !whole_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AmountError::Invalid(s.to_string()));
        }
        if frac_str.len() > AMOUNT_DECIMALS as usize {
            return Err(AmountError::TooPrecise(s.to_string()));
        }

        let whole: u64 = if whole_str.is_empty() {
            0
        } else {
            whole_str
                .parse()
                .map_err(|_| AmountError::Overflow(s.to_string()))?
        };

        let mut frac: u64 = 0;
        if !frac_str.is_empty() {
            frac = frac_str
                .parse()
                .map_err(|_| AmountError::Overflow(s.to_string()))?;
            frac *= 10u64.pow(AMOUNT_DECIMALS - frac_str.len() as u32);
        }

        whole
            .checked_mul(AMOUNT_SCALE)
            .and_then(|m| m.checked_add(frac))
            .map(Amount)
            .ok_or_else(|| AmountError::Overflow(s.to_string()))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
