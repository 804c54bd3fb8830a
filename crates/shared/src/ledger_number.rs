//! Ledger-native integer encodings
//!
//! Contract reads and event arguments carry 256-bit unsigned integers. Over
//! JSON they show up in three shapes:
//!
//! - a big-number wrapper: `{"type": "BigNumber", "hex": "0x01f4"}`
//! - a plain JSON number: `500`
//! - a decimal or `0x` hex string: `"500"`, `"0x1f4"`
//!
//! `LedgerNumber` keeps the encoding as received; [`LedgerNumber::to_u64`]
//! converts it and refuses anything that would lose precision.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conversion failures for ledger integers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerNumberError {
    #[error("empty number")]
    Empty,
    #[error("invalid digit in '{0}'")]
    InvalidDigit(String),
    #[error("value '{0}' does not fit in 64 bits")]
    Overflow(String),
    #[error("negative value '{0}'")]
    Negative(String),
    #[error("non-integer value '{0}'")]
    NotInteger(String),
}

/// An integer as encoded by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerNumber {
    /// Big-number wrapper object
    Big {
        #[serde(rename = "type", default = "big_number_tag")]
        kind: String,
        hex: String,
    },
    /// Plain JSON number
    Integer(serde_json::Number),
    /// Decimal or hex string
    Text(String),
}

fn big_number_tag() -> String {
    "BigNumber".to_string()
}

impl LedgerNumber {
    /// Encode `value` the way the ledger's big-number wrapper does.
    pub fn big(value: u64) -> Self {
        let mut hex = format!("{:x}", value);
        if hex.len() % 2 == 1 {
            hex.insert(0, '0');
        }
        Self::Big {
            kind: big_number_tag(),
            hex: format!("0x{}", hex),
        }
    }

    /// Convert to `u64` without precision loss.
    pub fn to_u64(&self) -> Result<u64, LedgerNumberError> {
        match self {
            Self::Big { hex, .. } => parse_text(hex),
            Self::Integer(number) => {
                if let Some(value) = number.as_u64() {
                    Ok(value)
                } else if number.as_i64().is_some() {
                    Err(LedgerNumberError::Negative(number.to_string()))
                } else {
                    match number.as_f64() {
                        Some(value) if value < 0.0 => {
                            Err(LedgerNumberError::Negative(number.to_string()))
                        }
                        Some(value) if value.fract() != 0.0 => {
                            Err(LedgerNumberError::NotInteger(number.to_string()))
                        }
                        _ => Err(LedgerNumberError::Overflow(number.to_string())),
                    }
                }
            }
            Self::Text(text) => parse_text(text),
        }
    }
}

fn parse_text(raw: &str) -> Result<u64, LedgerNumberError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(LedgerNumberError::Empty);
    }
    if text.starts_with('-') {
        return Err(LedgerNumberError::Negative(text.to_string()));
    }

    let (digits, radix) = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };
    if digits.is_empty() {
        return Err(LedgerNumberError::Empty);
    }
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(LedgerNumberError::InvalidDigit(text.to_string()));
    }

    // Leading zeros are padding and never overflow.
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(significant, radix)
        .map_err(|_| LedgerNumberError::Overflow(text.to_string()))
}

impl From<u64> for LedgerNumber {
    fn from(value: u64) -> Self {
        Self::big(value)
    }
}

impl fmt::Display for LedgerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Big { hex, .. } => write!(f, "{}", hex),
            Self::Integer(number) => write!(f, "{}", number),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}
