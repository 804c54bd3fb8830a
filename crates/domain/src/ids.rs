use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder identity used before any real battle activity has been seen.
///
/// Notifications attributed to this address are never shown.
pub const UNSET_ADDRESS: &str = "asdfghjklasdfghjkl";

/// A ledger account identity (wallet address).
///
/// Ledger addresses are checksummed with mixed case, but two spellings that
/// differ only in case refer to the same account, so equality is
/// case-insensitive.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().trim().to_string())
    }

    /// The sentinel "unset" identity.
    pub fn unset() -> Self {
        Self(UNSET_ADDRESS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the sentinel placeholder and for an empty address.
    pub fn is_unset(&self) -> bool {
        self.0.is_empty() || self.0.eq_ignore_ascii_case(UNSET_ADDRESS)
    }

    /// Case-insensitive identity check.
    pub fn matches(&self, other: &AccountAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Abbreviated form for display: first five and last four characters.
    ///
    /// Addresses too short to abbreviate are returned unchanged.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 9 {
            return self.0.clone();
        }
        let head: String = chars[..5].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl PartialEq for AccountAddress {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountAddress {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Identifier of a minted character NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u64);

impl TokenId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
