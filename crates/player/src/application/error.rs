//! Application layer error types
//!
//! Every failure the battle surfaces to callers. Ledger transport details stay
//! wrapped in `LedgerError`; record decoding problems in `RepositoryError`.

use avengers_shared::LedgerEventKind;

use crate::ports::outbound::LedgerError;

/// A ledger record or event that could not be turned into domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Malformed record field '{field}': {reason}")]
    MalformedRecord { field: &'static str, reason: String },
    #[error("Unsupported ledger event")]
    UnsupportedEvent,
}

impl RepositoryError {
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors returned by `BattleCoordinator` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    /// No ledger client was supplied
    #[error("Ledger connection unavailable")]
    ConnectionUnavailable,
    /// The ledger refused or lost the outbound request
    #[error("Request rejected: {0}")]
    RequestRejected(#[source] LedgerError),
    /// A contract read failed
    #[error("Ledger read failed: {0}")]
    ReadFailed(#[source] LedgerError),
    #[error(transparent)]
    MalformedRecord(#[from] RepositoryError),
    #[error("Subscription to {kind} failed: {message}")]
    SubscriptionFailure {
        kind: LedgerEventKind,
        message: String,
    },
    #[error("Roster index {index} out of bounds for roster of {roster_size}")]
    RosterIndexOutOfBounds { index: usize, roster_size: usize },
    #[error("Roster is empty")]
    EmptyRoster,
    /// The local session has not minted a character yet
    #[error("No character selected")]
    NoCharacter,
    /// The local character is at zero hp
    #[error("Character is defeated")]
    CharacterDefeated,
}

impl BattleError {
    /// Whether the same intent may succeed if issued again unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RequestRejected(_) | Self::ReadFailed(_) | Self::SubscriptionFailure { .. }
        )
    }
}

impl From<LedgerError> for BattleError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::Subscription { kind, message } => {
                Self::SubscriptionFailure { kind, message }
            }
            other => Self::RequestRejected(other),
        }
    }
}
