//! Domain errors
//!
//! Raised when a character record breaks an invariant or a lifecycle is asked
//! for a transition it does not allow.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A character or notification field is out of range
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Lifecycle transition refused
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// # Example
    /// ```ignore
    /// if max_hp == 0 {
    ///     return Err(DomainError::validation("max_hp must be positive"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }
}
