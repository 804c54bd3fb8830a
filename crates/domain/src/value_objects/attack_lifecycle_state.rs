//! Attack lifecycle state
//!
//! The transient animation/availability state of one battle actor.

use std::fmt;

use serde::Serialize;

use crate::error::DomainError;

/// The two sides of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Actor {
    /// The local session's character
    Player,
    /// The shared boss
    Boss,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Player => write!(f, "player"),
            Actor::Boss => write!(f, "boss"),
        }
    }
}

/// Attack lifecycle state of one actor
///
/// # State Transitions
///
/// ```text
/// Idle    -> Pending   (local player issued an attack)
/// Hit     -> Pending   (attack again while the hit animation plays)
/// Pending -> Idle      (request rejected, or confirmed without damage)
/// Pending -> Hit       (confirmed with damage received)
/// Idle    -> Hit       (player only: confirmed damage arrived after a local revert)
/// Hit     -> Hit       (player only: another confirmation re-arms the window)
/// Hit     -> Idle      (display window elapsed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum AttackLifecycleState {
    #[default]
    Idle,
    /// An attack request is in flight
    Pending,
    /// Confirmed damage is being displayed
    Hit,
}

impl AttackLifecycleState {
    #[inline]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    #[inline]
    pub fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }

    /// Transition for a newly issued attack.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` while an attack is
    /// already pending.
    pub fn begin_attack(self) -> Result<Self, DomainError> {
        match self {
            Self::Idle | Self::Hit => Ok(Self::Pending),
            Self::Pending => Err(DomainError::invalid_state_transition(
                "attack already pending",
            )),
        }
    }

    /// Transition for confirmed damage received by `actor`.
    ///
    /// The boss only reacts to damage while the local attack is pending; the
    /// player reacts from any state.
    pub fn receive_damage(self, actor: Actor) -> Result<Self, DomainError> {
        match (actor, self) {
            (_, Self::Pending) => Ok(Self::Hit),
            (Actor::Player, Self::Idle | Self::Hit) => Ok(Self::Hit),
            (_, state) => Err(DomainError::invalid_state_transition(format!(
                "{} cannot be hit from {}",
                actor, state
            ))),
        }
    }

    /// Transition back to rest: request failed, confirmed without damage, or
    /// the hit window elapsed.
    pub fn settle(self) -> Self {
        Self::Idle
    }
}

impl fmt::Display for AttackLifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Hit => write!(f, "hit"),
        }
    }
}
