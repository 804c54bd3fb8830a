//! Avengers Arena Domain
//!
//! Core types shared by the battle client:
//! - `entities/` - characters and combat notifications
//! - `value_objects/` - attack lifecycle state
//! - `events/` - normalized ledger confirmation events
//! - `ids` - account and token identifiers

pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use entities::{Character, CombatHeadlines, CombatNotification};
pub use error::DomainError;
pub use events::{AttackResolved, BattleEvent, CharacterMinted};
pub use ids::{AccountAddress, TokenId, UNSET_ADDRESS};
pub use value_objects::{Actor, AttackLifecycleState};
