//! Domain entities

pub mod character;
pub mod combat_notification;

pub use character::Character;
pub use combat_notification::{CombatHeadlines, CombatNotification};
