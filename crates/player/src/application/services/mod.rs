//! Application services
//!
//! The battle use cases. Services depend on port traits, not concrete
//! infrastructure implementations.

pub mod attack_lifecycle;
pub mod battle_coordinator;
pub mod character_repository;
pub mod notification_queue;

#[cfg(test)]
mod battle_integration_tests;

pub use attack_lifecycle::AttackLifecycle;
pub use battle_coordinator::BattleCoordinator;
pub use character_repository::CharacterRepository;
pub use notification_queue::NotificationQueue;
