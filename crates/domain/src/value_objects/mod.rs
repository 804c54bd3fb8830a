//! Value objects

pub mod attack_lifecycle_state;

pub use attack_lifecycle_state::{Actor, AttackLifecycleState};
