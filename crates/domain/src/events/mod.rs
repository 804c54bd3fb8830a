//! Domain Events
//!
//! Strongly typed confirmation events. The ledger adapter produces raw,
//! loosely encoded payloads; they are converted into these types exactly once
//! at the repository boundary.

pub mod battle_events;

pub use battle_events::*;
