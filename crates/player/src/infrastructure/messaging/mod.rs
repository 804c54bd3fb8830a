//! Ledger event messaging infrastructure.
//!
//! - `EventRegistry`: per-kind handler table that ledger adapters dispatch into
//! - `EventSubscription`: owned registration, released exactly once

pub mod event_registry;
pub mod subscription;

pub use event_registry::EventRegistry;
pub use subscription::EventSubscription;
