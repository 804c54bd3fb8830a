//! Test utilities
//!
//! `MockLedger` is available in unit tests and, with the `testing` feature,
//! to downstream crates. `fixtures` panics on invalid data and is unit-test
//! only.
//!
//! ```ignore
//! let ledger = Arc::new(MockLedger::new());
//! ledger.requests.expect_send_attack().returning(|| Ok(fixtures::attack_handle()));
//! ledger.events.dispatch(event);
//! ```

#[cfg(test)]
pub mod fixtures;
mod mock_ledger;

pub use mock_ledger::MockLedger;
