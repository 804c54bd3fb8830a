//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to interact with the ledger, the clock and
//! randomness without depending on concrete implementations.

pub mod ledger_port;
pub mod platform;

pub use ledger_port::{
    AcceptanceReceipt, LedgerClient, LedgerError, LedgerEventHandler, LedgerEventPort,
    LedgerRequestPort, SubscriptionId, TransactionHandle, TransactionKind,
};
pub use platform::{ClockPort, RandomPort};

#[cfg(any(test, feature = "testing"))]
pub use ledger_port::MockLedgerRequestPort;
#[cfg(any(test, feature = "testing"))]
pub use platform::{MockClockPort, MockRandomPort};
