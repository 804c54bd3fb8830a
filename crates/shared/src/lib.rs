//! Avengers Arena Protocol - Wire types for the `NftGame` ledger contract
//!
//! This crate contains the shapes the ledger hands back to the client:
//! - `LedgerNumber` - the ledger's arbitrary-precision integer encodings
//! - `RawCharacterRecord` - a character struct exactly as returned by contract reads
//! - `LedgerEvent` / `LedgerEventKind` - contract events and their subscription names
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **Lossless** - nothing is converted to native integers here; the client
//!    repository normalizes records exactly once

pub mod events;
pub mod ledger_number;
pub mod records;

pub use events::{LedgerEvent, LedgerEventKind};
pub use ledger_number::{LedgerNumber, LedgerNumberError};
pub use records::RawCharacterRecord;
