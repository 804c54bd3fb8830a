//! Avengers Arena player crate.
//!
//! Client-side battle state for the `NftGame` contract: intents go out as
//! ledger transactions, confirmations come back as contract events and are
//! folded into a single observable [`BattleView`].

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::{BattleCoordinator, BattleError, BattleView, IntentOutcome, MintSelection};
pub use infrastructure::{BattleSettings, ContractDeployment, SimulatedLedger};
