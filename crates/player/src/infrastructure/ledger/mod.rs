//! Ledger adapters

mod deployment;
mod simulated;

pub use deployment::ContractDeployment;
pub use simulated::SimulatedLedger;
