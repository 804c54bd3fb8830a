pub mod ledger;
pub mod messaging;
pub mod platform;
pub mod scheduler;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use ledger::{ContractDeployment, SimulatedLedger};
pub use messaging::{EventRegistry, EventSubscription};
pub use platform::{SystemClock, SystemRandom};
pub use scheduler::ScheduledTask;
pub use settings::BattleSettings;
