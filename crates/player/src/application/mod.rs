pub mod dto;
pub mod error;
pub mod services;

pub use dto::{BattlePhase, BattleView, IntentOutcome, MintSelection};
pub use error::{BattleError, RepositoryError};
pub use services::BattleCoordinator;
