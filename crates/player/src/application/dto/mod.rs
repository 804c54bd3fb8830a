//! Data transfer objects for the presentation edge.

mod battle_view;

pub use battle_view::{BattlePhase, BattleView, IntentOutcome, MintSelection};
