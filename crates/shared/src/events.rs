//! Contract events
//!
//! The ledger emits two events the arena listens for. Event arguments keep
//! their wire encoding; the client normalizes them once on arrival.
//!
//! Unknown event names deserialize to `Unknown` for forward compatibility.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ledger_number::LedgerNumber;

/// Subscription names understood by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerEventKind {
    #[serde(rename = "AttackComplete")]
    AttackComplete,
    #[serde(rename = "CharacterNFTMinted")]
    CharacterNftMinted,
}

impl LedgerEventKind {
    pub const ALL: [LedgerEventKind; 2] = [Self::AttackComplete, Self::CharacterNftMinted];

    /// Contract event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AttackComplete => "AttackComplete",
            Self::CharacterNftMinted => "CharacterNFTMinted",
        }
    }
}

impl fmt::Display for LedgerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A contract event with its raw arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    /// `AttackComplete(newBossHp, newPlayerHp, sender, bossAttackDamage, playerAttackDamage)`
    #[serde(rename = "AttackComplete", rename_all = "camelCase")]
    AttackComplete {
        new_boss_hp: LedgerNumber,
        new_player_hp: LedgerNumber,
        sender: String,
        /// Damage the boss dealt to the attacking player
        boss_attack_damage: LedgerNumber,
        /// Damage the attacking player dealt to the boss
        player_attack_damage: LedgerNumber,
    },
    /// `CharacterNFTMinted(sender, tokenId, characterIndex)`
    #[serde(rename = "CharacterNFTMinted", rename_all = "camelCase")]
    CharacterNftMinted {
        sender: String,
        token_id: LedgerNumber,
        character_index: LedgerNumber,
    },
    #[serde(other)]
    Unknown,
}

impl LedgerEvent {
    /// Subscription this event is delivered under, if any.
    pub fn kind(&self) -> Option<LedgerEventKind> {
        match self {
            Self::AttackComplete { .. } => Some(LedgerEventKind::AttackComplete),
            Self::CharacterNftMinted { .. } => Some(LedgerEventKind::CharacterNftMinted),
            Self::Unknown => None,
        }
    }
}
