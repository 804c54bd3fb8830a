//! Presentation snapshot of the arena.

use serde::Serialize;

use avengers_domain::{
    AccountAddress, AttackLifecycleState, Character, CombatHeadlines, CombatNotification,
};

use crate::ports::outbound::AcceptanceReceipt;

/// Which screen the arena should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BattlePhase {
    /// No character yet: show the roster
    SelectCharacter,
    /// Character alive: show the fight
    Battle,
    /// Character at zero hp: offer a new mint
    Respawn,
}

/// Everything a renderer needs, derived from coordinator state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleView {
    pub player: Option<Character>,
    pub boss: Option<Character>,
    pub roster: Vec<Character>,
    pub player_lifecycle: AttackLifecycleState,
    pub boss_lifecycle: AttackLifecycleState,
    pub visible_notification: Option<CombatNotification>,
    pub minting_in_progress: bool,
}

impl BattleView {
    pub fn phase(&self) -> BattlePhase {
        match &self.player {
            None => BattlePhase::SelectCharacter,
            Some(player) if player.is_defeated() => BattlePhase::Respawn,
            Some(_) => BattlePhase::Battle,
        }
    }

    /// The attack control is enabled.
    pub fn can_attack(&self) -> bool {
        self.phase() == BattlePhase::Battle
            && self.boss.as_ref().is_some_and(|boss| !boss.is_defeated())
            && !self.player_lifecycle.is_pending()
    }

    /// Display lines for the visible notification, if there is one and both
    /// combatants are known.
    pub fn headlines(&self, local: &AccountAddress) -> Option<CombatHeadlines> {
        let notification = self.visible_notification.as_ref()?;
        let player = self.player.as_ref()?;
        let boss = self.boss.as_ref()?;
        Some(notification.headlines(local, player.name(), boss.name()))
    }
}

/// Result of a user intent that reached (or deliberately skipped) the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The request was accepted locally; confirmation arrives as an event
    Accepted(AcceptanceReceipt),
    /// An identical request is already in flight; nothing was sent
    Ignored,
}

impl IntentOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Which roster template to mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintSelection {
    Index(usize),
    /// Uniform draw over the roster, excluding its last entry
    Random,
}
