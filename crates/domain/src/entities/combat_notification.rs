//! Combat notification - a transient "who hit whom" toast.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::AccountAddress;

/// Result of one resolved attack, as shown to every observer of the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatNotification {
    /// The account whose character attacked.
    pub actor: AccountAddress,
    /// Damage the attacker dealt to the boss.
    pub target_damage: u64,
    /// Damage the boss dealt back to the attacker.
    pub source_damage: u64,
    pub issued_at: DateTime<Utc>,
}

/// The two display lines derived from a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatHeadlines {
    /// True when the attacker is the local session's account.
    pub by_local_actor: bool,
    /// "attacker hit boss" line.
    pub attack: String,
    /// "boss hit attacker" line.
    pub counter_attack: String,
}

impl CombatNotification {
    pub fn new(
        actor: AccountAddress,
        target_damage: u64,
        source_damage: u64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor,
            target_damage,
            source_damage,
            issued_at,
        }
    }

    /// Notifications for the placeholder identity are never displayed.
    pub fn is_suppressed(&self) -> bool {
        self.actor.is_unset()
    }

    /// Whether `local` dealt this damage (case-insensitive identity check).
    pub fn is_from(&self, local: &AccountAddress) -> bool {
        self.actor.matches(local)
    }

    /// Format the attack and counter-attack lines.
    ///
    /// The attacker is rendered as "You" for the local account and by its
    /// abbreviated address otherwise.
    pub fn headlines(
        &self,
        local: &AccountAddress,
        character_name: &str,
        boss_name: &str,
    ) -> CombatHeadlines {
        let by_local_actor = self.is_from(local);
        let attacker = if by_local_actor {
            format!("Your {}", character_name)
        } else {
            format!("{}'s {}", self.actor.short(), character_name)
        };
        let defender = if by_local_actor {
            format!("your {}", character_name)
        } else {
            attacker.clone()
        };

        CombatHeadlines {
            by_local_actor,
            attack: format!(
                "💥 {} hit {} for {}",
                attacker, boss_name, self.target_damage
            ),
            counter_attack: format!(
                "💥 {} hit {} for {}",
                boss_name, defender, self.source_damage
            ),
        }
    }
}
