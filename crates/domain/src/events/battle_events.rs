//! Confirmation events emitted by the ledger, after normalization.

use serde::Serialize;

use crate::ids::{AccountAddress, TokenId};

/// An attack has been applied on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackResolved {
    pub new_boss_hp: u64,
    /// New hp of whichever player attacked (not necessarily the local one)
    pub new_player_hp: u64,
    pub attacker: AccountAddress,
    /// Damage the attacker dealt to the boss
    pub damage_to_boss: u64,
    /// Damage the boss dealt to the attacker
    pub damage_to_player: u64,
}

/// A character NFT has been minted.
///
/// Carries only identifiers; the character record itself must be read back
/// from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMinted {
    pub minter: AccountAddress,
    pub token_id: TokenId,
    pub character_index: usize,
}

/// Every confirmation event the battle reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BattleEvent {
    AttackResolved(AttackResolved),
    CharacterMinted(CharacterMinted),
}

impl From<AttackResolved> for BattleEvent {
    fn from(event: AttackResolved) -> Self {
        Self::AttackResolved(event)
    }
}

impl From<CharacterMinted> for BattleEvent {
    fn from(event: CharacterMinted) -> Self {
        Self::CharacterMinted(event)
    }
}
