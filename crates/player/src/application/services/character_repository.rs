//! Character repository
//!
//! The single boundary where raw ledger records and event payloads become
//! domain values. Nothing past this point sees a `LedgerNumber`.

use avengers_domain::{AccountAddress, AttackResolved, BattleEvent, Character, CharacterMinted, TokenId};
use avengers_shared::{LedgerEvent, LedgerNumber, RawCharacterRecord};

use crate::application::error::RepositoryError;

/// Stateless normalizer for contract reads and events.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterRepository;

impl CharacterRepository {
    pub fn new() -> Self {
        Self
    }

    /// Convert one contract character struct.
    ///
    /// # Errors
    ///
    /// `MalformedRecord` when a field is missing, is not a non-negative
    /// integer that fits in 64 bits, or the values break `Character`
    /// invariants.
    pub fn normalize(&self, raw: &RawCharacterRecord) -> Result<Character, RepositoryError> {
        let name = raw
            .name
            .as_deref()
            .ok_or_else(|| RepositoryError::malformed("name", "missing"))?;
        let image_uri = raw
            .image_uri
            .as_deref()
            .ok_or_else(|| RepositoryError::malformed("imageURI", "missing"))?;
        let hp = number("hp", raw.hp.as_ref())?;
        let max_hp = number("maxHp", raw.max_hp.as_ref())?;
        let attack_damage = number("attackDamage", raw.attack_damage.as_ref())?;

        Character::new(name, image_uri, hp, max_hp, attack_damage)
            .map_err(|e| RepositoryError::malformed("character", e.to_string()))
    }

    /// Convert the default roster, skipping entries that fail to normalize.
    pub fn normalize_roster(&self, raws: &[RawCharacterRecord]) -> Vec<Character> {
        raws.iter()
            .enumerate()
            .filter_map(|(index, raw)| match self.normalize(raw) {
                Ok(character) => Some(character),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed roster entry");
                    None
                }
            })
            .collect()
    }

    /// Convert a contract event into its typed form.
    pub fn normalize_event(&self, event: LedgerEvent) -> Result<BattleEvent, RepositoryError> {
        match event {
            LedgerEvent::AttackComplete {
                new_boss_hp,
                new_player_hp,
                sender,
                boss_attack_damage,
                player_attack_damage,
            } => Ok(AttackResolved {
                new_boss_hp: number("newBossHp", Some(&new_boss_hp))?,
                new_player_hp: number("newPlayerHp", Some(&new_player_hp))?,
                attacker: AccountAddress::new(sender),
                damage_to_boss: number("playerAttackDamage", Some(&player_attack_damage))?,
                damage_to_player: number("bossAttackDamage", Some(&boss_attack_damage))?,
            }
            .into()),
            LedgerEvent::CharacterNftMinted {
                sender,
                token_id,
                character_index,
            } => {
                let character_index = number("characterIndex", Some(&character_index))?;
                let character_index = usize::try_from(character_index).map_err(|_| {
                    RepositoryError::malformed("characterIndex", "does not fit in usize")
                })?;
                Ok(CharacterMinted {
                    minter: AccountAddress::new(sender),
                    token_id: TokenId::new(number("tokenId", Some(&token_id))?),
                    character_index,
                }
                .into())
            }
            LedgerEvent::Unknown => Err(RepositoryError::UnsupportedEvent),
        }
    }
}

fn number(field: &'static str, value: Option<&LedgerNumber>) -> Result<u64, RepositoryError> {
    value
        .ok_or_else(|| RepositoryError::malformed(field, "missing"))?
        .to_u64()
        .map_err(|e| RepositoryError::malformed(field, e.to_string()))
}
