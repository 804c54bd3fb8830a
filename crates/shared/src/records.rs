//! Character records as returned by contract reads
//! (`getBigBoss`, `getAllDefaultCharacters`, `checkIfUserHasNFT`).

use serde::{Deserialize, Serialize};

use avengers_domain::Character;

use crate::ledger_number::LedgerNumber;

/// A character struct exactly as the contract returns it.
///
/// Every field is optional so that a partial or malformed record still
/// deserializes and can be rejected with a precise error during
/// normalization instead of failing the whole read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCharacterRecord {
    /// Roster position; only present on minted characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_index: Option<LedgerNumber>,
    pub name: Option<String>,
    #[serde(rename = "imageURI")]
    pub image_uri: Option<String>,
    pub hp: Option<LedgerNumber>,
    pub max_hp: Option<LedgerNumber>,
    pub attack_damage: Option<LedgerNumber>,
}

impl RawCharacterRecord {
    /// Build a record with every field present, numbers in big-number form.
    pub fn new(
        name: impl Into<String>,
        image_uri: impl Into<String>,
        hp: u64,
        max_hp: u64,
        attack_damage: u64,
    ) -> Self {
        Self {
            character_index: None,
            name: Some(name.into()),
            image_uri: Some(image_uri.into()),
            hp: Some(LedgerNumber::big(hp)),
            max_hp: Some(LedgerNumber::big(max_hp)),
            attack_damage: Some(LedgerNumber::big(attack_damage)),
        }
    }

    pub fn with_character_index(mut self, index: u64) -> Self {
        self.character_index = Some(LedgerNumber::big(index));
        self
    }
}

impl From<&Character> for RawCharacterRecord {
    fn from(character: &Character) -> Self {
        Self::new(
            character.name(),
            character.image_uri(),
            character.hp(),
            character.max_hp(),
            character.attack_damage(),
        )
    }
}
