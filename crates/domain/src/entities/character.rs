//! Character entity - the player's minted hero or the shared boss.

use serde::Serialize;

use crate::error::DomainError;

/// A battle participant as held on the ledger.
///
/// # Invariants
///
/// - `max_hp > 0`
/// - `0 <= hp <= max_hp` (hp is unsigned, the upper bound is enforced on every
///   construction and every hp update)
///
/// Hit points are only changed through [`Character::with_hp`], which clamps to
/// `max_hp`, so confirmed ledger values can never push the entity out of range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    name: String,
    #[serde(rename = "imageURI")]
    image_uri: String,
    hp: u64,
    max_hp: u64,
    attack_damage: u64,
}

impl Character {
    /// Create a validated character.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - `max_hp` is zero
    /// - `hp` exceeds `max_hp`
    pub fn new(
        name: impl Into<String>,
        image_uri: impl Into<String>,
        hp: u64,
        max_hp: u64,
        attack_damage: u64,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        if max_hp == 0 {
            return Err(DomainError::validation(format!(
                "Character '{}' must have a positive max_hp",
                trimmed
            )));
        }
        if hp > max_hp {
            return Err(DomainError::validation(format!(
                "Character '{}' hp {} exceeds max_hp {}",
                trimmed, hp, max_hp
            )));
        }
        Ok(Self {
            name: trimmed.to_string(),
            image_uri: image_uri.into(),
            hp,
            max_hp,
            attack_damage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_uri(&self) -> &str {
        &self.image_uri
    }

    pub fn hp(&self) -> u64 {
        self.hp
    }

    pub fn max_hp(&self) -> u64 {
        self.max_hp
    }

    pub fn attack_damage(&self) -> u64 {
        self.attack_damage
    }

    /// A character at zero hp can no longer attack and must be replaced by a
    /// new mint.
    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Returns a copy with hp set to `hp`, clamped to `max_hp`.
    pub fn with_hp(&self, hp: u64) -> Self {
        Self {
            hp: hp.min(self.max_hp),
            ..self.clone()
        }
    }

    /// Health as a fraction in `[0.0, 1.0]` for health bars.
    pub fn health_ratio(&self) -> f64 {
        self.hp as f64 / self.max_hp as f64
    }
}
