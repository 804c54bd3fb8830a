//! Contract constructor arguments.

use avengers_domain::{Character, DomainError};

/// What the `NftGame` contract is deployed with: the mintable roster and
/// the boss.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDeployment {
    pub roster: Vec<Character>,
    pub boss: Character,
}

/// (name, image, hp, attack damage)
const AVENGERS: [(&str, &str, u64, u64); 6] = [
    ("Captain America", "https://i.imgur.com/q2KjZhq.jpeg", 300, 300),
    ("Iron Man", "https://i.imgur.com/PlubeWo.png", 500, 500),
    ("Thor", "https://i.imgur.com/oQMX7G2.png", 800, 1000),
    ("Hawkeye", "https://i.imgur.com/GiGkbmj.jpeg", 200, 200),
    ("Hulk", "https://i.imgur.com/DxxnUpa.jpeg", 1000, 800),
    ("Black Widow", "https://i.imgur.com/uXS9Ewv.jpeg", 200, 200),
];

const THANOS: (&str, &str, u64, u64) = ("Thanos", "https://i.imgur.com/hVuFcaF.jpeg", 500_000, 100);

impl ContractDeployment {
    pub fn new(roster: Vec<Character>, boss: Character) -> Self {
        Self { roster, boss }
    }

    /// The local smoke-run arena: six heroes against Thanos.
    ///
    /// Stats follow the development run script, not the deployed contract.
    pub fn avengers() -> Result<Self, DomainError> {
        let roster = AVENGERS
            .iter()
            .map(|(name, image, hp, attack)| Character::new(*name, *image, *hp, *hp, *attack))
            .collect::<Result<Vec<_>, _>>()?;
        let (name, image, hp, attack) = THANOS;
        let boss = Character::new(name, image, hp, hp, attack)?;
        Ok(Self::new(roster, boss))
    }
}
