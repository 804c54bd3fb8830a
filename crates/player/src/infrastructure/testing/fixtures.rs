//! Simple test fixtures used across unit tests.

use avengers_domain::{AccountAddress, Character};
use avengers_shared::{LedgerEvent, LedgerNumber, RawCharacterRecord};

use crate::infrastructure::ledger::ContractDeployment;
use crate::ports::outbound::{AcceptanceReceipt, TransactionHandle, TransactionKind};

pub const LOCAL_ACCOUNT: &str = "0x8985F2dd2b076a67908eDFA9B4c9Dbe74A28F4ab";
pub const OTHER_ACCOUNT: &str = "0x1234567890abcdef1234567890abcdef12345678";

pub fn local_account() -> AccountAddress {
    AccountAddress::new(LOCAL_ACCOUNT)
}

pub fn other_account() -> AccountAddress {
    AccountAddress::new(OTHER_ACCOUNT)
}

/// The six-hero smoke-run roster and Thanos.
pub fn avengers() -> ContractDeployment {
    ContractDeployment::avengers().expect("fixture deployment is valid")
}

pub fn character(name: &str, hp: u64, max_hp: u64, attack_damage: u64) -> Character {
    Character::new(name, format!("https://img.test/{}.png", name), hp, max_hp, attack_damage)
        .expect("fixture character is valid")
}

pub fn thanos() -> Character {
    avengers().boss
}

pub fn roster_records() -> Vec<RawCharacterRecord> {
    avengers()
        .roster
        .iter()
        .enumerate()
        .map(|(index, c)| RawCharacterRecord::from(c).with_character_index(index as u64))
        .collect()
}

pub fn record(character: &Character) -> RawCharacterRecord {
    RawCharacterRecord::from(character)
}

pub fn attack_handle() -> TransactionHandle {
    TransactionHandle {
        hash: "0xa77ac4".to_string(),
        kind: TransactionKind::Attack,
    }
}

pub fn mint_handle(character_index: usize) -> TransactionHandle {
    TransactionHandle {
        hash: format!("0x3171{}", character_index),
        kind: TransactionKind::Mint { character_index },
    }
}

pub fn receipt(handle: &TransactionHandle) -> AcceptanceReceipt {
    AcceptanceReceipt {
        hash: handle.hash.clone(),
        block_number: 1,
    }
}

/// `AttackComplete` as emitted by the contract.
pub fn attack_complete(
    sender: &str,
    new_boss_hp: u64,
    new_player_hp: u64,
    damage_to_boss: u64,
    damage_to_player: u64,
) -> LedgerEvent {
    LedgerEvent::AttackComplete {
        new_boss_hp: LedgerNumber::big(new_boss_hp),
        new_player_hp: LedgerNumber::big(new_player_hp),
        sender: sender.to_string(),
        boss_attack_damage: LedgerNumber::big(damage_to_player),
        player_attack_damage: LedgerNumber::big(damage_to_boss),
    }
}

/// `CharacterNFTMinted` as emitted by the contract.
pub fn character_minted(sender: &str, token_id: u64, character_index: u64) -> LedgerEvent {
    LedgerEvent::CharacterNftMinted {
        sender: sender.to_string(),
        token_id: LedgerNumber::big(token_id),
        character_index: LedgerNumber::big(character_index),
    }
}
