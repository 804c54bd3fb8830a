//! In-process ledger adapter
//!
//! Models the `NftGame` contract in memory: a default roster, one shared
//! boss, and at most one character NFT per account. Transactions are
//! two-phase like the real chain: `send_*` validates and queues, and
//! `await_acceptance` applies the state change and emits the contract event.
//!
//! Several sessions can share one contract through [`SimulatedLedger::connect_as`];
//! every connection sees the same state and the same event stream.
//!
//! It does not persist data and is suitable for demos and testing only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use avengers_domain::{AccountAddress, Character, TokenId};
use avengers_shared::{LedgerEvent, LedgerEventKind, LedgerNumber, RawCharacterRecord};

use super::deployment::ContractDeployment;
use crate::infrastructure::messaging::EventRegistry;
use crate::ports::outbound::{
    AcceptanceReceipt, LedgerError, LedgerEventHandler, LedgerEventPort, LedgerRequestPort,
    SubscriptionId, TransactionHandle, TransactionKind,
};

struct OwnedCharacter {
    character_index: usize,
    character: Character,
}

struct PendingTransaction {
    sender: AccountAddress,
    kind: TransactionKind,
}

struct ContractState {
    roster: Vec<Character>,
    boss: Character,
    /// Lower-cased holder address to token
    holders: HashMap<String, TokenId>,
    tokens: HashMap<u64, OwnedCharacter>,
    next_token_id: u64,
    block_number: u64,
    mempool: HashMap<String, PendingTransaction>,
}

impl ContractState {
    fn new(deployment: ContractDeployment) -> Self {
        Self {
            roster: deployment.roster,
            boss: deployment.boss,
            holders: HashMap::new(),
            tokens: HashMap::new(),
            next_token_id: 1,
            block_number: 0,
            mempool: HashMap::new(),
        }
    }

    fn token_of(&self, account: &AccountAddress) -> Option<TokenId> {
        self.holders
            .get(&account.as_str().to_ascii_lowercase())
            .copied()
    }

    fn owned(&self, account: &AccountAddress) -> Option<&OwnedCharacter> {
        self.token_of(account)
            .and_then(|token| self.tokens.get(&token.value()))
    }

    fn check_attack(&self, sender: &AccountAddress) -> Result<(), LedgerError> {
        let owned = self
            .owned(sender)
            .ok_or_else(|| LedgerError::rejected("Error: caller holds no character NFT"))?;
        if owned.character.is_defeated() {
            return Err(LedgerError::rejected(
                "Error: character must have HP to attack boss.",
            ));
        }
        if self.boss.is_defeated() {
            return Err(LedgerError::rejected(
                "Error: boss must have HP to attack character.",
            ));
        }
        Ok(())
    }

    fn check_mint(&self, character_index: usize) -> Result<(), LedgerError> {
        if character_index >= self.roster.len() {
            return Err(LedgerError::rejected(format!(
                "Error: character index {} out of range",
                character_index
            )));
        }
        Ok(())
    }

    /// Both sides strike once. Damage saturates at zero hp.
    fn resolve_attack(&mut self, sender: &AccountAddress) -> Result<LedgerEvent, LedgerError> {
        self.check_attack(sender)?;
        let token = self
            .token_of(sender)
            .ok_or_else(|| LedgerError::rejected("Error: caller holds no character NFT"))?;
        let owned = self
            .tokens
            .get_mut(&token.value())
            .ok_or_else(|| LedgerError::rejected("Error: token has no character"))?;

        let boss_before = self.boss.hp();
        let player_before = owned.character.hp();
        let boss_after = boss_before.saturating_sub(owned.character.attack_damage());
        let player_after = player_before.saturating_sub(self.boss.attack_damage());

        self.boss = self.boss.with_hp(boss_after);
        owned.character = owned.character.with_hp(player_after);

        Ok(LedgerEvent::AttackComplete {
            new_boss_hp: LedgerNumber::big(boss_after),
            new_player_hp: LedgerNumber::big(player_after),
            sender: sender.as_str().to_string(),
            boss_attack_damage: LedgerNumber::big(player_before - player_after),
            player_attack_damage: LedgerNumber::big(boss_before - boss_after),
        })
    }

    fn mint(
        &mut self,
        sender: &AccountAddress,
        character_index: usize,
    ) -> Result<LedgerEvent, LedgerError> {
        self.check_mint(character_index)?;
        let character = self
            .roster
            .get(character_index)
            .cloned()
            .ok_or_else(|| LedgerError::rejected("Error: character index out of range"))?;
        let token_id = TokenId::new(self.next_token_id);
        self.next_token_id += 1;

        self.tokens.insert(
            token_id.value(),
            OwnedCharacter {
                character_index,
                character,
            },
        );
        self.holders
            .insert(sender.as_str().to_ascii_lowercase(), token_id);

        Ok(LedgerEvent::CharacterNftMinted {
            sender: sender.as_str().to_string(),
            token_id: LedgerNumber::big(token_id.value()),
            character_index: LedgerNumber::big(character_index as u64),
        })
    }
}

/// Faults injected into one connection.
#[derive(Debug, Default)]
struct Faults {
    reject_attack: Option<String>,
    reject_mint: Option<String>,
    fail_subscriptions: bool,
    withhold_events: bool,
}

/// In-memory `NftGame` contract, connected as one account.
pub struct SimulatedLedger {
    account: AccountAddress,
    contract: Arc<Mutex<ContractState>>,
    events: EventRegistry,
    acceptance_delay: Duration,
    confirmation_delay: Duration,
    faults: Mutex<Faults>,
}

impl SimulatedLedger {
    /// Deploy a fresh contract and connect to it as `account`.
    pub fn deploy(account: AccountAddress, deployment: ContractDeployment) -> Self {
        tracing::info!(
            account = %account,
            roster_size = deployment.roster.len(),
            boss = deployment.boss.name(),
            "Deployed simulated NftGame contract"
        );
        Self {
            account,
            contract: Arc::new(Mutex::new(ContractState::new(deployment))),
            events: EventRegistry::new(),
            acceptance_delay: Duration::ZERO,
            confirmation_delay: Duration::ZERO,
            faults: Mutex::new(Faults::default()),
        }
    }

    /// Another session on the same contract.
    pub fn connect_as(&self, account: AccountAddress) -> Self {
        Self {
            account,
            contract: Arc::clone(&self.contract),
            events: self.events.clone(),
            acceptance_delay: self.acceptance_delay,
            confirmation_delay: self.confirmation_delay,
            faults: Mutex::new(Faults::default()),
        }
    }

    /// Take `delay` to accept each transaction, like waiting for a block.
    pub fn with_acceptance_delay(mut self, delay: Duration) -> Self {
        self.acceptance_delay = delay;
        self
    }

    /// Emit contract events `delay` after acceptance instead of before the
    /// acceptance receipt is returned.
    pub fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.confirmation_delay = delay;
        self
    }

    pub fn account(&self) -> &AccountAddress {
        &self.account
    }

    fn contract(&self) -> MutexGuard<'_, ContractState> {
        self.contract.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The next `send_attack` on this connection fails with `reason`.
    pub fn reject_next_attack(&self, reason: impl Into<String>) {
        self.faults().reject_attack = Some(reason.into());
    }

    /// The next `send_mint` on this connection fails with `reason`.
    pub fn reject_next_mint(&self, reason: impl Into<String>) {
        self.faults().reject_mint = Some(reason.into());
    }

    /// Make `subscribe` fail on this connection.
    pub fn fail_subscriptions(&self, fail: bool) {
        self.faults().fail_subscriptions = fail;
    }

    /// Accept transactions on this connection without emitting their events.
    pub fn withhold_events(&self, withhold: bool) {
        self.faults().withhold_events = withhold;
    }

    /// Current boss state.
    pub fn boss(&self) -> Character {
        self.contract().boss.clone()
    }

    /// Character currently held by `account`, if any.
    pub fn character_of(&self, account: &AccountAddress) -> Option<Character> {
        self.contract()
            .owned(account)
            .map(|owned| owned.character.clone())
    }

    pub fn subscriber_count(&self, kind: LedgerEventKind) -> usize {
        self.events.subscriber_count(kind)
    }

    fn submit(&self, kind: TransactionKind) -> TransactionHandle {
        let hash = format!("0x{}", Uuid::new_v4().simple());
        self.contract().mempool.insert(
            hash.clone(),
            PendingTransaction {
                sender: self.account.clone(),
                kind,
            },
        );
        tracing::debug!(hash = %hash, kind = ?kind, sender = %self.account, "Transaction submitted");
        TransactionHandle { hash, kind }
    }

    fn emit(&self, event: LedgerEvent) {
        if self.faults().withhold_events {
            tracing::debug!(event = ?event.kind(), "Withholding contract event");
            return;
        }
        if self.confirmation_delay.is_zero() {
            self.events.dispatch(event);
            return;
        }
        let events = self.events.clone();
        let delay = self.confirmation_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            events.dispatch(event);
        });
    }
}

#[async_trait]
impl LedgerRequestPort for SimulatedLedger {
    async fn send_attack(&self) -> Result<TransactionHandle, LedgerError> {
        if let Some(reason) = self.faults().reject_attack.take() {
            return Err(LedgerError::Rejected(reason));
        }
        self.contract().check_attack(&self.account)?;
        Ok(self.submit(TransactionKind::Attack))
    }

    async fn send_mint(&self, character_index: usize) -> Result<TransactionHandle, LedgerError> {
        if let Some(reason) = self.faults().reject_mint.take() {
            return Err(LedgerError::Rejected(reason));
        }
        self.contract().check_mint(character_index)?;
        Ok(self.submit(TransactionKind::Mint { character_index }))
    }

    async fn await_acceptance(
        &self,
        handle: &TransactionHandle,
    ) -> Result<AcceptanceReceipt, LedgerError> {
        if !self.acceptance_delay.is_zero() {
            tokio::time::sleep(self.acceptance_delay).await;
        }
        let (event, block_number) = {
            let mut contract = self.contract();
            let pending = contract.mempool.remove(&handle.hash).ok_or_else(|| {
                LedgerError::transport(format!("unknown transaction {}", handle.hash))
            })?;
            let event = match pending.kind {
                TransactionKind::Attack => contract.resolve_attack(&pending.sender)?,
                TransactionKind::Mint { character_index } => {
                    contract.mint(&pending.sender, character_index)?
                }
            };
            contract.block_number += 1;
            (event, contract.block_number)
        };

        tracing::debug!(hash = %handle.hash, block_number, "Transaction accepted");
        self.emit(event);

        Ok(AcceptanceReceipt {
            hash: handle.hash.clone(),
            block_number,
        })
    }

    async fn fetch_boss_record(&self) -> Result<RawCharacterRecord, LedgerError> {
        Ok(RawCharacterRecord::from(&self.contract().boss))
    }

    async fn fetch_default_roster(&self) -> Result<Vec<RawCharacterRecord>, LedgerError> {
        Ok(self
            .contract()
            .roster
            .iter()
            .enumerate()
            .map(|(index, character)| {
                RawCharacterRecord::from(character).with_character_index(index as u64)
            })
            .collect())
    }

    async fn fetch_owned_character(&self) -> Result<Option<RawCharacterRecord>, LedgerError> {
        Ok(self.contract().owned(&self.account).map(|owned| {
            RawCharacterRecord::from(&owned.character)
                .with_character_index(owned.character_index as u64)
        }))
    }
}

impl LedgerEventPort for SimulatedLedger {
    fn subscribe(
        &self,
        kind: LedgerEventKind,
        handler: LedgerEventHandler,
    ) -> Result<SubscriptionId, LedgerError> {
        if self.faults().fail_subscriptions {
            return Err(LedgerError::Subscription {
                kind,
                message: "event filter could not be installed".to_string(),
            });
        }
        Ok(self.events.subscribe(kind, handler))
    }

    fn unsubscribe(&self, kind: LedgerEventKind, id: SubscriptionId) -> bool {
        self.events.unsubscribe(kind, id)
    }
}
