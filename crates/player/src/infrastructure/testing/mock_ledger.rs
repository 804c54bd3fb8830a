//! Mock ledger pairing mockall request expectations with a real event registry.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use avengers_shared::{LedgerEvent, LedgerEventKind, RawCharacterRecord};

use crate::infrastructure::messaging::EventRegistry;
use crate::ports::outbound::{
    AcceptanceReceipt, LedgerError, LedgerEventHandler, LedgerEventPort, LedgerRequestPort,
    MockLedgerRequestPort, SubscriptionId, TransactionHandle,
};

/// A `LedgerClient` for tests.
///
/// Set expectations on `requests` before sharing the ledger; push events
/// through `events` (or [`MockLedger::emit`]) to play the contract.
pub struct MockLedger {
    pub requests: MockLedgerRequestPort,
    pub events: EventRegistry,
    fail_subscriptions: AtomicBool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            requests: MockLedgerRequestPort::new(),
            events: EventRegistry::new(),
            fail_subscriptions: AtomicBool::new(false),
        }
    }

    /// Make `subscribe` fail.
    pub fn fail_subscriptions(&self, fail: bool) {
        self.fail_subscriptions.store(fail, Ordering::SeqCst);
    }

    /// Deliver a contract event to every subscriber.
    pub fn emit(&self, event: LedgerEvent) -> usize {
        self.events.dispatch(event)
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRequestPort for MockLedger {
    async fn send_attack(&self) -> Result<TransactionHandle, LedgerError> {
        self.requests.send_attack().await
    }

    async fn send_mint(&self, character_index: usize) -> Result<TransactionHandle, LedgerError> {
        self.requests.send_mint(character_index).await
    }

    async fn await_acceptance(
        &self,
        handle: &TransactionHandle,
    ) -> Result<AcceptanceReceipt, LedgerError> {
        self.requests.await_acceptance(handle).await
    }

    async fn fetch_boss_record(&self) -> Result<RawCharacterRecord, LedgerError> {
        self.requests.fetch_boss_record().await
    }

    async fn fetch_default_roster(&self) -> Result<Vec<RawCharacterRecord>, LedgerError> {
        self.requests.fetch_default_roster().await
    }

    async fn fetch_owned_character(&self) -> Result<Option<RawCharacterRecord>, LedgerError> {
        self.requests.fetch_owned_character().await
    }
}

impl LedgerEventPort for MockLedger {
    fn subscribe(
        &self,
        kind: LedgerEventKind,
        handler: LedgerEventHandler,
    ) -> Result<SubscriptionId, LedgerError> {
        if self.fail_subscriptions.load(Ordering::SeqCst) {
            return Err(LedgerError::Subscription {
                kind,
                message: "mock subscription failure".to_string(),
            });
        }
        Ok(self.events.subscribe(kind, handler))
    }

    fn unsubscribe(&self, kind: LedgerEventKind, id: SubscriptionId) -> bool {
        self.events.unsubscribe(kind, id)
    }
}
