//! Ledger Ports - Contract calls and contract event subscriptions
//!
//! The ledger is split the same way the game connection always was:
//!
//! - [`LedgerRequestPort`] - request/response calls (transactions and reads)
//! - [`LedgerEventPort`] - event subscription registration
//! - [`LedgerClient`] - both, blanket-implemented for anything that has both
//!
//! # Callback Methods
//!
//! Subscription handlers are `Fn` objects, which mockall can't mock
//! usefully, so they live on their own trait. Tests pair a
//! `MockLedgerRequestPort` with a real `EventRegistry` instead (see
//! `infrastructure::testing::MockLedger`).
//!
//! Note: The async request methods use `async_trait` instead of returning
//! `Pin<Box<dyn Future>>` for better mockall compatibility.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use avengers_shared::{LedgerEvent, LedgerEventKind, RawCharacterRecord};

/// Errors reported by the ledger adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The ledger refused the request (reverted, user denied, invalid state)
    #[error("Ledger rejected request: {0}")]
    Rejected(String),
    /// The request never reached the ledger or the response was lost
    #[error("Ledger transport error: {0}")]
    Transport(String),
    /// The event channel could not be established
    #[error("Subscription to {kind} failed: {message}")]
    Subscription {
        kind: LedgerEventKind,
        message: String,
    },
}

impl LedgerError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

/// What an outbound transaction does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Attack,
    Mint { character_index: usize },
}

/// A submitted, not yet accepted, transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHandle {
    pub hash: String,
    pub kind: TransactionKind,
}

/// Local acceptance of a transaction (included in a block).
///
/// Acceptance is not confirmation: the resulting contract event arrives
/// separately and may race with or lag behind this receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceReceipt {
    pub hash: String,
    pub block_number: u64,
}

/// Identifies one registered event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback invoked for every event of a subscribed kind.
pub type LedgerEventHandler = Arc<dyn Fn(LedgerEvent) + Send + Sync + 'static>;

/// Port for contract calls.
///
/// Transactions are two-phase: `send_*` submits and returns a handle,
/// `await_acceptance` waits for local acceptance of that handle.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LedgerRequestPort: Send + Sync {
    /// Submit `attackBoss()`
    async fn send_attack(&self) -> Result<TransactionHandle, LedgerError>;

    /// Submit `mintCharacterNFT(character_index)`
    async fn send_mint(&self, character_index: usize) -> Result<TransactionHandle, LedgerError>;

    /// Wait until a submitted transaction is accepted
    async fn await_acceptance(
        &self,
        handle: &TransactionHandle,
    ) -> Result<AcceptanceReceipt, LedgerError>;

    /// Read `getBigBoss()`
    async fn fetch_boss_record(&self) -> Result<RawCharacterRecord, LedgerError>;

    /// Read `getAllDefaultCharacters()`
    async fn fetch_default_roster(&self) -> Result<Vec<RawCharacterRecord>, LedgerError>;

    /// Read `checkIfUserHasNFT()` for the connected account
    ///
    /// Returns `None` when the account owns no character yet.
    async fn fetch_owned_character(&self) -> Result<Option<RawCharacterRecord>, LedgerError>;
}

/// Port for contract event subscriptions.
pub trait LedgerEventPort: Send + Sync {
    /// Register `handler` for events of `kind`
    fn subscribe(
        &self,
        kind: LedgerEventKind,
        handler: LedgerEventHandler,
    ) -> Result<SubscriptionId, LedgerError>;

    /// Remove a handler. Returns false if it was not registered.
    fn unsubscribe(&self, kind: LedgerEventKind, id: SubscriptionId) -> bool;
}

/// A full ledger connection: requests plus events.
pub trait LedgerClient: LedgerRequestPort + LedgerEventPort {}

/// Blanket implementation allowing any adapter with both capabilities to be used as `LedgerClient`
impl<T: LedgerRequestPort + LedgerEventPort + ?Sized> LedgerClient for T {}
