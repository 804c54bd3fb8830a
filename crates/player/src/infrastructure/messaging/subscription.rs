//! Owned ledger event subscriptions.
//!
//! An `EventSubscription` is the only way the client registers a contract
//! event handler. The handler is removed exactly once: by `close()`, or by
//! `Drop` if the handle goes away without being closed.

use std::sync::Arc;

use avengers_shared::LedgerEventKind;

use crate::ports::outbound::{LedgerClient, LedgerError, LedgerEventHandler, SubscriptionId};

pub struct EventSubscription {
    ledger: Arc<dyn LedgerClient>,
    kind: LedgerEventKind,
    id: SubscriptionId,
    released: bool,
}

impl EventSubscription {
    /// Register `handler` for `kind` and take ownership of the registration.
    pub fn open(
        ledger: Arc<dyn LedgerClient>,
        kind: LedgerEventKind,
        handler: LedgerEventHandler,
    ) -> Result<Self, LedgerError> {
        let id = ledger.subscribe(kind, handler)?;
        tracing::debug!(event = %kind, subscription = %id, "Subscribed to ledger event");
        Ok(Self {
            ledger,
            kind,
            id,
            released: false,
        })
    }

    pub fn kind(&self) -> LedgerEventKind {
        self.kind
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Release the registration now.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.ledger.unsubscribe(self.kind, self.id) {
            tracing::debug!(event = %self.kind, subscription = %self.id, "Released ledger subscription");
        } else {
            tracing::warn!(
                event = %self.kind,
                subscription = %self.id,
                "Ledger subscription was already gone on release"
            );
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}
