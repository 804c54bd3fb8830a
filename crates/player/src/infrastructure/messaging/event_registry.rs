//! Event registry for contract events.
//!
//! Push-based: subscribers register callbacks per event kind, and the
//! registry invokes them when an event is dispatched. Ledger adapters use it
//! as their `LedgerEventPort` implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use avengers_shared::{LedgerEvent, LedgerEventKind};

use crate::ports::outbound::{LedgerEventHandler, SubscriptionId};

type HandlerTable = HashMap<LedgerEventKind, Vec<(SubscriptionId, LedgerEventHandler)>>;

/// Event registry keyed by contract event name.
///
/// The registry holds strong references to handlers, so they persist until
/// explicitly unsubscribed or the registry is cleared.
#[derive(Clone, Default)]
pub struct EventRegistry {
    handlers: Arc<Mutex<HandlerTable>>,
}

impl EventRegistry {
    /// Create a new EventRegistry with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, HandlerTable> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to one event kind.
    pub fn subscribe(&self, kind: LedgerEventKind, handler: LedgerEventHandler) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.table().entry(kind).or_default().push((id, handler));
        id
    }

    /// Remove a subscription. Returns false if `id` was not registered.
    pub fn unsubscribe(&self, kind: LedgerEventKind, id: SubscriptionId) -> bool {
        let mut table = self.table();
        let Some(handlers) = table.get_mut(&kind) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        before != handlers.len()
    }

    /// Dispatch an event to every handler of its kind.
    ///
    /// Handlers run outside the registry lock, so a handler may itself
    /// subscribe or unsubscribe. Returns the number of handlers invoked.
    pub fn dispatch(&self, event: LedgerEvent) -> usize {
        let Some(kind) = event.kind() else {
            return 0;
        };
        let handlers: Vec<LedgerEventHandler> = self
            .table()
            .get(&kind)
            .map(|entries| entries.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        for handler in &handlers {
            handler(event.clone());
        }
        handlers.len()
    }

    /// Get the number of subscribers for one kind.
    pub fn subscriber_count(&self, kind: LedgerEventKind) -> usize {
        self.table().get(&kind).map_or(0, Vec::len)
    }

    /// Clear all subscribers.
    pub fn clear(&self) {
        self.table().clear();
    }
}
