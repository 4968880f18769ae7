//! Change notification hub.
//!
//! Mutations publish a `ChangeEvent` to two kinds of listeners:
//! - observers registered with `on_change`, invoked synchronously after the
//!   mutating call's response is observed; each registration returns a
//!   `Subscription` that unregisters on drop
//! - broadcast receivers from `subscribe`, for listeners that prefer to
//!   read events from a channel
//!
//! Delivery to an observer registered or dropped while a mutation is in
//! flight is unspecified.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::broadcast;
use tracing::debug;

use docgate_models::ChangeEvent;

use crate::metrics::record_notification;

/// Buffered events per broadcast receiver before it starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Observer callback type.
pub type ChangeCallback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

struct Registry {
    observers: Mutex<Vec<(u64, ChangeCallback)>>,
    next_id: AtomicU64,
    tx: broadcast::Sender<ChangeEvent>,
}

impl Registry {
    fn observers(&self) -> MutexGuard<'_, Vec<(u64, ChangeCallback)>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fan-out point for change events. Clones share the same listeners.
#[derive(Clone)]
pub struct ChangeNotifier {
    registry: Arc<Registry>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            registry: Arc::new(Registry {
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                tx,
            }),
        }
    }

    /// Register an observer. It stays registered until the returned handle
    /// is dropped or `unsubscribe`d.
    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn on_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let callback: ChangeCallback = Arc::new(callback);
        self.registry.observers().push((id, callback));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Receive events through a channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.registry.tx.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.registry.observers().len()
    }

    /// Deliver an event to every observer and channel receiver.
    pub fn notify(&self, event: ChangeEvent) {
        // Snapshot so observers may (un)register from inside a callback.
        let observers: Vec<ChangeCallback> = self
            .registry
            .observers()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        debug!(
            collection = %event.collection,
            kind = %event.kind,
            observers = observers.len(),
            "Notifying change"
        );
        record_notification(&event.collection, event.kind.as_str());

        for observer in &observers {
            observer(&event);
        }

        // No receivers is not an error.
        let _ = self.registry.tx.send(event);
    }
}

/// Handle for a registered observer. Dropping it unregisters the observer.
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.observers().retain(|(id, _)| *id != self.id);
        }
    }
}
