//! Event listener trait and runtime registry

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use quitanda_common::DomainEvent;

/// A module-side consumer of domain events.
///
/// Implementations must be idempotent where redelivery matters: the relay
/// guarantees at-least-once delivery, and an incomplete publication is
/// resubmitted after a process restart.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Stable listener name. Keys the per-listener publication rows in the
    /// outbox table and must not change across restarts.
    fn id(&self) -> &'static str;

    /// Whether this listener wants the given event.
    fn handles(&self, event: &DomainEvent) -> bool;

    /// React to an event. Runs outside the publishing transaction, in the
    /// relay's dispatch loop.
    async fn on_event(&self, event: &DomainEvent) -> anyhow::Result<()>;
}

/// Runtime registration of listeners, shared between the publisher (to fan
/// out publication rows) and the relay (to dispatch them).
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn EventListener>) {
        tracing::debug!(listener = listener.id(), "Registered event listener");
        self.listeners.write().push(listener);
    }

    pub fn by_id(&self, id: &str) -> Option<Arc<dyn EventListener>> {
        self.listeners
            .read()
            .iter()
            .find(|l| l.id() == id)
            .cloned()
    }

    /// Ids of all listeners whose `handles` matches the event.
    pub fn interested_ids(&self, event: &DomainEvent) -> Vec<&'static str> {
        self.listeners
            .read()
            .iter()
            .filter(|l| l.handles(event))
            .map(|l| l.id())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}
