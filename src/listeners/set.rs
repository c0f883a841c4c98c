//! # Identity-keyed listener set with snapshot-then-iterate delivery.
//!
//! [`ListenerSet`] owns the registered listeners and delivers events to them
//! synchronously, one at a time, in registration order.
//!
//! ## What it guarantees
//! - Membership is keyed by `Arc` pointer identity; re-adding a listener
//!   that is already present is a no-op.
//! - The set is **snapshotted before iteration**, so listeners can be added
//!   or removed concurrently with a delivery in progress without affecting
//!   the events already being delivered.
//! - Panics inside a listener are caught, reported as a
//!   `ListenerPanicked` event to the surviving listeners, and never
//!   propagate to the emitting operation.
//!
//! ## What it does **not** guarantee
//! - A listener added mid-delivery does not receive the in-flight event.
//! - Panic reports that themselves panic a listener are dropped (the report
//!   pass never produces further reports).

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::RwLock;

use crate::events::Event;
use crate::listeners::Listen;

/// Set of registered listeners with synchronous fan-out delivery.
pub struct ListenerSet {
    listeners: RwLock<Vec<Arc<dyn Listen>>>,
}

impl ListenerSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Adds a listener. Returns `false` (and changes nothing) if the same
    /// `Arc` is already registered.
    pub async fn add(&self, listener: Arc<dyn Listen>) -> bool {
        let mut listeners = self.listeners.write().await;
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Removes a listener by identity. Returns `false` if it was not present.
    pub async fn remove(&self, listener: &Arc<dyn Listen>) -> bool {
        let mut listeners = self.listeners.write().await;
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub async fn len(&self) -> usize {
        self.listeners.read().await.len()
    }

    /// True if no listeners are registered.
    pub async fn is_empty(&self) -> bool {
        self.listeners.read().await.is_empty()
    }

    /// Delivers an event to every registered listener, then reports any
    /// panics to the surviving listeners.
    pub(crate) async fn emit(&self, event: &Event) {
        let panicked = self.deliver(event).await;
        for (listener, info) in panicked {
            let report = Event::listener_panicked(listener, info);
            // Second-level panics are dropped: the report pass never recurses.
            let _ = self.deliver(&report).await;
        }
    }

    /// One delivery pass over a snapshot of the set. Returns the name and
    /// panic payload of every listener that panicked.
    async fn deliver(&self, event: &Event) -> Vec<(&'static str, String)> {
        let snapshot: Vec<Arc<dyn Listen>> = self.listeners.read().await.clone();

        let mut panicked = Vec::new();
        for listener in snapshot {
            let fut = listener.on_event(event);
            if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                let info = {
                    let any = &*panic_err;
                    if let Some(msg) = any.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = any.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    }
                };
                panicked.push((listener.name(), info));
            }
        }
        panicked
    }
}

impl Default for ListenerSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::events::EventKind;

    struct Recording {
        seen: Mutex<Vec<EventKind>>,
    }

    impl Recording {
        fn arc() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<EventKind> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Listen for Recording {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct Exploding;

    #[async_trait]
    impl Listen for Exploding {
        async fn on_event(&self, _event: &Event) {
            panic!("listener exploded");
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    #[tokio::test]
    async fn test_add_is_idempotent_by_identity() {
        let set = ListenerSet::new();
        let listener = Recording::arc();

        assert!(set.add(listener.clone()).await);
        assert!(!set.add(listener.clone()).await);
        assert_eq!(set.len().await, 1);

        // A distinct instance of the same type is a distinct listener.
        assert!(set.add(Recording::arc()).await);
        assert_eq!(set.len().await, 2);
    }

    #[tokio::test]
    async fn test_remove_by_identity() {
        let set = ListenerSet::new();
        let listener = Recording::arc();
        let listener_dyn: Arc<dyn Listen> = listener.clone();

        set.add(listener.clone()).await;
        assert!(set.remove(&listener_dyn).await);
        assert!(!set.remove(&listener_dyn).await);
        assert!(set.is_empty().await);
    }

    #[tokio::test]
    async fn test_emit_reaches_all_in_order() {
        let set = ListenerSet::new();
        let first = Recording::arc();
        let second = Recording::arc();
        set.add(first.clone()).await;
        set.add(second.clone()).await;

        set.emit(&Event::new(EventKind::Started)).await;
        set.emit(&Event::new(EventKind::Stopped)).await;

        assert_eq!(first.seen(), vec![EventKind::Started, EventKind::Stopped]);
        assert_eq!(second.seen(), vec![EventKind::Started, EventKind::Stopped]);
    }

    #[tokio::test]
    async fn test_panic_is_isolated_and_reported() {
        let set = ListenerSet::new();
        let witness = Recording::arc();
        set.add(Arc::new(Exploding)).await;
        set.add(witness.clone()).await;

        set.emit(&Event::new(EventKind::Started)).await;

        // The witness got the original event despite the first listener
        // panicking, then received the panic report.
        assert_eq!(
            witness.seen(),
            vec![EventKind::Started, EventKind::ListenerPanicked]
        );
    }

    #[tokio::test]
    async fn test_panic_report_does_not_recurse() {
        let set = ListenerSet::new();
        // A listener that panics on every event, including the report pass.
        set.add(Arc::new(Exploding)).await;

        // Must terminate: the report pass drops second-level panics.
        set.emit(&Event::new(EventKind::Started)).await;
    }
}
