//! # Events emitted by the controller and the registration gateway.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Transition events**: lifecycle state changes (configured, started,
//!   stopped), carrying no payload beyond their kind.
//! - **Notification events**: reports delivered through the same channel
//!   (orphaned elements, panicking listeners).
//!
//! The [`Event`] struct carries the kind plus optional metadata such as the
//! affected context name or a failure reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Events are delivered in-line with the transition that
//! produced them, strictly after its side effect has committed, so `seq`
//! also reflects commit order.
//!
//! ## Example
//! ```rust
//! use webvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ElementsOrphaned).with_context("app");
//!
//! assert_eq!(ev.kind, EventKind::ElementsOrphaned);
//! assert_eq!(ev.context.as_deref(), Some("app"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::whiteboard::ElementId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of controller and gateway events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Transition events ===
    /// A configuration snapshot was stored while the server was not running.
    ///
    /// Not emitted on the reconfigure-while-started path, which produces
    /// `Stopped` followed by `Started` instead.
    Configured,

    /// The server handle started successfully.
    Started,

    /// The server handle stopped.
    Stopped,

    // === Notification events ===
    /// A whiteboard context was removed while elements were still attached
    /// and no container-owned context existed to reattach them to.
    ///
    /// Sets:
    /// - `context`: logical name of the removed context
    /// - `elements`: registration identities left unresolved
    ElementsOrphaned,

    /// A listener panicked during event delivery.
    ///
    /// Sets:
    /// - `context`: listener name
    /// - `reason`: panic info/message
    ListenerPanicked,
}

/// Event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Logical context name (or listener name for `ListenerPanicked`).
    pub context: Option<Arc<str>>,
    /// Human-readable reason (panic details etc.).
    pub reason: Option<Arc<str>>,
    /// Registration identities affected by the event.
    pub elements: Option<Vec<ElementId>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            context: None,
            reason: None,
            elements: None,
        }
    }

    /// Attaches a context (or listener) name.
    #[inline]
    pub fn with_context(mut self, context: impl Into<Arc<str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the affected registration identities.
    #[inline]
    pub fn with_elements(mut self, elements: Vec<ElementId>) -> Self {
        self.elements = Some(elements);
        self
    }

    /// Creates a listener panic report.
    #[inline]
    pub fn listener_panicked(listener: &'static str, info: String) -> Self {
        Event::new(EventKind::ListenerPanicked)
            .with_context(listener)
            .with_reason(info)
    }

    /// True for panic reports; used to keep panic reporting from recursing.
    #[inline]
    pub fn is_listener_panic(&self) -> bool {
        matches!(self.kind, EventKind::ListenerPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::Configured);
        let b = Event::new(EventKind::Started);
        let c = Event::new(EventKind::Stopped);
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let id = ElementId::next();
        let ev = Event::new(EventKind::ElementsOrphaned)
            .with_context("shop")
            .with_elements(vec![id]);
        assert_eq!(ev.context.as_deref(), Some("shop"));
        assert_eq!(ev.elements.as_deref(), Some(&[id][..]));
        assert!(ev.reason.is_none());
    }

    #[test]
    fn test_panic_report_guard() {
        let ev = Event::listener_panicked("metrics", "boom".to_string());
        assert!(ev.is_listener_panic());
        assert_eq!(ev.context.as_deref(), Some("metrics"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
        assert!(!Event::new(EventKind::Started).is_listener_panic());
    }
}
