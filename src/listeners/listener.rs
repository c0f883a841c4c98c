//! # Core listener trait.
//!
//! `Listen` is the extension point for observing lifecycle transitions and
//! registration notifications. Listeners are invoked, never owned, by the
//! controller; membership is keyed by `Arc` pointer identity.
//!
//! ## Contract
//! - Delivery is **in-line**: the emitting operation awaits each listener
//!   before returning, so a slow listener slows the transition down.
//! - Listeners must **not** call back into mutating controller or gateway
//!   operations; notification runs inside the serialized section and a
//!   re-entrant call would deadlock.
//! - Panics are caught per listener, reported as
//!   [`EventKind::ListenerPanicked`](crate::EventKind::ListenerPanicked),
//!   and never abort the transition that triggered them.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for lifecycle event listeners.
#[async_trait]
pub trait Listen: Send + Sync + 'static {
    /// Handles a single event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for panic reports and logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
