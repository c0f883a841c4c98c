//! Lifecycle events: classification and payload metadata.
//!
//! This module groups the event **data model** delivered to registered
//! listeners by the controller and the whiteboard gateway.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `ServerController` (transition events) and
//!   `WhiteboardGateway` (orphan reports).
//! - **Consumers**: every listener registered via
//!   [`ServerController::add_listener`](crate::ServerController::add_listener).

mod event;

pub use event::{Event, EventKind};
