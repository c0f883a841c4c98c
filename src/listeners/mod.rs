//! # Event listeners for lifecycle and registration notifications.
//!
//! This module provides the [`Listen`] trait, the [`ListenerSet`] that owns
//! membership and delivery, and a built-in [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   ServerController ── emit(&Event) ──► ListenerSet
//!   WhiteboardGateway ─┘                     │ snapshot, then iterate
//!                                  ┌─────────┼─────────┐
//!                                  ▼         ▼         ▼
//!                             l1.on_event l2.on_event lN.on_event
//!                                  └── panic → ListenerPanicked report
//! ```
//!
//! Delivery is synchronous and in-line with the transition that produced the
//! event: each listener is awaited in turn, in registration order, strictly
//! after the transition's side effect has committed. A panicking listener is
//! isolated and reported; the remaining listeners still receive the event.

mod listener;
mod set;

#[cfg(feature = "logging")]
mod log;

pub use listener::Listen;
pub use set::ListenerSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
