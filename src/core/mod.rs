//! Runtime core: lifecycle state and the controller.
//!
//! This module contains the lifecycle half of the crate. The only public API
//! from this module is [`ServerController`], which owns the state machine,
//! the active configuration, the server handle and the shared context set.
//!
//! Internal modules:
//! - [`state`]: the tagged-variant lifecycle states;
//! - [`controller`]: transition logic, event emission, handler forwarding.

mod controller;
mod state;

pub use controller::ServerController;
