//! Error types used by the lifecycle controller, the registration gateway,
//! and the server collaborator contract.
//!
//! This module defines three error enums:
//!
//! - [`ServerError`] — transport failures raised by the embeddable server
//!   behind [`ServerHandle`](crate::server::ServerHandle); the controller
//!   surfaces these unchanged.
//! - [`LifecycleError`] — failures of configure/start/stop transitions.
//! - [`RegistryError`] — failures of whiteboard registration operations.
//!
//! All failures are synchronous: they are returned directly to the caller of
//! the operation that detected them and are never retried internally. Each
//! enum provides `as_label()` returning a short stable snake_case label for
//! logs and metrics.

use thiserror::Error;

use crate::whiteboard::{ContextOwner, ElementId};

/// # Transport errors raised by the embeddable server.
///
/// The concrete failure modes belong to the server implementation; the
/// controller never interprets them, it only propagates them to its caller
/// (wrapped transparently in [`LifecycleError::Server`]).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServerError {
    /// A connector could not be bound to its port.
    #[error("failed to bind connector on port {port}: {reason}")]
    Bind {
        /// The port the connector was asked to listen on.
        port: u16,
        /// Implementation-defined detail.
        reason: String,
    },

    /// Any other transport-level failure (startup, shutdown, handler wiring).
    #[error("server transport error: {reason}")]
    Transport {
        /// Implementation-defined detail.
        reason: String,
    },
}

impl ServerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServerError::Bind { .. } => "server_bind",
            ServerError::Transport { .. } => "server_transport",
        }
    }
}

/// # Errors produced by lifecycle transitions.
///
/// Raised by [`ServerController`](crate::ServerController) when a transition
/// is requested that the current state forbids, when a configuration snapshot
/// fails validation, or when the underlying server reports a transport error.
///
/// The controller is left in a well-defined state on every error path: a
/// failed `start()` stays Stopped, a failed `stop()` stays Started.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The configuration snapshot failed validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What the validation rejected.
        reason: String,
    },

    /// The requested transition is not legal in the current state.
    #[error("cannot {operation} while {state}")]
    IllegalTransition {
        /// Name of the state the controller was in.
        state: &'static str,
        /// The operation that was rejected.
        operation: &'static str,
    },

    /// A server transport failure, surfaced unchanged.
    #[error(transparent)]
    Server(#[from] ServerError),
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use webvisor::LifecycleError;
    ///
    /// let err = LifecycleError::IllegalTransition { state: "unconfigured", operation: "start" };
    /// assert_eq!(err.as_label(), "illegal_transition");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::InvalidConfiguration { .. } => "invalid_configuration",
            LifecycleError::IllegalTransition { .. } => "illegal_transition",
            LifecycleError::Server(_) => "server_error",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LifecycleError::InvalidConfiguration { reason } => {
                format!("configuration rejected: {reason}")
            }
            LifecycleError::IllegalTransition { state, operation } => {
                format!("operation '{operation}' rejected in state '{state}'")
            }
            LifecycleError::Server(err) => format!("server failure: {err}"),
        }
    }
}

/// # Errors produced by whiteboard registration operations.
///
/// Raised by [`WhiteboardGateway`](crate::WhiteboardGateway). Every error is
/// detected before the shared context set is touched, so a failed operation
/// leaves the set exactly as it was.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A registration model is structurally unusable, e.g. a whiteboard
    /// context model without a realized server-side context.
    #[error("invalid registration argument: {reason}")]
    InvalidArgument {
        /// What made the model unusable.
        reason: String,
    },

    /// None of the model's target references resolved to a known context.
    ///
    /// Callers are responsible for registering the target context first;
    /// the gateway does not hold registrations pending a later arrival.
    #[error("no target context resolved for element {element}")]
    UnresolvedTarget {
        /// Registration identity of the rejected element.
        element: ElementId,
    },

    /// A whiteboard context registration collided with an existing context
    /// under the same logical name. Ownership is exclusive; the incumbent
    /// context is never mutated by the rejected call.
    #[error("context '{name}' is already registered ({owner:?} ownership)")]
    OwnershipConflict {
        /// The contested logical name.
        name: String,
        /// Owning party of the incumbent context.
        owner: ContextOwner,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use webvisor::{ContextOwner, RegistryError};
    ///
    /// let err = RegistryError::OwnershipConflict {
    ///     name: "default".to_string(),
    ///     owner: ContextOwner::Container,
    /// };
    /// assert_eq!(err.as_label(), "ownership_conflict");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::InvalidArgument { .. } => "invalid_argument",
            RegistryError::UnresolvedTarget { .. } => "unresolved_target",
            RegistryError::OwnershipConflict { .. } => "ownership_conflict",
        }
    }
}
