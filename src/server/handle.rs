//! # Server handle and factory contracts.
//!
//! A [`ServerFactory`] builds one [`ServerHandle`] per start cycle; the
//! handle is discarded when the server stops and a fresh one is built on the
//! next start. All handle operations are synchronous from the caller's point
//! of view: the controller awaits them inline and blocks for their duration.
//!
//! Failures are reported as [`ServerError`] and surfaced unchanged by the
//! controller.
//!
//! ## Contract surface
//! ```text
//! ServerFactory::create_server() ─► ServerHandle
//!     ├─ add_connector(port)          attach a plain HTTP connector
//!     ├─ add_default_context()        create the default serving context
//!     ├─ start() / stop()             run state of the transport
//!     └─ add_handler(target, h)       wire a handler while running
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServerError;

/// Marker contract for a server-side serving context object.
///
/// Produced by [`ServerHandle::add_default_context`] or constructed by a
/// whiteboard watcher for contexts it manages itself. Opaque beyond identity.
pub trait ServerContext: Send + Sync + 'static {}

/// Shared reference to a realized server-side context.
pub type ContextRef = Arc<dyn ServerContext>;

/// A unit of request-processing logic.
///
/// The orchestration layer treats handlers as opaque: dispatch semantics are
/// the server's business. Only a stable name is required, for diagnostics.
pub trait Handler: Send + Sync + 'static {
    /// Returns a stable, human-readable handler name.
    fn name(&self) -> &str;
}

/// Shared reference to a request handler.
pub type HandlerRef = Arc<dyn Handler>;

/// A unit of pre/post-processing logic chained around handlers.
pub trait Interceptor: Send + Sync + 'static {
    /// Returns a stable, human-readable interceptor name.
    fn name(&self) -> &str;
}

/// Shared reference to an interceptor.
pub type InterceptorRef = Arc<dyn Interceptor>;

/// # Handle to one embeddable server instance.
///
/// Created by a [`ServerFactory`], owned by the lifecycle controller while
/// the server is configured/started, and dropped when the server is rebuilt
/// on reconfiguration. All methods may fail with an implementation-defined
/// [`ServerError`].
#[async_trait]
pub trait ServerHandle: Send + 'static {
    /// Attaches a plain HTTP connector listening on `port`.
    async fn add_connector(&mut self, port: u16) -> Result<(), ServerError>;

    /// Creates the default serving context and returns a reference to it.
    async fn add_default_context(&mut self) -> Result<ContextRef, ServerError>;

    /// Starts the transport. Blocks until the server is accepting.
    async fn start(&mut self) -> Result<(), ServerError>;

    /// Stops the transport. Blocks until the server has shut down.
    async fn stop(&mut self) -> Result<(), ServerError>;

    /// Wires a handler under `target` while the server is running.
    async fn add_handler(&mut self, target: &str, handler: HandlerRef) -> Result<(), ServerError>;
}

/// Factory for [`ServerHandle`] instances.
///
/// One handle is created per start cycle, so reconfiguration can rebuild the
/// server from scratch without the controller's callers noticing an identity
/// change.
pub trait ServerFactory: Send + Sync + 'static {
    /// Builds a fresh, not-yet-started server handle.
    fn create_server(&self) -> Result<Box<dyn ServerHandle>, ServerError>;
}
