//! # webvisor
//!
//! **Webvisor** is a lightweight lifecycle and registration orchestrator for
//! an embeddable HTTP server.
//!
//! It sits between a concrete server implementation (behind an opaque
//! factory/handle contract) and any number of concurrent callers that
//! register request handlers, interceptors, default-resource mappings and
//! whole serving contexts against *logical names* rather than server
//! instances. The server identity stays hidden: reconfiguration rebuilds it
//! without the registrants noticing.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!   │  watcher #1  │    │  watcher #2  │    │ host module  │
//!   │ (whiteboard) │    │ (whiteboard) │    │  (lifecycle) │
//!   └──────┬───────┘    └──────┬───────┘    └──────┬───────┘
//!          ▼                   ▼                   ▼
//! ┌─────────────────────────────────┐   ┌────────────────────────────┐
//! │  WhiteboardGateway              │──►│  ServerController          │
//! │  - resolve name/selector targets│   │  - ServerState (one value) │
//! │  - fan-out element attachment   │   │  - ServerConfig snapshot   │
//! │  - context ownership transfer   │   │  - ServerHandle (if up)    │
//! └─────────────────────────────────┘   │  - ListenerSet             │
//!          shares one serialized        └──────┬──────────────┬──────┘
//!          inner state with ───────────────────┘              │
//!                                                             ▼
//!                                              ┌──────────────────────────┐
//!                                              │ ServerFactory/Handle     │
//!                                              │ (embeddable HTTP server) │
//!                                              └──────────────────────────┘
//!
//! Event flow:
//!   transition commits ──► ListenerSet ──► l1.on_event .. lN.on_event
//!   (synchronous, registration order, panics isolated per listener)
//! ```
//!
//! ### Lifecycle
//! ```text
//! Unconfigured ── configure ──► Stopped ── start ──► Started
//!      ▲                          │  ▲                 │
//!      │                          │  └──── stop ───────┘
//!      └── (initial state)        └ configure stores a new
//!                                   snapshot in place
//!
//! configure while Started:
//!   stop (emit Stopped) ─► reprocess ─► start (emit Started)
//!   no Configured event on this path
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                       |
//! |-------------------|---------------------------------------------------------------|------------------------------------------|
//! | **Lifecycle**     | Configure/start/stop the embedded server, one state at a time.| [`ServerController`], [`ServerConfig`]   |
//! | **Whiteboard**    | Register elements and contexts by logical name or selector.   | [`WhiteboardGateway`], [`ContextModel`]  |
//! | **Elements**      | Handlers, interceptors, default-resource mappings.            | [`HandlerModel`], [`InterceptorModel`], [`DefaultResourceModel`] |
//! | **Listeners**     | Observe transitions and registration notifications.           | [`Listen`], [`Event`], [`EventKind`]     |
//! | **Server contract**| Plug in any embeddable server implementation.                | [`ServerFactory`], [`ServerHandle`]      |
//! | **Errors**        | Typed, synchronous failures with stable labels.               | [`LifecycleError`], [`RegistryError`]    |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use webvisor::{
//!     ContextRef, Handler, HandlerRef, ServerConfig, ServerContext, ServerController,
//!     ServerError, ServerFactory, ServerHandle,
//! };
//!
//! // A stand-in for a real embeddable server.
//! struct InMemoryContext;
//! impl ServerContext for InMemoryContext {}
//!
//! struct InMemoryServer;
//!
//! #[async_trait]
//! impl ServerHandle for InMemoryServer {
//!     async fn add_connector(&mut self, _port: u16) -> Result<(), ServerError> { Ok(()) }
//!     async fn add_default_context(&mut self) -> Result<ContextRef, ServerError> {
//!         Ok(Arc::new(InMemoryContext))
//!     }
//!     async fn start(&mut self) -> Result<(), ServerError> { Ok(()) }
//!     async fn stop(&mut self) -> Result<(), ServerError> { Ok(()) }
//!     async fn add_handler(&mut self, _target: &str, _h: HandlerRef) -> Result<(), ServerError> {
//!         Ok(())
//!     }
//! }
//!
//! struct InMemoryFactory;
//! impl ServerFactory for InMemoryFactory {
//!     fn create_server(&self) -> Result<Box<dyn ServerHandle>, ServerError> {
//!         Ok(Box::new(InMemoryServer))
//!     }
//! }
//!
//! struct Hello;
//! impl Handler for Hello {
//!     fn name(&self) -> &str { "hello" }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), webvisor::LifecycleError> {
//!     let controller = ServerController::new(Arc::new(InMemoryFactory));
//!
//!     controller.configure(ServerConfig::http(8080)).await?;
//!     controller.start().await?;
//!     assert!(controller.is_started().await);
//!
//!     controller.add_handler("/hello", Arc::new(Hello)).await?;
//!
//!     controller.stop().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod listeners;
mod server;
mod whiteboard;

// ---- Public re-exports ----

pub use crate::core::ServerController;
pub use config::ServerConfig;
pub use error::{LifecycleError, RegistryError, ServerError};
pub use events::{Event, EventKind};
pub use listeners::{Listen, ListenerSet};
pub use server::{
    ContextRef, Handler, HandlerRef, Interceptor, InterceptorRef, ServerContext, ServerFactory,
    ServerHandle,
};
pub use whiteboard::{
    ContextModel, ContextOwner, DefaultResourceModel, ElementId, ElementModel, HandlerModel,
    InterceptorModel, Selector, TargetRef, UnitId, WhiteboardGateway, DEFAULT_CONTEXT,
};

// Optional: expose a simple built-in logging listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogWriter;
