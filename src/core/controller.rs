//! # ServerController: lifecycle transitions, event emission, handler forwarding.
//!
//! The [`ServerController`] owns exactly one [`ServerState`], the shared
//! context set, and the listener set. It drives the opaque server handle
//! through its factory and notifies listeners of every committed transition.
//!
//! ## High-level architecture
//! ```text
//! callers (any thread)                 collaborators
//!   configure/start/stop ──┐
//!   add_handler            │   ┌──► ServerFactory::create_server()
//!   is_started/config      ▼   │
//! ┌──────────────────────────────┐
//! │ ServerController             │──► ServerHandle (add_connector,
//! │   Mutex<Inner>               │       add_default_context, start,
//! │     state: ServerState      ─┤       stop, add_handler)
//! │     contexts: Vec<..>        │
//! │   ListenerSet               ─┼──► Listen::on_event (in-line,
//! └──────────────────────────────┘       registration order)
//!          ▲
//!          │ shares Inner under the same lock
//!   WhiteboardGateway
//! ```
//!
//! ## Rules
//! - All mutating operations serialize on one lock; at most one is in
//!   flight at any time, callers block until the lock is available.
//! - Events are emitted strictly after the corresponding side effect has
//!   committed, once per transition, while the operation still holds the
//!   serialized section (total transition order is therefore also total
//!   event order).
//! - Reconfiguring a started server restarts it: the event sequence is
//!   Stopped then Started, with no Configured in between.
//! - `add_handler` while not started is dropped, not queued. Queue-and-flush
//!   would change observable behavior, so the drop is pinned by tests.
//! - A failed `start()` leaves the controller Stopped; a failed `stop()`
//!   leaves it Started. Server errors are surfaced unchanged.

use std::mem;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::error::LifecycleError;
use crate::events::{Event, EventKind};
use crate::listeners::{Listen, ListenerSet};
use crate::server::{ContextRef, HandlerRef, ServerFactory, ServerHandle};
use crate::whiteboard::{ContextEntry, ContextOwner, WhiteboardGateway};

use super::state::ServerState;

/// Mutable controller state, guarded by one exclusive lock.
pub(crate) struct Inner {
    pub(crate) state: ServerState,
    pub(crate) contexts: Vec<ContextEntry>,
}

/// Coordinates server lifecycle, context ownership, and event delivery.
pub struct ServerController {
    factory: Arc<dyn ServerFactory>,
    pub(crate) inner: Mutex<Inner>,
    pub(crate) listeners: ListenerSet,
}

impl ServerController {
    /// Creates an unconfigured controller around the given server factory.
    pub fn new(factory: Arc<dyn ServerFactory>) -> Arc<Self> {
        Arc::new(Self {
            factory,
            inner: Mutex::new(Inner {
                state: ServerState::Unconfigured,
                contexts: Vec::new(),
            }),
            listeners: ListenerSet::new(),
        })
    }

    /// Returns the whiteboard registration gateway backed by this controller.
    pub fn whiteboard(self: &Arc<Self>) -> WhiteboardGateway {
        WhiteboardGateway::new(Arc::clone(self))
    }

    /// Stores a new configuration snapshot and applies the state-specific
    /// configure behavior.
    ///
    /// The stored configuration is replaced unconditionally. While not
    /// started this emits `Configured`; on a started server it performs a
    /// full stop/start cycle instead (emitting `Stopped` then `Started`,
    /// never `Configured`).
    pub async fn configure(&self, config: ServerConfig) -> Result<(), LifecycleError> {
        config.validate()?;
        let mut inner = self.inner.lock().await;
        match mem::replace(&mut inner.state, ServerState::Unconfigured) {
            ServerState::Unconfigured | ServerState::Stopped { .. } => {
                inner.state = ServerState::Stopped { config };
                self.listeners.emit(&Event::new(EventKind::Configured)).await;
                Ok(())
            }
            ServerState::Started { handle, .. } => {
                inner.state = ServerState::Started { config, handle };
                self.stop_locked(&mut inner).await?;
                self.start_locked(&mut inner).await
            }
        }
    }

    /// Starts the server.
    ///
    /// Legal only while Stopped: builds a fresh handle, attaches the HTTP
    /// connector when enabled, creates the default context, and starts the
    /// transport. Emits `Started` once the handle is up.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        let mut inner = self.inner.lock().await;
        self.start_locked(&mut inner).await
    }

    /// Stops the server.
    ///
    /// A no-op while Unconfigured or already Stopped (idempotent). Emits
    /// `Stopped` only when a running handle was actually stopped.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let mut inner = self.inner.lock().await;
        self.stop_locked(&mut inner).await
    }

    /// Forwards a handler registration to the running server.
    ///
    /// While not started the registration is dropped, not queued: it will
    /// not reach the server even after a later `start()`.
    pub async fn add_handler(
        &self,
        target: &str,
        handler: HandlerRef,
    ) -> Result<(), LifecycleError> {
        let mut inner = self.inner.lock().await;
        match &mut inner.state {
            ServerState::Started { handle, .. } => {
                handle.add_handler(target, handler).await.map_err(Into::into)
            }
            _ => Ok(()),
        }
    }

    /// True iff the server is currently started.
    pub async fn is_started(&self) -> bool {
        self.inner.lock().await.state.is_started()
    }

    /// The active configuration snapshot, if one has been stored.
    pub async fn config(&self) -> Option<ServerConfig> {
        self.inner.lock().await.state.config().cloned()
    }

    /// Registers a listener. Re-adding an already-present listener is a
    /// no-op; returns whether the set changed.
    pub async fn add_listener(&self, listener: Arc<dyn Listen>) -> bool {
        self.listeners.add(listener).await
    }

    /// Removes a listener by identity; returns whether it was present.
    pub async fn remove_listener(&self, listener: &Arc<dyn Listen>) -> bool {
        self.listeners.remove(listener).await
    }

    async fn start_locked(&self, inner: &mut Inner) -> Result<(), LifecycleError> {
        let state = inner.state.name();
        match mem::replace(&mut inner.state, ServerState::Unconfigured) {
            ServerState::Unconfigured => Err(LifecycleError::IllegalTransition {
                state,
                operation: "start",
            }),
            started @ ServerState::Started { .. } => {
                inner.state = started;
                Err(LifecycleError::IllegalTransition {
                    state,
                    operation: "start",
                })
            }
            ServerState::Stopped { config } => match self.boot(&config).await {
                Ok((handle, context)) => {
                    ContextEntry::realize_default(&mut inner.contexts, context);
                    inner.state = ServerState::Started { config, handle };
                    self.listeners.emit(&Event::new(EventKind::Started)).await;
                    Ok(())
                }
                Err(err) => {
                    inner.state = ServerState::Stopped { config };
                    Err(err)
                }
            },
        }
    }

    async fn stop_locked(&self, inner: &mut Inner) -> Result<(), LifecycleError> {
        match mem::replace(&mut inner.state, ServerState::Unconfigured) {
            ServerState::Unconfigured => Ok(()),
            stopped @ ServerState::Stopped { .. } => {
                inner.state = stopped;
                Ok(())
            }
            ServerState::Started { config, mut handle } => {
                if let Err(err) = handle.stop().await {
                    inner.state = ServerState::Started { config, handle };
                    return Err(err.into());
                }
                // The handle is gone; container contexts lose their realized
                // objects but keep their attachments for the next start.
                for entry in &mut inner.contexts {
                    if entry.model.owner() == ContextOwner::Container {
                        entry.model.clear_realized();
                    }
                }
                inner.state = ServerState::Stopped { config };
                self.listeners.emit(&Event::new(EventKind::Stopped)).await;
                Ok(())
            }
        }
    }

    /// Builds and starts a fresh handle from `config`.
    async fn boot(
        &self,
        config: &ServerConfig,
    ) -> Result<(Box<dyn ServerHandle>, ContextRef), LifecycleError> {
        let mut handle = self.factory.create_server()?;
        if config.http_enabled {
            handle.add_connector(config.http_port).await?;
        }
        // TODO: attach the secure connector once ServerConfig carries real
        // TLS settings instead of the reserved https fields.
        let context = handle.add_default_context().await?;
        handle.start().await?;
        Ok((handle, context))
    }
}
