//! # Lifecycle states.
//!
//! [`ServerState`] is the single value the controller holds at any instant.
//! Each variant carries exactly the data that is valid in that state, so a
//! started server without a handle, or a stopped server without a
//! configuration, cannot be represented.
//!
//! The behavior of every operation in every state lives in one `match` per
//! operation in the controller:
//!
//! ```text
//! | State        | start()            | stop()   | configure(cfg)          | add_handler(t, h) |
//! |--------------|--------------------|----------|-------------------------|-------------------|
//! | Unconfigured | IllegalTransition  | no-op    | store → Stopped,        | dropped           |
//! |              |                    |          | emit Configured         |                   |
//! | Stopped      | boot handle,       | no-op    | store, emit Configured  | dropped           |
//! |              | → Started,         |          | (stays Stopped)         |                   |
//! |              | emit Started       |          |                         |                   |
//! | Started      | IllegalTransition  | stop     | stop() then start(),    | forward to handle |
//! |              |                    | handle,  | emits Stopped + Started |                   |
//! |              |                    | → Stopped| but no Configured       |                   |
//! |              |                    | emit     |                         |                   |
//! |              |                    | Stopped  |                         |                   |
//! ```

use crate::config::ServerConfig;
use crate::server::ServerHandle;

/// The lifecycle state of the embedded server.
///
/// Transitions are the only way the value changes; no code outside the
/// controller may set it directly.
pub(crate) enum ServerState {
    /// No configuration has been stored yet.
    Unconfigured,
    /// Configured but not running. Carries the active configuration.
    Stopped {
        /// The configuration the next start will use.
        config: ServerConfig,
    },
    /// Running. Carries the active configuration and the live handle.
    Started {
        /// The configuration the handle was built from.
        config: ServerConfig,
        /// The live server handle.
        handle: Box<dyn ServerHandle>,
    },
}

impl ServerState {
    /// Short state name, used in transition errors.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ServerState::Unconfigured => "unconfigured",
            ServerState::Stopped { .. } => "stopped",
            ServerState::Started { .. } => "started",
        }
    }

    /// True iff the server is running.
    pub(crate) fn is_started(&self) -> bool {
        matches!(self, ServerState::Started { .. })
    }

    /// The active configuration, if one has been stored.
    pub(crate) fn config(&self) -> Option<&ServerConfig> {
        match self {
            ServerState::Unconfigured => None,
            ServerState::Stopped { config } | ServerState::Started { config, .. } => Some(config),
        }
    }
}
