//! # Server configuration snapshot.
//!
//! Provides [`ServerConfig`], the immutable configuration handed to
//! [`ServerController::configure`](crate::ServerController::configure).
//!
//! A snapshot is replaced wholesale on every `configure` call and never
//! mutated in place. The secure-transport fields are carried but not yet
//! wired to a connector.
//!
//! ## Field semantics
//! - `http_enabled`: whether a plain HTTP connector is attached on start
//! - `http_port`: port for the plain HTTP connector
//! - `https_enabled` / `https_port`: reserved secure-transport settings

use crate::error::LifecycleError;

/// Immutable configuration snapshot for the embedded server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Attach a plain HTTP connector on start.
    pub http_enabled: bool,

    /// Port for the plain HTTP connector.
    pub http_port: u16,

    /// Attach a secure connector on start (reserved, not wired yet).
    pub https_enabled: bool,

    /// Port for the secure connector (reserved).
    pub https_port: u16,
}

impl ServerConfig {
    /// Convenience constructor for a plain-HTTP-only snapshot.
    pub fn http(port: u16) -> Self {
        Self {
            http_enabled: true,
            http_port: port,
            ..Self::default()
        }
    }

    /// Validates the snapshot.
    ///
    /// An enabled transport with port 0 is rejected: the server factory has
    /// no ephemeral-port contract, so a zero port can only be a caller bug.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.http_enabled && self.http_port == 0 {
            return Err(LifecycleError::InvalidConfiguration {
                reason: "http enabled with port 0".to_string(),
            });
        }
        if self.https_enabled && self.https_port == 0 {
            return Err(LifecycleError::InvalidConfiguration {
                reason: "https enabled with port 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    /// Default configuration: plain HTTP on 8080, secure transport off.
    fn default() -> Self {
        Self {
            http_enabled: true,
            http_port: 8080,
            https_enabled: false,
            https_port: 8443,
        }
    }
}
