//! Embeddable-server collaborator contracts.
//!
//! The controller never talks to a concrete server; it drives the opaque
//! [`ServerHandle`] produced by a [`ServerFactory`]. Everything behind these
//! traits (connection handling, HTTP parsing, request dispatch) belongs to
//! the server implementation.

mod handle;

pub use handle::{
    ContextRef, Handler, HandlerRef, Interceptor, InterceptorRef, ServerContext, ServerFactory,
    ServerHandle,
};
