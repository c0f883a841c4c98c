//! Whiteboard registration: context and element models, and the gateway.
//!
//! This module contains the dynamic-registration surface of the crate.
//! External watchers construct [`ContextModel`] and element models from
//! host-runtime metadata and hand them to the [`WhiteboardGateway`], which
//! resolves logical targeting into concrete context attachment and
//! negotiates context ownership with the lifecycle controller.
//!
//! Internal modules:
//! - `context`: named serving contexts, ownership, selectors;
//! - `element`: the registrable base shape and its handler, interceptor
//!   and default-resource flavors;
//! - `gateway`: enumeration, register/unregister, ownership transfer.

mod context;
mod element;
mod gateway;

pub use context::{ContextModel, ContextOwner, Selector, UnitId, DEFAULT_CONTEXT};
pub use element::{
    DefaultResourceModel, ElementId, ElementModel, HandlerModel, InterceptorModel, TargetRef,
};
pub use gateway::WhiteboardGateway;

pub(crate) use context::ContextEntry;
