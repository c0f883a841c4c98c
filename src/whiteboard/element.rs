//! # Registrable element models.
//!
//! [`ElementModel`] is the base shape shared by every registration flavor:
//! a stable registration identity, mapping patterns, target references and
//! an optional owning deployment unit. The flavors compose it:
//!
//! - [`HandlerModel`]: a request handler;
//! - [`InterceptorModel`]: pre/post-processing chained around handlers;
//! - [`DefaultResourceModel`]: fallback resource lookup rules for a context.
//!
//! Models are constructed by the dynamic-registration watcher from
//! host-runtime metadata; the gateway only resolves and attaches them.
//!
//! ## Targeting
//! A model targets one or many contexts, each by exact logical name
//! ([`TargetRef::Name`]) or by attribute predicate ([`TargetRef::Selector`]).
//! Attachment fans out: the model attaches to every resolved context
//! independently.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::server::{HandlerRef, InterceptorRef};
use crate::whiteboard::context::{Selector, UnitId};

/// Global counter for registration identities.
static ELEMENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Stable registration identity, used for idempotent unregistration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocates the next identity.
    pub fn next() -> Self {
        Self(ELEMENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Reference to a target context, by name or by selector.
#[derive(Clone, Debug)]
pub enum TargetRef {
    /// Exact logical-name match.
    Name(String),
    /// Attribute-predicate match.
    Selector(Selector),
}

impl TargetRef {
    /// Convenience: a name reference.
    pub fn name(name: impl Into<String>) -> Self {
        TargetRef::Name(name.into())
    }

    /// Convenience: a selector reference.
    pub fn selector(selector: Selector) -> Self {
        TargetRef::Selector(selector)
    }
}

/// Base shape of a registrable element.
#[derive(Clone, Debug)]
pub struct ElementModel {
    id: ElementId,
    patterns: Vec<String>,
    targets: Vec<TargetRef>,
    unit: Option<UnitId>,
}

impl ElementModel {
    /// Creates an empty model with a fresh registration identity.
    pub fn new() -> Self {
        Self {
            id: ElementId::next(),
            patterns: Vec::new(),
            targets: Vec::new(),
            unit: None,
        }
    }

    /// Adds a mapping pattern (e.g. `"/shop/*"`).
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Adds a target reference.
    pub fn with_target(mut self, target: TargetRef) -> Self {
        self.targets.push(target);
        self
    }

    /// Binds the model to a deployment unit.
    pub fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Registration identity.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Mapping patterns.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Target references.
    pub fn targets(&self) -> &[TargetRef] {
        &self.targets
    }

    /// Owning deployment unit, if bound.
    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }
}

impl Default for ElementModel {
    fn default() -> Self {
        Self::new()
    }
}

/// A request handler registration.
#[derive(Clone)]
pub struct HandlerModel {
    element: ElementModel,
    handler: HandlerRef,
}

impl HandlerModel {
    /// Bundles a handler with its registration shape.
    pub fn new(element: ElementModel, handler: HandlerRef) -> Self {
        Self { element, handler }
    }

    /// The registration shape.
    pub fn element(&self) -> &ElementModel {
        &self.element
    }

    /// The handler itself.
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Convenience: the registration identity.
    pub fn id(&self) -> ElementId {
        self.element.id()
    }
}

impl fmt::Debug for HandlerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerModel")
            .field("element", &self.element)
            .field("handler", &self.handler.name())
            .finish()
    }
}

/// An interceptor registration.
#[derive(Clone)]
pub struct InterceptorModel {
    element: ElementModel,
    interceptor: InterceptorRef,
}

impl InterceptorModel {
    /// Bundles an interceptor with its registration shape.
    pub fn new(element: ElementModel, interceptor: InterceptorRef) -> Self {
        Self {
            element,
            interceptor,
        }
    }

    /// The registration shape.
    pub fn element(&self) -> &ElementModel {
        &self.element
    }

    /// The interceptor itself.
    pub fn interceptor(&self) -> &InterceptorRef {
        &self.interceptor
    }

    /// Convenience: the registration identity.
    pub fn id(&self) -> ElementId {
        self.element.id()
    }
}

impl fmt::Debug for InterceptorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorModel")
            .field("element", &self.element)
            .field("interceptor", &self.interceptor.name())
            .finish()
    }
}

/// A default-resource mapping registration (fallback lookup rules).
#[derive(Clone, Debug)]
pub struct DefaultResourceModel {
    element: ElementModel,
    resources: Vec<String>,
}

impl DefaultResourceModel {
    /// Bundles fallback resource names with their registration shape.
    pub fn new(element: ElementModel, resources: Vec<String>) -> Self {
        Self { element, resources }
    }

    /// The registration shape.
    pub fn element(&self) -> &ElementModel {
        &self.element
    }

    /// Fallback resource names, in lookup order.
    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Convenience: the registration identity.
    pub fn id(&self) -> ElementId {
        self.element.id()
    }
}
