//! # Named serving contexts and ownership.
//!
//! A [`ContextModel`] describes one logical serving scope under which
//! handlers and interceptors are grouped. Contexts are targeted by logical
//! name or by [`Selector`] predicate, never by server instance, because the
//! underlying server may be rebuilt on reconfiguration.
//!
//! ## Ownership
//! Every context is owned by exactly one party at a time:
//! - [`ContextOwner::Container`]: managed by the lifecycle controller (the
//!   default context created on start);
//! - [`ContextOwner::Whiteboard`]: ceded to the controller by an external
//!   dynamic-registration watcher;
//! - [`ContextOwner::Shared`]: whiteboard-registered but visible to every
//!   enumeration owner.
//!
//! Ownership transfer is exclusive, never shared between parties.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::server::ContextRef;
use crate::whiteboard::element::{DefaultResourceModel, ElementId, HandlerModel, InterceptorModel};

/// Logical name of the container-managed default context.
pub const DEFAULT_CONTEXT: &str = "default";

/// Party owning a serving context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextOwner {
    /// Ceded by a dynamic-registration watcher, bound to its owner.
    Whiteboard,
    /// Managed by the lifecycle controller itself.
    Container,
    /// Whiteboard-registered, visible to every owner.
    Shared,
}

/// Reference to the deployment unit a context or element belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit-{}", self.0)
    }
}

/// Predicate over context attributes.
///
/// A selector matches a context iff every key/value pair equals the
/// context's attribute of the same key. The empty selector matches every
/// context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector(BTreeMap<String, String>);

impl Selector {
    /// Creates an empty selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key/value clause.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// True if every clause equals the corresponding attribute.
    pub fn matches(&self, attributes: &BTreeMap<String, String>) -> bool {
        self.0.iter().all(|(k, v)| attributes.get(k) == Some(v))
    }

    /// True if the selector has no clauses.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// # Model of a named serving context.
///
/// Constructed externally by whiteboard watchers (for contexts they manage)
/// or internally by the controller (for the default context). The realized
/// server-side object is optional: container contexts lose it while the
/// server is stopped, whiteboard contexts must carry it at registration.
#[derive(Clone)]
pub struct ContextModel {
    name: Arc<str>,
    attributes: BTreeMap<String, String>,
    owner: ContextOwner,
    unit: Option<UnitId>,
    realized: Option<ContextRef>,
}

impl ContextModel {
    /// Creates a model with the given logical name and owning party.
    pub fn new(name: impl Into<Arc<str>>, owner: ContextOwner) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            owner,
            unit: None,
            realized: None,
        }
    }

    /// Adds a selector-visible attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Binds the model to a deployment unit.
    pub fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Attaches the realized server-side context object.
    pub fn with_realized(mut self, context: ContextRef) -> Self {
        self.realized = Some(context);
        self
    }

    /// The container-managed default context, created during start.
    pub(crate) fn container_default(context: ContextRef) -> Self {
        Self::new(DEFAULT_CONTEXT, ContextOwner::Container).with_realized(context)
    }

    /// Logical name of the context.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Selector-visible attributes.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Current owning party.
    pub fn owner(&self) -> ContextOwner {
        self.owner
    }

    /// Owning deployment unit, if bound.
    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    /// The realized server-side context, if present.
    pub fn realized(&self) -> Option<&ContextRef> {
        self.realized.as_ref()
    }

    pub(crate) fn set_owner(&mut self, owner: ContextOwner) {
        self.owner = owner;
    }

    pub(crate) fn set_realized(&mut self, context: ContextRef) {
        self.realized = Some(context);
    }

    pub(crate) fn clear_realized(&mut self) {
        self.realized = None;
    }
}

impl fmt::Debug for ContextModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextModel")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("unit", &self.unit)
            .field("attributes", &self.attributes)
            .field("realized", &self.realized.is_some())
            .finish()
    }
}

/// A known context plus the elements currently attached to it.
///
/// Lives in the controller's serialized inner state; the gateway and the
/// controller both manipulate entries under the same lock.
pub(crate) struct ContextEntry {
    pub(crate) model: ContextModel,
    pub(crate) handlers: Vec<HandlerModel>,
    pub(crate) interceptors: Vec<InterceptorModel>,
    pub(crate) default_resources: Vec<DefaultResourceModel>,
}

impl ContextEntry {
    pub(crate) fn new(model: ContextModel) -> Self {
        Self {
            model,
            handlers: Vec::new(),
            interceptors: Vec::new(),
            default_resources: Vec::new(),
        }
    }

    /// Realizes the container default context: refreshes the existing entry
    /// or creates it on first start. Existing attachments survive.
    pub(crate) fn realize_default(entries: &mut Vec<ContextEntry>, context: ContextRef) {
        let existing = entries.iter_mut().find(|e| {
            e.model.owner() == ContextOwner::Container && e.model.name() == DEFAULT_CONTEXT
        });
        match existing {
            Some(entry) => entry.model.set_realized(context),
            None => entries.push(ContextEntry::new(ContextModel::container_default(context))),
        }
    }

    /// Moves every attachment of `other` into this entry.
    pub(crate) fn absorb(&mut self, other: ContextEntry) {
        self.handlers.extend(other.handlers);
        self.interceptors.extend(other.interceptors);
        self.default_resources.extend(other.default_resources);
    }

    pub(crate) fn has_attachments(&self) -> bool {
        !self.handlers.is_empty()
            || !self.interceptors.is_empty()
            || !self.default_resources.is_empty()
    }

    /// Registration identities of every attached element.
    pub(crate) fn attached_ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = Vec::new();
        ids.extend(self.handlers.iter().map(|m| m.id()));
        ids.extend(self.interceptors.iter().map(|m| m.id()));
        ids.extend(self.default_resources.iter().map(|m| m.id()));
        ids
    }
}
