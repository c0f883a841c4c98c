//! # WhiteboardGateway: logical targeting and context ownership transfer.
//!
//! The gateway is the registration surface used by dynamic-registration
//! watchers. It translates logical targeting (context name or selector) into
//! concrete context attachment, and negotiates context ownership handover
//! with the lifecycle controller.
//!
//! ## Target resolution
//! ```text
//! for each TargetRef of a model:
//!   Name(n)      ─► contexts with logical name == n
//!                     (whiteboard-registered shadows container-owned)
//!   Selector(s)  ─► contexts whose attributes satisfy every clause of s
//! union, first-seen order, de-duplicated
//! ```
//!
//! A model attaches to **every** resolved context independently (fan-out,
//! not first-match). Zero resolved contexts is a synchronous error; the
//! gateway never holds a registration pending the later arrival of a
//! matching context.
//!
//! ## Rules
//! - All operations serialize on the controller's lock, so they never
//!   interleave observably with each other or with default-context creation
//!   during `start()`.
//! - Unregistering an identity that is attached nowhere is a no-op.
//! - Ownership transfer is exclusive: a whiteboard registration under an
//!   occupied logical name is rejected without mutating the incumbent.
//! - Relinquishing a whiteboard context reattaches its elements to the
//!   container-owned context of the same name when one exists; otherwise
//!   the elements are reported as orphaned through the listener channel,
//!   never silently dropped.

use std::sync::Arc;

use crate::core::ServerController;
use crate::error::RegistryError;
use crate::events::{Event, EventKind};
use crate::whiteboard::context::{ContextEntry, ContextModel, ContextOwner};
use crate::whiteboard::element::{
    DefaultResourceModel, ElementId, HandlerModel, InterceptorModel, TargetRef,
};

/// Registration gateway backed by a [`ServerController`].
///
/// Cheap to clone; every clone talks to the same controller.
#[derive(Clone)]
pub struct WhiteboardGateway {
    controller: Arc<ServerController>,
}

impl WhiteboardGateway {
    pub(crate) fn new(controller: Arc<ServerController>) -> Self {
        Self { controller }
    }

    /// Returns every known context owned by `owner` or marked shared, in
    /// insertion order. No side effects.
    pub async fn context_models(&self, owner: ContextOwner) -> Vec<ContextModel> {
        let inner = self.controller.inner.lock().await;
        inner
            .contexts
            .iter()
            .filter(|e| e.model.owner() == owner || e.model.owner() == ContextOwner::Shared)
            .map(|e| e.model.clone())
            .collect()
    }

    /// Registration identities attached to contexts with the given logical
    /// name (duplicates appear once per attachment).
    pub async fn attached_elements(&self, name: &str) -> Vec<ElementId> {
        let inner = self.controller.inner.lock().await;
        inner
            .contexts
            .iter()
            .filter(|e| e.model.name() == name)
            .flat_map(ContextEntry::attached_ids)
            .collect()
    }

    /// Registers a handler model against every context its targets resolve to.
    pub async fn register_handler(&self, model: HandlerModel) -> Result<(), RegistryError> {
        let mut inner = self.controller.inner.lock().await;
        let hits = resolve_targets(&inner.contexts, model.element().targets());
        if hits.is_empty() {
            return Err(RegistryError::UnresolvedTarget { element: model.id() });
        }
        for idx in hits {
            inner.contexts[idx].handlers.push(model.clone());
        }
        Ok(())
    }

    /// Removes a handler registration from every context it was attached to.
    pub async fn unregister_handler(&self, model: &HandlerModel) {
        let mut inner = self.controller.inner.lock().await;
        for entry in &mut inner.contexts {
            entry.handlers.retain(|m| m.id() != model.id());
        }
    }

    /// Registers an interceptor model against every context its targets
    /// resolve to.
    pub async fn register_interceptor(&self, model: InterceptorModel) -> Result<(), RegistryError> {
        let mut inner = self.controller.inner.lock().await;
        let hits = resolve_targets(&inner.contexts, model.element().targets());
        if hits.is_empty() {
            return Err(RegistryError::UnresolvedTarget { element: model.id() });
        }
        for idx in hits {
            inner.contexts[idx].interceptors.push(model.clone());
        }
        Ok(())
    }

    /// Removes an interceptor registration from every context it was
    /// attached to.
    pub async fn unregister_interceptor(&self, model: &InterceptorModel) {
        let mut inner = self.controller.inner.lock().await;
        for entry in &mut inner.contexts {
            entry.interceptors.retain(|m| m.id() != model.id());
        }
    }

    /// Registers a default-resource mapping against every context its
    /// targets resolve to.
    pub async fn register_default_resource_mapping(
        &self,
        model: DefaultResourceModel,
    ) -> Result<(), RegistryError> {
        let mut inner = self.controller.inner.lock().await;
        let hits = resolve_targets(&inner.contexts, model.element().targets());
        if hits.is_empty() {
            return Err(RegistryError::UnresolvedTarget { element: model.id() });
        }
        for idx in hits {
            inner.contexts[idx].default_resources.push(model.clone());
        }
        Ok(())
    }

    /// Removes a default-resource mapping from every context it was
    /// attached to.
    pub async fn unregister_default_resource_mapping(&self, model: &DefaultResourceModel) {
        let mut inner = self.controller.inner.lock().await;
        for entry in &mut inner.contexts {
            entry.default_resources.retain(|m| m.id() != model.id());
        }
    }

    /// Cedes a whiteboard-managed context to the controller.
    ///
    /// The model must carry a realized server-side context. The logical name
    /// must be free: ownership is exclusive, so any incumbent under the same
    /// name (container, whiteboard or shared) rejects the call without being
    /// mutated. On success the owning party becomes `Whiteboard` (a model
    /// marked `Shared` keeps shared visibility) and the context becomes
    /// visible to [`context_models`](Self::context_models).
    pub async fn add_whiteboard_context(&self, model: ContextModel) -> Result<(), RegistryError> {
        if model.realized().is_none() {
            return Err(RegistryError::InvalidArgument {
                reason: "whiteboard context model must carry a realized server context"
                    .to_string(),
            });
        }
        let mut inner = self.controller.inner.lock().await;
        if let Some(existing) = inner.contexts.iter().find(|e| e.model.name() == model.name()) {
            return Err(RegistryError::OwnershipConflict {
                name: model.name().to_string(),
                owner: existing.model.owner(),
            });
        }
        let mut model = model;
        if model.owner() != ContextOwner::Shared {
            model.set_owner(ContextOwner::Whiteboard);
        }
        inner.contexts.push(ContextEntry::new(model));
        Ok(())
    }

    /// Relinquishes whiteboard ownership of the model's logical name.
    ///
    /// A no-op when no whiteboard-registered context holds that name.
    /// Elements still attached to the removed context are logically
    /// reattached to the container-owned context of the same name when one
    /// exists; otherwise they are reported via `ElementsOrphaned`.
    pub async fn remove_whiteboard_context(&self, model: &ContextModel) {
        let mut inner = self.controller.inner.lock().await;
        let Some(pos) = inner.contexts.iter().position(|e| {
            e.model.name() == model.name() && e.model.owner() != ContextOwner::Container
        }) else {
            return;
        };
        let removed = inner.contexts.remove(pos);
        if !removed.has_attachments() {
            return;
        }

        let name = removed.model.name().to_string();
        let fallback = inner
            .contexts
            .iter_mut()
            .find(|e| e.model.name() == name && e.model.owner() == ContextOwner::Container);
        match fallback {
            Some(default_entry) => default_entry.absorb(removed),
            None => {
                let event = Event::new(EventKind::ElementsOrphaned)
                    .with_context(name)
                    .with_elements(removed.attached_ids());
                self.controller.listeners.emit(&event).await;
            }
        }
    }
}

/// Resolves target references against the known context set.
///
/// Returns entry indices, first-seen order, de-duplicated. A name reference
/// resolves whiteboard-registered contexts in preference to a container-owned
/// context of the same name; a selector reference matches attributes only.
fn resolve_targets(contexts: &[ContextEntry], targets: &[TargetRef]) -> Vec<usize> {
    let mut hits: Vec<usize> = Vec::new();
    for target in targets {
        match target {
            TargetRef::Name(name) => {
                let named: Vec<usize> = contexts
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.model.name() == name.as_str())
                    .map(|(i, _)| i)
                    .collect();
                let shadowed = named
                    .iter()
                    .any(|&i| contexts[i].model.owner() != ContextOwner::Container);
                for &i in &named {
                    if shadowed && contexts[i].model.owner() == ContextOwner::Container {
                        continue;
                    }
                    if !hits.contains(&i) {
                        hits.push(i);
                    }
                }
            }
            TargetRef::Selector(selector) => {
                for (i, entry) in contexts.iter().enumerate() {
                    if selector.matches(entry.model.attributes()) && !hits.contains(&i) {
                        hits.push(i);
                    }
                }
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    use super::*;
    use crate::config::ServerConfig;
    use crate::error::ServerError;
    use crate::listeners::Listen;
    use crate::server::{
        ContextRef, Handler, HandlerRef, ServerContext, ServerFactory, ServerHandle,
    };
    use crate::whiteboard::context::Selector;
    use crate::whiteboard::element::ElementModel;
    use crate::whiteboard::DEFAULT_CONTEXT;

    struct NullContext;

    impl ServerContext for NullContext {}

    struct QuietHandle;

    #[async_trait]
    impl ServerHandle for QuietHandle {
        async fn add_connector(&mut self, _port: u16) -> Result<(), ServerError> {
            Ok(())
        }

        async fn add_default_context(&mut self) -> Result<ContextRef, ServerError> {
            Ok(Arc::new(NullContext))
        }

        async fn start(&mut self) -> Result<(), ServerError> {
            Ok(())
        }

        async fn stop(&mut self) -> Result<(), ServerError> {
            Ok(())
        }

        async fn add_handler(
            &mut self,
            _target: &str,
            _handler: HandlerRef,
        ) -> Result<(), ServerError> {
            Ok(())
        }
    }

    struct QuietFactory;

    impl ServerFactory for QuietFactory {
        fn create_server(&self) -> Result<Box<dyn ServerHandle>, ServerError> {
            Ok(Box::new(QuietHandle))
        }
    }

    struct NamedHandler(&'static str);

    impl Handler for NamedHandler {
        fn name(&self) -> &str {
            self.0
        }
    }

    struct EventSink {
        seen: StdMutex<Vec<Event>>,
    }

    impl EventSink {
        fn arc() -> Arc<Self> {
            Arc::new(Self {
                seen: StdMutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<Event> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Listen for EventSink {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.clone());
        }

        fn name(&self) -> &'static str {
            "event-sink"
        }
    }

    fn whiteboard_model(name: &str) -> ContextModel {
        ContextModel::new(name, ContextOwner::Whiteboard).with_realized(Arc::new(NullContext))
    }

    fn handler_for(target: TargetRef) -> HandlerModel {
        HandlerModel::new(
            ElementModel::new().with_pattern("/*").with_target(target),
            Arc::new(NamedHandler("h")),
        )
    }

    fn gateway() -> WhiteboardGateway {
        ServerController::new(Arc::new(QuietFactory)).whiteboard()
    }

    #[tokio::test]
    async fn test_unresolved_target_is_rejected() {
        let gw = gateway();
        gw.add_whiteboard_context(whiteboard_model("shop")).await.unwrap();

        let model = handler_for(TargetRef::name("missing"));
        let err = gw.register_handler(model).await.unwrap_err();

        assert_eq!(err.as_label(), "unresolved_target");
        // The context set is untouched.
        let contexts = gw.context_models(ContextOwner::Whiteboard).await;
        assert_eq!(contexts.len(), 1);
        assert!(gw.attached_elements("shop").await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_target_refs_is_rejected() {
        let gw = gateway();
        gw.add_whiteboard_context(whiteboard_model("shop")).await.unwrap();

        let model = HandlerModel::new(ElementModel::new(), Arc::new(NamedHandler("h")));
        assert!(gw.register_handler(model).await.is_err());
    }

    #[tokio::test]
    async fn test_selector_fans_out_to_every_match() {
        let gw = gateway();
        gw.add_whiteboard_context(whiteboard_model("shop").with_attribute("env", "prod"))
            .await
            .unwrap();
        gw.add_whiteboard_context(whiteboard_model("cart").with_attribute("env", "prod"))
            .await
            .unwrap();
        gw.add_whiteboard_context(whiteboard_model("dev").with_attribute("env", "dev"))
            .await
            .unwrap();

        let model = handler_for(TargetRef::selector(Selector::new().with("env", "prod")));
        let id = model.id();
        gw.register_handler(model.clone()).await.unwrap();

        assert_eq!(gw.attached_elements("shop").await, vec![id]);
        assert_eq!(gw.attached_elements("cart").await, vec![id]);
        assert!(gw.attached_elements("dev").await.is_empty());

        gw.unregister_handler(&model).await;
        assert!(gw.attached_elements("shop").await.is_empty());
        assert!(gw.attached_elements("cart").await.is_empty());
    }

    #[tokio::test]
    async fn test_multi_target_union() {
        let gw = gateway();
        gw.add_whiteboard_context(whiteboard_model("shop")).await.unwrap();
        gw.add_whiteboard_context(whiteboard_model("cart")).await.unwrap();

        let model = HandlerModel::new(
            ElementModel::new()
                .with_target(TargetRef::name("shop"))
                .with_target(TargetRef::name("cart")),
            Arc::new(NamedHandler("h")),
        );
        let id = model.id();
        gw.register_handler(model).await.unwrap();

        assert_eq!(gw.attached_elements("shop").await, vec![id]);
        assert_eq!(gw.attached_elements("cart").await, vec![id]);
    }

    #[tokio::test]
    async fn test_interceptors_and_default_resources_follow_the_same_contract() {
        struct Tracing;

        impl crate::server::Interceptor for Tracing {
            fn name(&self) -> &str {
                "tracing"
            }
        }

        let gw = gateway();
        gw.add_whiteboard_context(whiteboard_model("shop")).await.unwrap();

        let interceptor = InterceptorModel::new(
            ElementModel::new().with_target(TargetRef::name("shop")),
            Arc::new(Tracing),
        );
        let mapping = DefaultResourceModel::new(
            ElementModel::new().with_target(TargetRef::name("shop")),
            vec!["index.html".to_string()],
        );
        let (int_id, map_id) = (interceptor.id(), mapping.id());

        gw.register_interceptor(interceptor.clone()).await.unwrap();
        gw.register_default_resource_mapping(mapping.clone()).await.unwrap();
        assert_eq!(gw.attached_elements("shop").await, vec![int_id, map_id]);

        gw.unregister_interceptor(&interceptor).await;
        gw.unregister_default_resource_mapping(&mapping).await;
        assert!(gw.attached_elements("shop").await.is_empty());

        // Unresolved targets fail the same way for every flavor.
        let lost = InterceptorModel::new(
            ElementModel::new().with_target(TargetRef::name("missing")),
            Arc::new(Tracing),
        );
        assert!(gw.register_interceptor(lost).await.is_err());
    }

    #[tokio::test]
    async fn test_unregister_unknown_is_noop() {
        let gw = gateway();
        gw.add_whiteboard_context(whiteboard_model("shop")).await.unwrap();

        // Never registered: both calls are silent no-ops.
        let model = handler_for(TargetRef::name("shop"));
        gw.unregister_handler(&model).await;
        gw.unregister_handler(&model).await;
        assert!(gw.attached_elements("shop").await.is_empty());
    }

    #[tokio::test]
    async fn test_whiteboard_context_requires_realized_object() {
        let gw = gateway();

        let bare = ContextModel::new("shop", ContextOwner::Whiteboard);
        let err = gw.add_whiteboard_context(bare).await.unwrap_err();
        assert_eq!(err.as_label(), "invalid_argument");
        assert!(gw.context_models(ContextOwner::Whiteboard).await.is_empty());
    }

    #[tokio::test]
    async fn test_container_owned_name_conflicts() {
        let controller = ServerController::new(Arc::new(QuietFactory));
        let gw = controller.whiteboard();

        controller.configure(ServerConfig::http(8080)).await.unwrap();
        controller.start().await.unwrap();

        // The start created the container-owned default context.
        let err = gw
            .add_whiteboard_context(whiteboard_model(DEFAULT_CONTEXT))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "ownership_conflict");

        // The incumbent was not mutated.
        let contexts = gw.context_models(ContextOwner::Container).await;
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].owner(), ContextOwner::Container);
        assert!(contexts[0].realized().is_some());
    }

    #[tokio::test]
    async fn test_whiteboard_ownership_is_exclusive() {
        let gw = gateway();
        gw.add_whiteboard_context(whiteboard_model("shop")).await.unwrap();

        let err = gw
            .add_whiteboard_context(whiteboard_model("shop"))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "ownership_conflict");
        assert_eq!(gw.context_models(ContextOwner::Whiteboard).await.len(), 1);
    }

    #[tokio::test]
    async fn test_name_resolution_prefers_whiteboard_over_container() {
        let controller = ServerController::new(Arc::new(QuietFactory));
        let gw = controller.whiteboard();

        // Whiteboard cedes "default" before the server ever starts, then the
        // start creates the container-owned context of the same name.
        gw.add_whiteboard_context(whiteboard_model(DEFAULT_CONTEXT))
            .await
            .unwrap();
        controller.configure(ServerConfig::http(8080)).await.unwrap();
        controller.start().await.unwrap();

        let model = handler_for(TargetRef::name(DEFAULT_CONTEXT));
        let id = model.id();
        gw.register_handler(model).await.unwrap();

        // One attachment, on the whiteboard context only.
        assert_eq!(gw.attached_elements(DEFAULT_CONTEXT).await, vec![id]);

        // Relinquishing the whiteboard context reattaches to the container
        // default instead of orphaning.
        gw.remove_whiteboard_context(&ContextModel::new(
            DEFAULT_CONTEXT,
            ContextOwner::Whiteboard,
        ))
        .await;
        assert_eq!(gw.attached_elements(DEFAULT_CONTEXT).await, vec![id]);
        let remaining = gw.context_models(ContextOwner::Container).await;
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_without_default_reports_orphans() {
        let controller = ServerController::new(Arc::new(QuietFactory));
        let gw = controller.whiteboard();
        let sink = EventSink::arc();
        controller.add_listener(sink.clone()).await;

        gw.add_whiteboard_context(whiteboard_model("shop")).await.unwrap();
        let model = handler_for(TargetRef::name("shop"));
        let id = model.id();
        gw.register_handler(model).await.unwrap();

        gw.remove_whiteboard_context(&ContextModel::new("shop", ContextOwner::Whiteboard))
            .await;

        assert!(gw.attached_elements("shop").await.is_empty());
        let events = sink.seen();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::ElementsOrphaned);
        assert_eq!(events[0].context.as_deref(), Some("shop"));
        assert_eq!(events[0].elements.as_deref(), Some(&[id][..]));
    }

    #[tokio::test]
    async fn test_remove_unknown_context_is_noop() {
        let controller = ServerController::new(Arc::new(QuietFactory));
        let gw = controller.whiteboard();
        let sink = EventSink::arc();
        controller.add_listener(sink.clone()).await;

        gw.remove_whiteboard_context(&ContextModel::new("ghost", ContextOwner::Whiteboard))
            .await;
        assert!(sink.seen().is_empty());
    }

    #[tokio::test]
    async fn test_context_models_filters_by_owner_and_keeps_order() {
        let gw = gateway();
        gw.add_whiteboard_context(whiteboard_model("first")).await.unwrap();
        gw.add_whiteboard_context(
            ContextModel::new("everyone", ContextOwner::Shared)
                .with_realized(Arc::new(NullContext)),
        )
        .await
        .unwrap();
        gw.add_whiteboard_context(whiteboard_model("second")).await.unwrap();

        let whiteboard: Vec<String> = gw
            .context_models(ContextOwner::Whiteboard)
            .await
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(whiteboard, ["first", "everyone", "second"]);

        // Shared contexts are visible to every owner; container sees only them.
        let container: Vec<String> = gw
            .context_models(ContextOwner::Container)
            .await
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(container, ["everyone"]);
    }
}
