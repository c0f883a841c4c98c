//! # Example: whiteboard
//!
//! Register contexts and elements dynamically through the whiteboard gateway.
//!
//! Demonstrates how to:
//! - Cede a watcher-managed context to the controller.
//! - Target contexts by logical name and by selector predicate.
//! - Observe orphan reports when a context is relinquished with elements
//!   still attached.
//!
//! ## Run
//! ```bash
//! cargo run --example whiteboard
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use webvisor::{
    ContextModel, ContextOwner, ContextRef, ElementModel, Event, Handler, HandlerModel,
    HandlerRef, Listen, Selector, ServerConfig, ServerContext, ServerController, ServerError,
    ServerFactory, ServerHandle, TargetRef,
};

struct QuietServer;

struct QuietContext;

impl ServerContext for QuietContext {}

#[async_trait]
impl ServerHandle for QuietServer {
    async fn add_connector(&mut self, _port: u16) -> Result<(), ServerError> {
        Ok(())
    }

    async fn add_default_context(&mut self) -> Result<ContextRef, ServerError> {
        Ok(Arc::new(QuietContext))
    }

    async fn start(&mut self) -> Result<(), ServerError> {
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ServerError> {
        Ok(())
    }

    async fn add_handler(&mut self, _target: &str, _h: HandlerRef) -> Result<(), ServerError> {
        Ok(())
    }
}

struct QuietFactory;

impl ServerFactory for QuietFactory {
    fn create_server(&self) -> Result<Box<dyn ServerHandle>, ServerError> {
        Ok(Box::new(QuietServer))
    }
}

struct ShopHandler;

impl Handler for ShopHandler {
    fn name(&self) -> &str {
        "shop"
    }
}

struct NotificationPrinter;

#[async_trait]
impl Listen for NotificationPrinter {
    async fn on_event(&self, event: &Event) {
        println!("event #{}: {:?} context={:?}", event.seq, event.kind, event.context);
    }

    fn name(&self) -> &'static str {
        "notification-printer"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) Bring the server up
    let controller = ServerController::new(Arc::new(QuietFactory));
    controller.add_listener(Arc::new(NotificationPrinter)).await;
    controller.configure(ServerConfig::http(8080)).await?;
    controller.start().await?;

    let gateway = controller.whiteboard();

    // 2) A watcher cedes two of its contexts to the controller
    gateway
        .add_whiteboard_context(
            ContextModel::new("shop", ContextOwner::Whiteboard)
                .with_attribute("env", "prod")
                .with_realized(Arc::new(QuietContext)),
        )
        .await?;
    gateway
        .add_whiteboard_context(
            ContextModel::new("cart", ContextOwner::Whiteboard)
                .with_attribute("env", "prod")
                .with_realized(Arc::new(QuietContext)),
        )
        .await?;

    // 3) One registration, two contexts: the selector fans out
    let handler = HandlerModel::new(
        ElementModel::new()
            .with_pattern("/shop/*")
            .with_target(TargetRef::selector(Selector::new().with("env", "prod"))),
        Arc::new(ShopHandler),
    );
    gateway.register_handler(handler).await?;

    for context in gateway.context_models(ContextOwner::Whiteboard).await {
        println!(
            "context '{}' carries {} element(s)",
            context.name(),
            gateway.attached_elements(context.name()).await.len()
        );
    }

    // 4) Relinquish "shop" while its handler is still attached. There is no
    //    container-owned "shop" to fall back to, so the handler is reported
    //    as orphaned through the listener channel.
    gateway
        .remove_whiteboard_context(&ContextModel::new("shop", ContextOwner::Whiteboard))
        .await;

    controller.stop().await?;
    Ok(())
}
