//! # Example: lifecycle
//!
//! Drive a fake embeddable server through its full lifecycle.
//!
//! Demonstrates how to:
//! - Plug a server implementation in behind `ServerFactory`/`ServerHandle`.
//! - Observe transitions with a custom `Listen` implementation.
//! - Reconfigure a running server (stop/start cycle, no Configured event).
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► configure(http:8080)     → Configured
//!   ├─► start()                  → Started   (connector + default context)
//!   ├─► add_handler("/hello")    → forwarded to the running handle
//!   ├─► configure(http:9090)     → Stopped, Started (server rebuilt)
//!   └─► stop()                   → Stopped
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example lifecycle
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use webvisor::{
    ContextRef, Event, Handler, HandlerRef, Listen, ServerConfig, ServerContext, ServerController,
    ServerError, ServerFactory, ServerHandle,
};

/// A stand-in for a real embedded server: prints what it is asked to do.
struct PrintingServer;

struct PrintingContext;

impl ServerContext for PrintingContext {}

#[async_trait]
impl ServerHandle for PrintingServer {
    async fn add_connector(&mut self, port: u16) -> Result<(), ServerError> {
        println!("  (server) connector on :{port}");
        Ok(())
    }

    async fn add_default_context(&mut self) -> Result<ContextRef, ServerError> {
        println!("  (server) default context created");
        Ok(Arc::new(PrintingContext))
    }

    async fn start(&mut self) -> Result<(), ServerError> {
        println!("  (server) accepting connections");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), ServerError> {
        println!("  (server) shut down");
        Ok(())
    }

    async fn add_handler(&mut self, target: &str, handler: HandlerRef) -> Result<(), ServerError> {
        println!("  (server) handler '{}' mounted at {target}", handler.name());
        Ok(())
    }
}

struct PrintingFactory;

impl ServerFactory for PrintingFactory {
    fn create_server(&self) -> Result<Box<dyn ServerHandle>, ServerError> {
        println!("  (server) fresh instance built");
        Ok(Box::new(PrintingServer))
    }
}

struct HelloHandler;

impl Handler for HelloHandler {
    fn name(&self) -> &str {
        "hello"
    }
}

/// Prints every lifecycle event as it is delivered.
struct EventPrinter;

#[async_trait]
impl Listen for EventPrinter {
    async fn on_event(&self, event: &Event) {
        println!("event #{}: {:?}", event.seq, event.kind);
    }

    fn name(&self) -> &'static str {
        "event-printer"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) Build the controller around the server factory
    let controller = ServerController::new(Arc::new(PrintingFactory));
    controller.add_listener(Arc::new(EventPrinter)).await;

    // 2) Configure and start
    controller.configure(ServerConfig::http(8080)).await?;
    controller.start().await?;

    // 3) Register a handler on the running server
    controller.add_handler("/hello", Arc::new(HelloHandler)).await?;

    // 4) Reconfigure in place: the server is rebuilt on the new port.
    //    Watch the events: Stopped then Started, no Configured.
    controller.configure(ServerConfig::http(9090)).await?;

    // 5) Shut down
    controller.stop().await?;
    Ok(())
}
