//! # Simple logging listener for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [configured]
//! [started]
//! [stopped]
//! [orphaned] context=app elements=2
//! [listener-panicked] listener=metrics err="boom"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::listeners::Listen;

/// Simple stdout logging listener.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Listen`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Listen for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Configured => println!("[configured]"),
            EventKind::Started => println!("[started]"),
            EventKind::Stopped => println!("[stopped]"),
            EventKind::ElementsOrphaned => {
                println!(
                    "[orphaned] context={} elements={}",
                    e.context.as_deref().unwrap_or("?"),
                    e.elements.as_ref().map(Vec::len).unwrap_or(0)
                );
            }
            EventKind::ListenerPanicked => {
                println!(
                    "[listener-panicked] listener={} err={:?}",
                    e.context.as_deref().unwrap_or("?"),
                    e.reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
