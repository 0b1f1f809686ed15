//! Handlers attached by the production binary.

use std::sync::Arc;

use tracing::info;

use super::category::{Event, EventCategory};
use super::handler::{EventHandler, HandlerError, HandlerTable};

const MESSAGE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::events::message");

/// Logs metadata of every inbound message.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageLogHandler;

impl EventHandler for MessageLogHandler {
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        let author = event
            .payload
            .get("author")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");
        let channel = event
            .payload
            .get("channel_id")
            .and_then(serde_json::Value::as_u64);
        info!(
            target: MESSAGE_TARGET,
            workspace = ?event.workspace.map(|id| id.get()),
            channel = ?channel,
            author,
            "message received"
        );
        Ok(())
    }
}

/// Routing table used by the `heraldd` binary.
#[must_use]
pub fn default_routes() -> HandlerTable {
    HandlerTable::new().route(EventCategory::MessageCreated, Arc::new(MessageLogHandler))
}
