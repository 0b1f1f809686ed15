//! Handler logic invoked for routed events.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use super::category::{Event, EventCategory};

/// Failure of a single handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error("handler for {category} failed: {message}")]
    Failed {
        /// Category of the event being handled.
        category: EventCategory,
        /// Handler-supplied description.
        message: String,
    },
    /// The handler panicked.
    #[error("handler for {category} panicked: {message}")]
    Panicked {
        /// Category of the event being handled.
        category: EventCategory,
        /// Panic payload rendered as text.
        message: String,
    },
}

impl HandlerError {
    /// Builds a [`HandlerError::Failed`].
    #[must_use]
    pub fn failed(category: EventCategory, message: impl Into<String>) -> Self {
        Self::Failed {
            category,
            message: message.into(),
        }
    }

    /// Category of the event the handler was processing.
    #[must_use]
    pub fn category(&self) -> EventCategory {
        match self {
            Self::Failed { category, .. } | Self::Panicked { category, .. } => *category,
        }
    }
}

/// Handler logic for one event category.
pub trait EventHandler: Send + Sync {
    /// Processes one event.
    fn handle(&self, event: &Event) -> Result<(), HandlerError>;
}

impl<F> EventHandler for F
where
    F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self(event)
    }
}

/// Routing table mapping each category to a stable handler reference.
#[derive(Clone, Default)]
pub struct HandlerTable {
    routes: BTreeMap<EventCategory, Arc<dyn EventHandler>>,
}

impl HandlerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes `category` to `handler`, replacing any previous route.
    #[must_use]
    pub fn route(mut self, category: EventCategory, handler: Arc<dyn EventHandler>) -> Self {
        self.routes.insert(category, handler);
        self
    }

    /// Categories with a route, in category order.
    pub fn categories(&self) -> impl Iterator<Item = EventCategory> + '_ {
        self.routes.keys().copied()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (EventCategory, &Arc<dyn EventHandler>)> {
        self.routes
            .iter()
            .map(|(category, handler)| (*category, handler))
    }

    /// Number of routed categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` when no category is routed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_set()
            .entries(self.routes.keys())
            .finish()
    }
}
