//! Inbound event routing.
//!
//! Handlers are registered in a [`HandlerTable`] keyed by [`EventCategory`].
//! The [`EventDispatcher`] subscribes one route per table entry on the
//! session; every routed event runs on its own thread so a slow or failing
//! handler never holds up the platform's delivery path. Handler failures and
//! panics are caught at that boundary and reported through the
//! [`HealthReporter`](crate::HealthReporter).

mod category;
mod dispatcher;
mod handler;
mod handlers;

pub use category::{Event, EventCategory};
pub use dispatcher::EventDispatcher;
pub use handler::{EventHandler, HandlerError, HandlerTable};
pub use handlers::{MessageLogHandler, default_routes};

const EVENTS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::events");
