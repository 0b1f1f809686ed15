//! Lifecycle controller for one bot process run.
//!
//! The controller walks `Created -> Configuring -> Connecting -> Running ->
//! Disconnecting -> Disposed` exactly once. The `Running` wait loop is the
//! only place it blocks; inbound events are handled on threads owned by the
//! platform and the dispatcher.

mod controller;
mod error;
mod shutdown;
mod state;

pub use controller::{Collaborators, LifecycleController};
pub use error::LifecycleError;
pub use shutdown::{ShutdownError, ShutdownSignal};
pub use state::LifecycleState;

const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");
