//! Lifecycle core of the Herald bot.
//!
//! A run loads the configuration snapshot, builds a [`SessionClient`] over a
//! [`Platform`] transport, registers every built-in command module in every
//! configured workspace with a role [`PermissionOverlay`], attaches the
//! [`EventDispatcher`], connects, and then waits for a [`ShutdownSignal`].
//! Shutdown sets presence offline, disconnects, detaches the handlers and
//! releases everything. [`LifecycleController`] owns that sequence.
//!
//! Only configuration and connection failures are fatal. Refused command
//! registrations are collected into a [`RegistrationReport`], and handler
//! failures are caught at the dispatch boundary and reported through the
//! [`HealthReporter`].

mod bootstrap;
pub mod commands;
pub mod events;
mod health;
pub mod lifecycle;
mod process;
pub mod session;
mod telemetry;

pub use bootstrap::{
    BootstrapError, Bootstrapped, ConfigLoader, FileConfigLoader, StaticConfigLoader,
    bootstrap_with,
};
pub use commands::{
    CommandModule, CommandModuleDescriptor, CommandRegistry, PermissionOverlay,
    PermissionOverlayBuilder, RegistrationError, RegistrationReport,
};
pub use events::{Event, EventCategory, EventDispatcher, EventHandler, HandlerError, HandlerTable};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use lifecycle::{
    Collaborators, LifecycleController, LifecycleError, LifecycleState, ShutdownSignal,
};
pub use process::{Cli, run_daemon};
pub use session::{
    ConnectionError, DisconnectError, Identity, Platform, PlatformError, SessionClient,
};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
