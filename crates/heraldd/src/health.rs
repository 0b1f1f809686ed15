//! Structured health reporting for lifecycle events.

use std::sync::Arc;

use herald_config::Config;

use crate::bootstrap::BootstrapError;
use crate::commands::{RegistrationError, RegistrationReport};
use crate::events::{Event, HandlerError};
use crate::lifecycle::LifecycleState;
use crate::session::Identity;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked on every lifecycle state transition.
    fn state_changed(&self, from: LifecycleState, to: LifecycleState);

    /// Invoked once the session is connected.
    fn session_ready(&self, identity: &Identity, prefix: &str);

    /// Invoked for each refused command registration.
    fn registration_failed(&self, error: &RegistrationError);

    /// Invoked after every registration has been attempted.
    fn registration_completed(&self, report: &RegistrationReport);

    /// Invoked when a handler fails or panics.
    fn handler_failed(&self, error: &HandlerError, event: &Event);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn state_changed(&self, from: LifecycleState, to: LifecycleState) {
        (**self).state_changed(from, to);
    }

    fn session_ready(&self, identity: &Identity, prefix: &str) {
        (**self).session_ready(identity, prefix);
    }

    fn registration_failed(&self, error: &RegistrationError) {
        (**self).registration_failed(error);
    }

    fn registration_completed(&self, report: &RegistrationReport) {
        (**self).registration_completed(report);
    }

    fn handler_failed(&self, error: &HandlerError, event: &Event) {
        (**self).handler_failed(error, event);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "loading configuration"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            workspaces = config.workspaces.len(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            poll_interval_ms = config.poll_interval_ms,
            "configuration loaded"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "bootstrap failed"
        );
    }

    fn state_changed(&self, from: LifecycleState, to: LifecycleState) {
        tracing::debug!(
            target: HEALTH_TARGET,
            event = "state_changed",
            %from,
            %to,
            "lifecycle state changed"
        );
    }

    fn session_ready(&self, identity: &Identity, prefix: &str) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "session_ready",
            identity = %identity,
            identity_id = identity.id,
            prefix,
            "Logged in as {identity} with prefix {prefix}"
        );
    }

    fn registration_failed(&self, error: &RegistrationError) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "registration_failed",
            module = error.module,
            workspace = %error.workspace,
            role_set = %error.role_set,
            error = %error.source,
            "command registration failed"
        );
    }

    fn registration_completed(&self, report: &RegistrationReport) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "registration_completed",
            attempted = report.attempted(),
            registered = report.registered().len(),
            failed = report.failures().len(),
            "command registration completed"
        );
    }

    fn handler_failed(&self, error: &HandlerError, event: &Event) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "handler_failed",
            category = %error.category(),
            workspace = ?event.workspace.map(|id| id.get()),
            error = %error,
            "event handler failed"
        );
    }
}
