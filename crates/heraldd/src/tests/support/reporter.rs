//! Test double for [`HealthReporter`] that records structured events for
//! assertions.

use std::sync::Mutex;

use herald_config::{Config, WorkspaceId};

use crate::bootstrap::BootstrapError;
use crate::commands::{RegistrationError, RegistrationReport};
use crate::events::{Event, EventCategory, HandlerError};
use crate::health::HealthReporter;
use crate::lifecycle::LifecycleState;
use crate::session::Identity;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    StateChanged {
        from: LifecycleState,
        to: LifecycleState,
    },
    SessionReady {
        identity: String,
        prefix: String,
    },
    RegistrationFailed {
        module: &'static str,
        workspace: WorkspaceId,
    },
    RegistrationCompleted {
        attempted: usize,
        failed: usize,
    },
    HandlerFailed {
        category: EventCategory,
        message: String,
    },
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    /// States entered, in order.
    #[must_use]
    pub fn states(&self) -> Vec<LifecycleState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HealthEvent::StateChanged { to, .. } => Some(to),
                _ => None,
            })
            .collect()
    }

    /// Handler failures, in order.
    #[must_use]
    pub fn handler_failures(&self) -> Vec<(EventCategory, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HealthEvent::HandlerFailed { category, message } => Some((category, message)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn state_changed(&self, from: LifecycleState, to: LifecycleState) {
        self.record(HealthEvent::StateChanged { from, to });
    }

    fn session_ready(&self, identity: &Identity, prefix: &str) {
        self.record(HealthEvent::SessionReady {
            identity: identity.to_string(),
            prefix: prefix.to_owned(),
        });
    }

    fn registration_failed(&self, error: &RegistrationError) {
        self.record(HealthEvent::RegistrationFailed {
            module: error.module,
            workspace: error.workspace,
        });
    }

    fn registration_completed(&self, report: &RegistrationReport) {
        self.record(HealthEvent::RegistrationCompleted {
            attempted: report.attempted(),
            failed: report.failures().len(),
        });
    }

    fn handler_failed(&self, error: &HandlerError, _event: &Event) {
        self.record(HealthEvent::HandlerFailed {
            category: error.category(),
            message: error.to_string(),
        });
    }
}
