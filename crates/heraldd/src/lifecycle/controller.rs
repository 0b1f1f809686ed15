//! Ordered startup, idle wait and coordinated shutdown.

use std::sync::Arc;
use std::thread;

use herald_config::Config;
use tracing::{info, warn};

use crate::bootstrap::{ConfigLoader, bootstrap_with};
use crate::commands::{CommandModuleDescriptor, CommandRegistry, RegistrationReport};
use crate::events::{EventDispatcher, HandlerTable};
use crate::health::HealthReporter;
use crate::session::{Identity, Platform, Presence, SessionClient};

use super::LIFECYCLE_TARGET;
use super::error::LifecycleError;
use super::shutdown::ShutdownSignal;
use super::state::LifecycleState;

/// Everything [`LifecycleController::run`] needs from the outside.
pub struct Collaborators<'a, P> {
    /// Source of the configuration snapshot.
    pub loader: &'a dyn ConfigLoader,
    /// Platform transport handed to the session client.
    pub platform: P,
    /// Command modules to register.
    pub modules: Vec<CommandModuleDescriptor>,
    /// Handlers to attach.
    pub routes: HandlerTable,
}

struct Resources<P> {
    session: SessionClient<P>,
    registry: CommandRegistry,
    dispatcher: EventDispatcher,
}

/// Drives the process from configuration load to disposal.
///
/// Each step checks the current [`LifecycleState`] and fails with
/// [`LifecycleError::InvalidTransition`] when invoked out of order. A fatal
/// failure releases whatever was built and leaves the controller `Disposed`.
pub struct LifecycleController<P> {
    state: LifecycleState,
    reporter: Arc<dyn HealthReporter>,
    shutdown: ShutdownSignal,
    config: Option<Arc<Config>>,
    resources: Option<Resources<P>>,
}

impl<P> LifecycleController<P> {
    /// Builds a controller in the `Created` state.
    pub fn new(reporter: Arc<dyn HealthReporter>, shutdown: ShutdownSignal) -> Self {
        Self {
            state: LifecycleState::Created,
            reporter,
            shutdown,
            config: None,
            resources: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Loaded snapshot, available from `Configuring` until disposal.
    pub fn config(&self) -> Option<&Arc<Config>> {
        self.config.as_ref()
    }

    /// Session client, available from `Connecting` until disposal.
    pub fn session(&self) -> Option<&SessionClient<P>> {
        self.resources.as_ref().map(|resources| &resources.session)
    }

    /// Registration outcome, available from `Connecting` until disposal.
    pub fn registration_report(&self) -> Option<&RegistrationReport> {
        self.resources
            .as_ref()
            .and_then(|resources| resources.registry.report())
    }

    /// `Created -> Configuring`: loads the snapshot and installs telemetry.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Bootstrap`] when either step fails; the
    /// controller is then `Disposed`.
    pub fn configure(&mut self, loader: &dyn ConfigLoader) -> Result<Arc<Config>, LifecycleError> {
        self.expect_state(LifecycleState::Created, LifecycleState::Configuring)?;
        self.transition(LifecycleState::Configuring);
        match bootstrap_with(loader, self.reporter.as_ref()) {
            Ok(bootstrapped) => {
                self.config = Some(Arc::clone(&bootstrapped.config));
                Ok(bootstrapped.config)
            }
            Err(error) => {
                self.dispose();
                Err(error.into())
            }
        }
    }

    fn expect_state(
        &self,
        expected: LifecycleState,
        next: LifecycleState,
    ) -> Result<(), LifecycleError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: next,
            })
        }
    }

    fn transition(&mut self, to: LifecycleState) {
        let from = self.state;
        self.state = to;
        self.reporter.state_changed(from, to);
    }

    fn loaded_config(&self, next: LifecycleState) -> Result<Arc<Config>, LifecycleError> {
        self.config.clone().ok_or(LifecycleError::InvalidTransition {
            from: self.state,
            to: next,
        })
    }

    fn dispose(&mut self) {
        if let Some(mut resources) = self.resources.take() {
            resources.dispatcher.detach(&resources.session);
        }
        self.config = None;
        self.transition(LifecycleState::Disposed);
    }
}

impl<P> LifecycleController<P>
where
    P: Platform,
{
    /// `Configuring -> Connecting`: builds the session, registers every
    /// command module in every configured workspace and attaches `routes`.
    ///
    /// Refused registrations are reported and recorded, never fatal; see
    /// [`Self::registration_report`].
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] out of order.
    pub fn prepare(
        &mut self,
        platform: P,
        modules: Vec<CommandModuleDescriptor>,
        routes: HandlerTable,
    ) -> Result<(), LifecycleError> {
        self.expect_state(LifecycleState::Configuring, LifecycleState::Connecting)?;
        let config = self.loaded_config(LifecycleState::Connecting)?;

        let session = SessionClient::new(platform, Arc::clone(&config));
        let mut registry = CommandRegistry::new(modules);
        let report = registry.register_all(&session, &config);
        for failure in report.failures() {
            self.reporter.registration_failed(failure);
        }
        self.reporter.registration_completed(report);

        let dispatcher = EventDispatcher::attach(&routes, Arc::clone(&self.reporter), &session);

        self.resources = Some(Resources {
            session,
            registry,
            dispatcher,
        });
        self.transition(LifecycleState::Connecting);
        Ok(())
    }

    /// `Connecting -> Running`: opens the session and applies the configured
    /// presence. No retry is attempted here.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Connection`] when the platform refuses the
    /// session; the dispatcher is detached and the controller is `Disposed`.
    pub fn connect(&mut self) -> Result<Identity, LifecycleError> {
        self.expect_state(LifecycleState::Connecting, LifecycleState::Running)?;
        let config = self.loaded_config(LifecycleState::Running)?;
        let Some(resources) = self.resources.as_ref() else {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to: LifecycleState::Running,
            });
        };

        match resources.session.connect() {
            Ok(identity) => {
                resources
                    .session
                    .update_presence(&Presence::from(&config.presence));
                self.reporter.session_ready(&identity, config.prefix());
                self.transition(LifecycleState::Running);
                Ok(identity)
            }
            Err(error) => {
                self.dispose();
                Err(error.into())
            }
        }
    }

    /// Blocks in `Running` until the shutdown signal is observed.
    ///
    /// The signal is checked once per configured poll interval.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] outside `Running`.
    pub fn wait_for_shutdown(&self) -> Result<(), LifecycleError> {
        self.expect_state(LifecycleState::Running, LifecycleState::Disconnecting)?;
        let interval = self
            .loaded_config(LifecycleState::Disconnecting)?
            .poll_interval();
        while !self.shutdown.is_triggered() {
            thread::sleep(interval);
        }
        Ok(())
    }

    /// `Running -> Disconnecting -> Disposed`.
    ///
    /// Sets presence offline, disconnects the session, detaches the
    /// dispatcher and releases every owned resource. Handlers already running
    /// may still be executing when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] outside `Running`, which
    /// includes every call after the first successful one.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        self.expect_state(LifecycleState::Running, LifecycleState::Disconnecting)?;
        self.transition(LifecycleState::Disconnecting);

        if let Some(resources) = self.resources.as_ref() {
            resources.session.update_presence(&Presence::offline());
            if let Err(error) = resources.session.disconnect() {
                warn!(
                    target: LIFECYCLE_TARGET,
                    error = %error,
                    "session reported an error while disconnecting"
                );
            }
            info!(
                target: LIFECYCLE_TARGET,
                in_flight = resources.dispatcher.in_flight(),
                "session disconnected; releasing resources"
            );
        }

        self.dispose();
        Ok(())
    }

    /// Runs every step in order and consumes the controller.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`LifecycleError`].
    pub fn run(mut self, collaborators: Collaborators<'_, P>) -> Result<(), LifecycleError> {
        let Collaborators {
            loader,
            platform,
            modules,
            routes,
        } = collaborators;
        self.configure(loader)?;
        self.prepare(platform, modules, routes)?;
        self.connect()?;
        self.wait_for_shutdown()?;
        self.shutdown()
    }
}

impl<P> std::fmt::Debug for LifecycleController<P> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LifecycleController")
            .field("state", &self.state)
            .field("shutdown", &self.shutdown.is_triggered())
            .field("configured", &self.config.is_some())
            .finish_non_exhaustive()
    }
}
