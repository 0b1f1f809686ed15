//! BDD test world: loader, platform, reporter and controller state for step
//! functions.

use std::cell::RefCell;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::bootstrap::ConfigLoader;
use crate::commands::{self, RegistrationReport};
use crate::events::HandlerTable;
use crate::lifecycle::{Collaborators, LifecycleController, LifecycleError, ShutdownSignal};

use super::config_loader::{FailingConfigLoader, TestConfigLoader};
use super::platform::RecordingPlatform;
use super::reporter::RecordingHealthReporter;

type Controller = LifecycleController<Arc<RecordingPlatform>>;

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    loader: Arc<dyn ConfigLoader>,
    pub platform: Arc<RecordingPlatform>,
    pub reporter: Arc<RecordingHealthReporter>,
    pub shutdown: ShutdownSignal,
    controller: Option<Controller>,
    running: Option<JoinHandle<Result<(), LifecycleError>>>,
    outcome: Option<Result<(), LifecycleError>>,
    report: Option<RegistrationReport>,
}

impl TestWorld {
    /// Builds a world with a successful configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: Arc::new(TestConfigLoader),
            platform: RecordingPlatform::shared(),
            reporter: Arc::new(RecordingHealthReporter::default()),
            shutdown: ShutdownSignal::new(),
            controller: None,
            running: None,
            outcome: None,
            report: None,
        }
    }

    /// Installs a loader returning the sample snapshot.
    pub fn use_healthy_loader(&mut self) {
        self.loader = Arc::new(TestConfigLoader);
    }

    /// Installs a loader whose file lacks credentials.
    pub fn use_failing_loader(&mut self) {
        self.loader = Arc::new(FailingConfigLoader::new());
    }

    /// Runs the controller through `Running` on a background thread.
    pub fn start(&mut self) {
        let loader = Arc::clone(&self.loader);
        let platform = Arc::clone(&self.platform);
        let controller = Controller::new(self.reporter.clone(), self.shutdown.clone());
        self.running = Some(thread::spawn(move || {
            controller.run(Collaborators {
                loader: loader.as_ref(),
                platform,
                modules: commands::discover(),
                routes: HandlerTable::new(),
            })
        }));
    }

    /// Waits for the background run to finish.
    pub fn join(&mut self) {
        if let Some(handle) = self.running.take() {
            self.outcome = Some(handle.join().expect("controller thread panicked"));
        }
    }

    /// Drives the controller step by step up to `Running`.
    pub fn bring_up(&mut self) -> Result<(), LifecycleError> {
        let controller = self.controller.insert(Controller::new(
            self.reporter.clone(),
            self.shutdown.clone(),
        ));
        controller.configure(self.loader.as_ref())?;
        controller.prepare(
            Arc::clone(&self.platform),
            commands::discover(),
            HandlerTable::new(),
        )?;
        self.report = controller.registration_report().cloned();
        controller.connect().map(|_| ())
    }

    /// Runs the stepwise shutdown; the first outcome is kept.
    pub fn shut_down(&mut self) -> Result<(), String> {
        let controller = self
            .controller
            .as_mut()
            .ok_or_else(|| "controller was not brought up".to_owned())?;
        let result = controller.shutdown();
        let rejected = result.as_ref().err().map(ToString::to_string);
        self.outcome.get_or_insert(result);
        rejected.map_or(Ok(()), Err)
    }

    /// Outcome of the last run or shutdown.
    pub fn outcome(&self) -> Option<&Result<(), LifecycleError>> {
        self.outcome.as_ref()
    }

    /// Registration report captured during bring-up.
    pub fn report(&self) -> Option<&RegistrationReport> {
        self.report.as_ref()
    }

    /// Stepwise controller, when brought up.
    pub fn controller(&self) -> Option<&Controller> {
        self.controller.as_ref()
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
