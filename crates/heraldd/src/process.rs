//! Process entry: command-line parsing and production wiring.

use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use herald_config::DEFAULT_CONFIG_PATH;
use tracing::info;

use crate::bootstrap::{ConfigLoader, FileConfigLoader};
use crate::commands;
use crate::events::{self, HandlerTable};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::lifecycle::{Collaborators, LifecycleController, LifecycleError, ShutdownSignal};
use crate::session::{OfflinePlatform, Platform};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Command-line arguments accepted by `heraldd`.
#[derive(Debug, Clone, Parser)]
#[command(name = "heraldd", version, about = "Runs the Herald bot session")]
pub struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, env = "HERALD_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: Utf8PathBuf,

    /// Overrides the configured log filter.
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    /// Builds the configuration loader described by the arguments.
    #[must_use]
    pub fn loader(&self) -> FileConfigLoader {
        let loader = FileConfigLoader::new(self.config.clone());
        match &self.log_filter {
            Some(filter) => loader.with_log_filter(filter.clone()),
            None => loader,
        }
    }
}

/// Runs the bot with production collaborators until a termination signal.
///
/// # Errors
///
/// Returns the fatal [`LifecycleError`] that stopped startup.
pub fn run_daemon(cli: &Cli) -> Result<(), LifecycleError> {
    let shutdown = ShutdownSignal::new();
    shutdown.register_os_signals()?;
    run_daemon_with(
        &cli.loader(),
        Arc::new(StructuredHealthReporter::new()),
        OfflinePlatform,
        events::default_routes(),
        shutdown,
    )
}

/// Runs the bot with injected collaborators.
pub(crate) fn run_daemon_with<P>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    platform: P,
    routes: HandlerTable,
    shutdown: ShutdownSignal,
) -> Result<(), LifecycleError>
where
    P: Platform,
{
    let controller = LifecycleController::new(reporter, shutdown);
    controller.run(Collaborators {
        loader,
        platform,
        modules: commands::discover(),
        routes,
    })?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
