//! Configuration loading and telemetry bootstrap.

use std::sync::Arc;

use camino::Utf8PathBuf;
use herald_config::{Config, ConfigLoadError};
use thiserror::Error;

use crate::health::HealthReporter;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the configuration snapshot.
    fn load(&self) -> Result<Config, ConfigLoadError>;
}

/// Loader that reads a JSON file, optionally overriding the log filter.
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    path: Utf8PathBuf,
    log_filter: Option<String>,
}

impl FileConfigLoader {
    /// Builds a loader for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            log_filter: None,
        }
    }

    /// Replaces the file's log filter with `filter`.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Path of the configuration file.
    #[must_use]
    pub fn path(&self) -> &camino::Utf8Path {
        self.path.as_path()
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(&self) -> Result<Config, ConfigLoadError> {
        let mut config = Config::load(&self.path)?;
        if let Some(filter) = &self.log_filter {
            config.log_filter.clone_from(filter);
        }
        Ok(config)
    }
}

/// Loader that returns a pre-built snapshot.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Builds a loader around `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, ConfigLoadError> {
        self.config
            .validate()
            .map_err(|reason| ConfigLoadError::Invalid {
                path: Utf8PathBuf::from("<static>"),
                reason,
            })?;
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: ConfigLoadError,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Result of a successful bootstrap.
#[derive(Debug, Clone)]
pub struct Bootstrapped {
    /// Loaded snapshot, shared read-only from here on.
    pub config: Arc<Config>,
    /// Telemetry handle.
    pub telemetry: TelemetryHandle,
}

/// Loads configuration and initialises telemetry.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: &dyn HealthReporter,
) -> Result<Bootstrapped, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    reporter.bootstrap_succeeded(&config);
    Ok(Bootstrapped {
        config: Arc::new(config),
        telemetry,
    })
}
