//! Set-once shutdown flag shared across threads.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use thiserror::Error;
use tracing::info;

use super::LIFECYCLE_TARGET;

const SHUTDOWN_SIGNALS: [i32; 4] = [SIGTERM, SIGINT, SIGQUIT, SIGHUP];

/// Errors reported while wiring shutdown sources.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install handler for signal {signal}: {source}")]
    Install {
        /// Signal number that could not be hooked.
        signal: i32,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// One-shot shutdown request observed by the lifecycle wait loop.
///
/// Clones share the same flag. Once triggered it stays triggered.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Builds an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Returns `true` for the call that set the flag.
    pub fn trigger(&self) -> bool {
        let first = !self.flag.swap(true, Ordering::AcqRel);
        if first {
            info!(target: LIFECYCLE_TARGET, "shutdown requested");
        }
        first
    }

    /// Returns `true` once shutdown has been requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Sets the flag when SIGTERM, SIGINT, SIGQUIT or SIGHUP arrives.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::Install`] when a handler cannot be installed.
    pub fn register_os_signals(&self) -> Result<(), ShutdownError> {
        for signal in SHUTDOWN_SIGNALS {
            signal_hook::flag::register(signal, Arc::clone(&self.flag))
                .map_err(|source| ShutdownError::Install { signal, source })?;
        }
        Ok(())
    }
}
