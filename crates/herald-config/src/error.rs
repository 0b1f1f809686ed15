//! Errors raised while loading the configuration snapshot.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Failure to produce a [`crate::Config`] from a configuration file.
///
/// Every variant is fatal and occurs before any network activity. IO and JSON
/// errors are wrapped in `Arc` so the error stays cheap to clone.
#[derive(Debug, Clone, Error)]
pub enum ConfigLoadError {
    /// The configuration file does not exist.
    #[error("configuration file '{path}' does not exist")]
    Missing {
        /// Path that was read.
        path: Utf8PathBuf,
    },
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: Arc<io::Error>,
    },
    /// The document is not valid JSON or lacks required fields.
    #[error("failed to parse configuration file '{path}': {source}")]
    Parse {
        /// Path the document came from.
        path: Utf8PathBuf,
        /// Underlying deserialisation error.
        #[source]
        source: Arc<serde_json::Error>,
    },
    /// The document parsed but violates a structural rule.
    #[error("invalid configuration in '{path}': {reason}")]
    Invalid {
        /// Path the document came from.
        path: Utf8PathBuf,
        /// Human-readable description of the violated rule.
        reason: String,
    },
}

impl ConfigLoadError {
    pub(crate) fn from_io(path: Utf8PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::Missing { path }
        } else {
            Self::Read {
                path,
                source: Arc::new(source),
            }
        }
    }

    /// Path of the configuration document that failed to load.
    #[must_use]
    pub fn path(&self) -> &camino::Utf8Path {
        match self {
            Self::Missing { path }
            | Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Invalid { path, .. } => path.as_path(),
        }
    }
}
