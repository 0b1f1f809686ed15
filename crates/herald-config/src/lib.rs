//! Configuration snapshot shared by the Herald binaries.
//!
//! The snapshot is read once at startup from a JSON document and never
//! mutated afterwards. It carries the platform credentials, the default
//! command prefix, and the named role sets that scope command registration
//! to individual workspaces:
//!
//! ```json
//! {
//!   "credentials": { "token": "..." },
//!   "prefix": "!",
//!   "workspaces": {
//!     "support": { "workspace_id": 1, "role_ids": [10, 11] }
//!   }
//! }
//! ```
//!
//! Session, presence, polling and logging settings are optional and fall back
//! to the values in [`defaults`].

pub mod defaults;
mod error;
mod ids;
mod logging;
mod session;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::time::Duration;

use camino::Utf8Path;
use serde::Deserialize;

pub use defaults::{
    DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER, DEFAULT_POLL_INTERVAL,
    default_log_format,
};
pub use error::ConfigLoadError;
pub use ids::{RoleId, WorkspaceId};
pub use logging::LogFormat;
pub use session::{OnlineStatus, PresenceSettings, SessionOptions};

/// Credentials used to authenticate the platform session.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    /// Bot token presented to the platform.
    pub token: String,
}

impl Credentials {
    /// Wraps a bot token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Workspace targeted by one named role set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceEntry {
    /// Workspace the role set applies to.
    pub workspace_id: WorkspaceId,
    /// Roles granted access to registered commands, in declaration order.
    pub role_ids: Vec<RoleId>,
}

impl WorkspaceEntry {
    /// Builds an entry from a workspace and its roles.
    #[must_use]
    pub fn new(workspace_id: WorkspaceId, role_ids: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            workspace_id,
            role_ids: role_ids.into_iter().collect(),
        }
    }
}

/// Borrowed view of one named workspace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet<'a> {
    /// Name of the entry in the configuration mapping.
    pub name: &'a str,
    /// Workspace the roles belong to.
    pub workspace_id: WorkspaceId,
    /// Roles to mark as allowed.
    pub role_ids: &'a [RoleId],
}

/// Immutable configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Platform credentials.
    pub credentials: Credentials,
    /// Default command prefix.
    pub prefix: String,
    /// Named role sets keyed by entry name.
    pub workspaces: BTreeMap<String, WorkspaceEntry>,
    /// Transport options forwarded on connect.
    #[serde(default)]
    pub session: SessionOptions,
    /// Presence shown while running.
    #[serde(default)]
    pub presence: PresenceSettings,
    /// Milliseconds between shutdown checks while running.
    #[serde(default = "defaults::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Log filter expression understood by `tracing-subscriber`.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
}

impl Config {
    /// Builds a snapshot with default optional settings.
    #[must_use]
    pub fn new(
        credentials: Credentials,
        prefix: impl Into<String>,
        workspaces: BTreeMap<String, WorkspaceEntry>,
    ) -> Self {
        Self {
            credentials,
            prefix: prefix.into(),
            workspaces,
            session: SessionOptions::default(),
            presence: PresenceSettings::default(),
            poll_interval_ms: defaults::default_poll_interval_ms(),
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
        }
    }

    /// Reads and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError`] when the file is missing or unreadable,
    /// is not a valid document, or fails structural validation.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self, ConfigLoadError> {
        let file = path.as_ref();
        let text = fs::read_to_string(file)
            .map_err(|source| ConfigLoadError::from_io(file.to_path_buf(), source))?;
        Self::from_json_str(&text, file)
    }

    /// Parses and validates a configuration document.
    ///
    /// `origin` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::Parse`] for malformed documents and
    /// [`ConfigLoadError::Invalid`] for structural violations.
    pub fn from_json_str(text: &str, origin: &Utf8Path) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_json::from_str(text).map_err(|source| ConfigLoadError::Parse {
                path: origin.to_path_buf(),
                source: source.into(),
            })?;
        config
            .validate()
            .map_err(|reason| ConfigLoadError::Invalid {
                path: origin.to_path_buf(),
                reason,
            })?;
        Ok(config)
    }

    /// Checks the structural rules the deserialiser cannot express.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.credentials.token.trim().is_empty() {
            return Err("credentials.token must not be blank".to_owned());
        }
        if self.prefix.trim().is_empty() {
            return Err("prefix must not be blank".to_owned());
        }
        if self.workspaces.is_empty() {
            return Err("at least one workspace entry is required".to_owned());
        }
        let mut claimed = HashMap::with_capacity(self.workspaces.len());
        for (name, entry) in &self.workspaces {
            if let Some(previous) = claimed.insert(entry.workspace_id, name.as_str()) {
                return Err(format!(
                    "workspace entries '{previous}' and '{name}' share workspace {}",
                    entry.workspace_id
                ));
            }
            let mut seen = HashSet::with_capacity(entry.role_ids.len());
            if let Some(duplicate) = entry.role_ids.iter().find(|role| !seen.insert(**role)) {
                return Err(format!(
                    "workspace entry '{name}' lists role {duplicate} more than once"
                ));
            }
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be greater than zero".to_owned());
        }
        if self.session.shard_id >= self.session.shard_count {
            return Err(format!(
                "session.shard_id {} must be below session.shard_count {}",
                self.session.shard_id, self.session.shard_count
            ));
        }
        Ok(())
    }

    /// Iterates the named role sets in entry-name order.
    pub fn role_sets(&self) -> impl ExactSizeIterator<Item = RoleSet<'_>> {
        self.workspaces.iter().map(|(name, entry)| RoleSet {
            name: name.as_str(),
            workspace_id: entry.workspace_id,
            role_ids: entry.role_ids.as_slice(),
        })
    }

    /// Platform credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Default command prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// Interval between shutdown checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
