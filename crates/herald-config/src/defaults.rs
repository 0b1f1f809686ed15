//! Default values applied to optional configuration fields.

use std::time::Duration;

use crate::logging::LogFormat;

/// Configuration file read when no path is supplied.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Interval between shutdown checks while the session is running.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Number of messages the platform session keeps cached.
pub const DEFAULT_MESSAGE_CACHE_SIZE: u32 = 2048;

/// Log filter applied when the file does not set one.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default shutdown poll interval in milliseconds, as stored in the file.
#[must_use]
pub fn default_poll_interval_ms() -> u64 {
    u64::try_from(DEFAULT_POLL_INTERVAL.as_millis()).unwrap_or(u64::MAX)
}
