//! Session and presence settings handed to the platform transport.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::defaults::DEFAULT_MESSAGE_CACHE_SIZE;

/// Transport-level options for the platform session.
///
/// Reconnection and caching are owned by the platform transport; the core
/// only forwards these values when connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionOptions {
    /// Whether the transport may transparently resume a dropped connection.
    pub auto_reconnect: bool,
    /// Number of inbound messages the transport keeps cached.
    pub message_cache_size: u32,
    /// Shard served by this process.
    pub shard_id: u32,
    /// Total shard count for the application.
    pub shard_count: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            message_cache_size: DEFAULT_MESSAGE_CACHE_SIZE,
            shard_id: 0,
            shard_count: 1,
        }
    }
}

/// Presence status advertised to the platform.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OnlineStatus {
    /// Available.
    #[default]
    Online,
    /// Away.
    Idle,
    /// Available but not accepting notifications.
    DoNotDisturb,
    /// Connected but shown as offline.
    Invisible,
    /// Not connected.
    Offline,
}

/// Presence applied once the session is connected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresenceSettings {
    /// Status shown while running.
    pub online_status: OnlineStatus,
    /// Optional activity text shown next to the status.
    pub activity: Option<String>,
}
