//! Seam between the session client and the external messaging platform.
//!
//! The wire protocol lives behind [`Platform`]; the session client only
//! decides when each call is made and what it carries.

use std::fmt;
use std::sync::Arc;

use herald_config::{Credentials, OnlineStatus, PresenceSettings, SessionOptions, WorkspaceId};
use thiserror::Error;

use crate::commands::{CommandModuleDescriptor, PermissionOverlay};

use super::inbound::InboundEvents;

/// Account the platform authenticated the session as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Platform user id.
    pub id: u64,
    /// Display name including any discriminator.
    pub username: String,
}

impl Identity {
    /// Builds an identity.
    #[must_use]
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.username)
    }
}

/// Presence advertised for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    /// Status indicator.
    pub status: OnlineStatus,
    /// Optional activity text.
    pub activity: Option<String>,
}

impl Presence {
    /// Presence used while disconnecting.
    #[must_use]
    pub const fn offline() -> Self {
        Self {
            status: OnlineStatus::Offline,
            activity: None,
        }
    }
}

impl From<&PresenceSettings> for Presence {
    fn from(settings: &PresenceSettings) -> Self {
        Self {
            status: settings.online_status,
            activity: settings.activity.clone(),
        }
    }
}

/// Broad classification of platform failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    /// Credentials were rejected.
    Authentication,
    /// The platform could not be reached or the connection dropped.
    Network,
    /// The platform refused the request.
    Rejected,
    /// The session was already closed.
    Closed,
}

impl fmt::Display for PlatformErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Authentication => "authentication",
            Self::Network => "network",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
        };
        formatter.write_str(label)
    }
}

/// Failure reported by a [`Platform`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct PlatformError {
    /// Classification of the failure.
    pub kind: PlatformErrorKind,
    message: String,
}

impl PlatformError {
    /// Builds an error of the given kind.
    #[must_use]
    pub fn new(kind: PlatformErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Error returned for calls made after the session closed.
    #[must_use]
    pub fn closed() -> Self {
        Self::new(PlatformErrorKind::Closed, "session is disconnected")
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Transport to the external messaging platform.
///
/// Implementations own the connection, any internal reconnect behaviour, and
/// the thread that delivers inbound events through [`InboundEvents`].
pub trait Platform: Send + Sync {
    /// Opens the transport session and returns the authenticated identity.
    fn open(
        &self,
        credentials: &Credentials,
        options: &SessionOptions,
        inbound: InboundEvents,
    ) -> Result<Identity, PlatformError>;

    /// Closes the transport session.
    fn close(&self) -> Result<(), PlatformError>;

    /// Publishes a presence update.
    fn update_presence(&self, presence: &Presence) -> Result<(), PlatformError>;

    /// Registers a command module in one workspace with its role overlay.
    ///
    /// Registering the same module and workspace again replaces the previous
    /// overlay.
    fn register_commands(
        &self,
        module: &CommandModuleDescriptor,
        workspace: WorkspaceId,
        overlay: &PermissionOverlay,
    ) -> Result<(), PlatformError>;
}

impl<T> Platform for Arc<T>
where
    T: Platform + ?Sized,
{
    fn open(
        &self,
        credentials: &Credentials,
        options: &SessionOptions,
        inbound: InboundEvents,
    ) -> Result<Identity, PlatformError> {
        (**self).open(credentials, options, inbound)
    }

    fn close(&self) -> Result<(), PlatformError> {
        (**self).close()
    }

    fn update_presence(&self, presence: &Presence) -> Result<(), PlatformError> {
        (**self).update_presence(presence)
    }

    fn register_commands(
        &self,
        module: &CommandModuleDescriptor,
        workspace: WorkspaceId,
        overlay: &PermissionOverlay,
    ) -> Result<(), PlatformError> {
        (**self).register_commands(module, workspace, overlay)
    }
}
