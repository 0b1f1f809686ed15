//! Errors surfaced by the session client.

use thiserror::Error;

use super::platform::{PlatformError, PlatformErrorKind};

/// Failure to establish the platform session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The platform rejected the credentials.
    #[error("platform rejected the session credentials: {message}")]
    Authentication {
        /// Platform-supplied detail.
        message: String,
    },
    /// The platform could not be reached.
    #[error("failed to reach the platform: {message}")]
    Network {
        /// Platform-supplied detail.
        message: String,
    },
    /// The platform refused the session for another reason.
    #[error("platform refused the session: {message}")]
    Refused {
        /// Platform-supplied detail.
        message: String,
    },
    /// `connect` was called on a session that is already connected.
    #[error("session is already connected")]
    AlreadyConnected,
    /// `connect` was called after the session was disconnected.
    #[error("session was disconnected and cannot reconnect in place")]
    Terminated,
}

impl From<PlatformError> for ConnectionError {
    fn from(error: PlatformError) -> Self {
        let message = error.message().to_owned();
        match error.kind {
            PlatformErrorKind::Authentication => Self::Authentication { message },
            PlatformErrorKind::Network => Self::Network { message },
            PlatformErrorKind::Rejected => Self::Refused { message },
            PlatformErrorKind::Closed => Self::Terminated,
        }
    }
}

/// Failure reported while closing the transport.
///
/// The session is considered disconnected even when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("platform reported an error while disconnecting: {source}")]
pub struct DisconnectError {
    /// Underlying platform error.
    #[source]
    pub source: PlatformError,
}
