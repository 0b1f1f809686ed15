use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::session::ConnectionError;

use super::shutdown::ShutdownError;
use super::state::LifecycleState;

/// Fatal errors surfaced at the process boundary.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Configuration or telemetry could not be set up.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The session could not be established.
    #[error("failed to connect to the platform: {0}")]
    Connection(#[from] ConnectionError),
    /// Shutdown sources could not be installed.
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
    /// A step was invoked out of order.
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        /// State the controller was in.
        from: LifecycleState,
        /// State the step would have entered.
        to: LifecycleState,
    },
}
