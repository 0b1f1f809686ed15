use std::fmt;

/// Phases of a [`LifecycleController`](super::LifecycleController).
///
/// The controller only moves forward through these states; `Disposed` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    /// Built, nothing loaded.
    Created,
    /// Configuration loaded and telemetry installed.
    Configuring,
    /// Session built, commands registered, dispatcher attached.
    Connecting,
    /// Session connected; waiting for shutdown.
    Running,
    /// Shutdown observed; session being closed.
    Disconnecting,
    /// Every owned resource released.
    Disposed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Configuring => "configuring",
            Self::Connecting => "connecting",
            Self::Running => "running",
            Self::Disconnecting => "disconnecting",
            Self::Disposed => "disposed",
        };
        formatter.write_str(label)
    }
}
