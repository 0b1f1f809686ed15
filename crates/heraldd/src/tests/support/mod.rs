//! Test harness utilities shared by the unit and behavioural suites.

mod config_loader;
mod handlers;
mod platform;
mod reporter;
mod world;

pub use config_loader::{FailingConfigLoader, TestConfigLoader, sample_config};
pub use handlers::{ChannelHandler, FailingHandler, GatedHandler, PanickingHandler, RECV_TIMEOUT};
pub use platform::{PlatformCall, RecordingPlatform};
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{TestWorld, world};
