//! Session client wrapping the platform transport.
//!
//! - [`platform`] defines the transport seam and its value types.
//! - [`client`] implements the connection state machine and subscriptions.
//! - [`inbound`] routes platform-delivered events to subscribers.
//! - [`offline`] provides the transport used when no platform is wired in.

mod client;
mod errors;
mod inbound;
mod offline;
mod platform;

pub use client::{SessionClient, SessionState};
pub use errors::{ConnectionError, DisconnectError};
pub use inbound::{Delivery, InboundEvents, SubscribeError, Subscriber};
pub use offline::OfflinePlatform;
pub use platform::{Identity, Platform, PlatformError, PlatformErrorKind, Presence};

pub(crate) const SESSION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session");
