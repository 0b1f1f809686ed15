//! Platform stand-in used until a real transport is wired in.

use herald_config::{Credentials, SessionOptions, WorkspaceId};

use crate::commands::{CommandModuleDescriptor, PermissionOverlay};

use super::inbound::InboundEvents;
use super::platform::{Identity, Platform, PlatformError, Presence};

const OFFLINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::session::offline");

/// Platform that accepts every call without contacting a remote service.
///
/// No inbound events are ever produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflinePlatform;

impl Platform for OfflinePlatform {
    fn open(
        &self,
        _credentials: &Credentials,
        options: &SessionOptions,
        _inbound: InboundEvents,
    ) -> Result<Identity, PlatformError> {
        tracing::warn!(
            target: OFFLINE_TARGET,
            auto_reconnect = options.auto_reconnect,
            "no platform transport configured; running offline"
        );
        Ok(Identity::new(0, "herald (offline)"))
    }

    fn close(&self) -> Result<(), PlatformError> {
        tracing::debug!(target: OFFLINE_TARGET, "offline session closed");
        Ok(())
    }

    fn update_presence(&self, presence: &Presence) -> Result<(), PlatformError> {
        tracing::debug!(
            target: OFFLINE_TARGET,
            status = %presence.status,
            "presence update accepted offline"
        );
        Ok(())
    }

    fn register_commands(
        &self,
        module: &CommandModuleDescriptor,
        workspace: WorkspaceId,
        overlay: &PermissionOverlay,
    ) -> Result<(), PlatformError> {
        tracing::debug!(
            target: OFFLINE_TARGET,
            module = module.name(),
            %workspace,
            roles = overlay.len(),
            "command registration accepted offline"
        );
        Ok(())
    }
}
