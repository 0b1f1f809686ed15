//! Command module discovery and per-workspace registration.
//!
//! Command modules form a closed set fixed at build time (see
//! [`BUILTIN_MODULES`]). At startup every module is registered against the
//! session once per configured workspace entry, each time with a permission
//! overlay that allows exactly that entry's roles.
//!
//! Registration tolerates partial failure: a refused (module, workspace) pair
//! is recorded in the [`RegistrationReport`] and the remaining pairs are still
//! attempted.

mod descriptor;
mod modules;
mod overlay;

use herald_config::{Config, WorkspaceId};
use thiserror::Error;
use tracing::{debug, info};

use crate::session::{Platform, PlatformError, SessionClient};

pub use descriptor::{CommandModule, CommandModuleDescriptor, CommandSpec, DescriptorFn};
pub use modules::{BUILTIN_MODULES, DiagnosticsCommands, TrackerCommands};
pub use overlay::{PermissionOverlay, PermissionOverlayBuilder, RolePermission};

const COMMANDS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::commands");

/// Failure to register one module in one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "failed to register command module '{module}' in workspace {workspace} (role set '{role_set}'): {source}"
)]
pub struct RegistrationError {
    /// Name of the module that was being registered.
    pub module: &'static str,
    /// Workspace targeted by the registration.
    pub workspace: WorkspaceId,
    /// Name of the configuration entry the workspace came from.
    pub role_set: String,
    /// Error reported by the platform.
    #[source]
    pub source: PlatformError,
}

/// Successful registration of one module in one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Module that was registered.
    pub module: &'static str,
    /// Workspace it was registered in.
    pub workspace: WorkspaceId,
    /// Overlay sent with the registration.
    pub overlay: PermissionOverlay,
}

/// Outcome of [`register_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    registered: Vec<Registration>,
    failures: Vec<RegistrationError>,
}

impl RegistrationReport {
    /// Number of registration calls issued.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.registered.len() + self.failures.len()
    }

    /// Registrations the platform accepted.
    #[must_use]
    pub fn registered(&self) -> &[Registration] {
        &self.registered
    }

    /// Registrations the platform refused.
    #[must_use]
    pub fn failures(&self) -> &[RegistrationError] {
        &self.failures
    }

    /// Returns `true` when every registration succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Lists the modules compiled into the binary, in declaration order.
#[must_use]
pub fn discover() -> Vec<CommandModuleDescriptor> {
    discover_from(BUILTIN_MODULES)
}

/// Lists the modules described by `table`, in table order.
#[must_use]
pub fn discover_from(table: &[DescriptorFn]) -> Vec<CommandModuleDescriptor> {
    table.iter().map(|describe| describe()).collect()
}

/// Registers every descriptor in every workspace named by `config`.
///
/// Each (descriptor, workspace) pair is attempted exactly once, regardless of
/// earlier failures. The platform replaces any overlay previously registered
/// for the same pair, so repeating the call converges on the same state.
pub fn register_all<P>(
    session: &SessionClient<P>,
    descriptors: &[CommandModuleDescriptor],
    config: &Config,
) -> RegistrationReport
where
    P: Platform,
{
    let mut report = RegistrationReport::default();
    for descriptor in descriptors {
        for role_set in config.role_sets() {
            let result = session.register_commands(descriptor, role_set.workspace_id, |overlay| {
                for role in role_set.role_ids {
                    overlay.allow_role(*role);
                }
            });
            match result {
                Ok(overlay) => {
                    debug!(
                        target: COMMANDS_TARGET,
                        module = descriptor.name(),
                        workspace = %role_set.workspace_id,
                        role_set = role_set.name,
                        roles = overlay.len(),
                        "command module registered"
                    );
                    report.registered.push(Registration {
                        module: descriptor.name(),
                        workspace: role_set.workspace_id,
                        overlay,
                    });
                }
                Err(source) => {
                    let error = RegistrationError {
                        module: descriptor.name(),
                        workspace: role_set.workspace_id,
                        role_set: role_set.name.to_owned(),
                        source,
                    };
                    debug!(
                        target: COMMANDS_TARGET,
                        module = error.module,
                        workspace = %error.workspace,
                        role_set = %error.role_set,
                        error = %error.source,
                        "command module registration failed"
                    );
                    report.failures.push(error);
                }
            }
        }
    }
    info!(
        target: COMMANDS_TARGET,
        modules = descriptors.len(),
        attempted = report.attempted(),
        failed = report.failures.len(),
        "command registration finished"
    );
    report
}

/// Discovered command modules and the outcome of registering them.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    descriptors: Vec<CommandModuleDescriptor>,
    report: Option<RegistrationReport>,
}

impl CommandRegistry {
    /// Builds a registry over an explicit set of descriptors.
    #[must_use]
    pub fn new(descriptors: Vec<CommandModuleDescriptor>) -> Self {
        Self {
            descriptors,
            report: None,
        }
    }

    /// Builds a registry over the modules compiled into the binary.
    #[must_use]
    pub fn discover() -> Self {
        Self::new(discover())
    }

    /// Descriptors held by the registry.
    #[must_use]
    pub fn descriptors(&self) -> &[CommandModuleDescriptor] {
        &self.descriptors
    }

    /// Report from the most recent [`Self::register_all`] call.
    #[must_use]
    pub fn report(&self) -> Option<&RegistrationReport> {
        self.report.as_ref()
    }

    /// Registers every held descriptor and keeps the resulting report.
    pub fn register_all<P>(
        &mut self,
        session: &SessionClient<P>,
        config: &Config,
    ) -> &RegistrationReport
    where
        P: Platform,
    {
        let report = register_all(session, &self.descriptors, config);
        self.report.insert(report)
    }
}
