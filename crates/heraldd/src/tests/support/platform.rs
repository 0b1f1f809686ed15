//! Recording platform double used across session, registry and lifecycle
//! tests.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use herald_config::{Credentials, RoleId, SessionOptions, WorkspaceId};

use crate::commands::{CommandModuleDescriptor, PermissionOverlay};
use crate::session::{
    Identity, InboundEvents, Platform, PlatformError, PlatformErrorKind, Presence,
};

/// Calls observed by [`RecordingPlatform`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Open,
    Close,
    Presence(Presence),
    Register {
        module: &'static str,
        workspace: WorkspaceId,
        roles: Vec<RoleId>,
    },
}

#[derive(Debug, Default)]
struct Behaviour {
    open_error: Option<PlatformError>,
    close_error: Option<PlatformError>,
    refused: BTreeSet<(&'static str, WorkspaceId)>,
}

/// Platform double that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    inbound: Mutex<Option<InboundEvents>>,
    behaviour: Mutex<Behaviour>,
}

impl RecordingPlatform {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_open(&self, kind: PlatformErrorKind, message: &str) {
        self.behaviour.lock().expect("behaviour lock").open_error =
            Some(PlatformError::new(kind, message));
    }

    pub fn fail_close(&self, message: &str) {
        self.behaviour.lock().expect("behaviour lock").close_error =
            Some(PlatformError::new(PlatformErrorKind::Network, message));
    }

    pub fn refuse_registration(&self, module: &'static str, workspace: WorkspaceId) {
        self.behaviour
            .lock()
            .expect("behaviour lock")
            .refused
            .insert((module, workspace));
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, predicate: impl Fn(&PlatformCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn opens(&self) -> usize {
        self.count(|call| matches!(call, PlatformCall::Open))
    }

    pub fn closes(&self) -> usize {
        self.count(|call| matches!(call, PlatformCall::Close))
    }

    pub fn registrations(&self) -> Vec<(&'static str, WorkspaceId, Vec<RoleId>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Register {
                    module,
                    workspace,
                    roles,
                } => Some((module, workspace, roles)),
                _ => None,
            })
            .collect()
    }

    pub fn presences(&self) -> Vec<Presence> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Presence(presence) => Some(presence),
                _ => None,
            })
            .collect()
    }

    /// Inbound handle captured by the last successful `open`.
    pub fn inbound(&self) -> Option<InboundEvents> {
        self.inbound.lock().expect("inbound lock").clone()
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl Platform for RecordingPlatform {
    fn open(
        &self,
        _credentials: &Credentials,
        _options: &SessionOptions,
        inbound: InboundEvents,
    ) -> Result<Identity, PlatformError> {
        self.record(PlatformCall::Open);
        if let Some(error) = self.behaviour.lock().expect("behaviour lock").open_error.clone() {
            return Err(error);
        }
        *self.inbound.lock().expect("inbound lock") = Some(inbound);
        Ok(Identity::new(7, "herald#0001"))
    }

    fn close(&self) -> Result<(), PlatformError> {
        self.record(PlatformCall::Close);
        match self.behaviour.lock().expect("behaviour lock").close_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn update_presence(&self, presence: &Presence) -> Result<(), PlatformError> {
        self.record(PlatformCall::Presence(presence.clone()));
        Ok(())
    }

    fn register_commands(
        &self,
        module: &CommandModuleDescriptor,
        workspace: WorkspaceId,
        overlay: &PermissionOverlay,
    ) -> Result<(), PlatformError> {
        self.record(PlatformCall::Register {
            module: module.name(),
            workspace,
            roles: overlay.allowed_roles().collect(),
        });
        let refused = self
            .behaviour
            .lock()
            .expect("behaviour lock")
            .refused
            .contains(&(module.name(), workspace));
        if refused {
            Err(PlatformError::new(
                PlatformErrorKind::Rejected,
                "registration refused by test",
            ))
        } else {
            Ok(())
        }
    }
}
