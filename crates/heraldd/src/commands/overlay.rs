//! Per-workspace role permission overlays.
//!
//! Overlays are additive: a role is either explicitly allowed or absent, and
//! absent roles fall back to the platform's default (no access).

use herald_config::RoleId;

/// One allowed role in an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RolePermission {
    /// Role the entry applies to.
    pub role: RoleId,
    /// Always `true`; deny entries are not modelled.
    pub allow: bool,
}

/// Roles granted access to a registered command module in one workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionOverlay {
    entries: Vec<RolePermission>,
}

impl PermissionOverlay {
    /// Starts an empty overlay.
    #[must_use]
    pub fn builder() -> PermissionOverlayBuilder {
        PermissionOverlayBuilder::default()
    }

    /// Entries in the order roles were first allowed.
    #[must_use]
    pub fn entries(&self) -> &[RolePermission] {
        &self.entries
    }

    /// Allowed roles in insertion order.
    pub fn allowed_roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.entries.iter().map(|entry| entry.role)
    }

    /// Returns `true` when `role` is allowed.
    #[must_use]
    pub fn allows(&self, role: RoleId) -> bool {
        self.entries.iter().any(|entry| entry.role == role)
    }

    /// Number of allowed roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no role is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates allowed roles for a [`PermissionOverlay`].
#[derive(Debug, Default)]
pub struct PermissionOverlayBuilder {
    entries: Vec<RolePermission>,
}

impl PermissionOverlayBuilder {
    /// Marks `role` as allowed. Allowing a role twice keeps one entry.
    pub fn allow_role(&mut self, role: RoleId) -> &mut Self {
        if !self.entries.iter().any(|entry| entry.role == role) {
            self.entries.push(RolePermission { role, allow: true });
        }
        self
    }

    /// Finishes the overlay.
    #[must_use]
    pub fn build(self) -> PermissionOverlay {
        PermissionOverlay {
            entries: self.entries,
        }
    }
}
