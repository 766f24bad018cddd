use serde::{Deserialize, Serialize};

use crate::permissions::Permission;

/// Role held by a user account.
///
/// The set is closed on purpose: the fleet backend knows exactly three kinds
/// of operator, and authorization rules key off them. New roles are a code
/// change, not a data change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access, including destructive operations.
    Admin,
    /// Day-to-day fleet operations: report and resolve incidents.
    Dispatcher,
    /// Read-only access to buses and incidents.
    Viewer,
}

impl Role {
    /// Authority string exposed to clients and stamped into access tokens
    /// (`ROLE_*` convention).
    pub fn authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Dispatcher => "ROLE_DISPATCHER",
            Role::Viewer => "ROLE_VIEWER",
        }
    }

    /// Permissions the role grants on its own. Explicit per-account grants
    /// add to these, never subtract.
    pub fn default_permissions(&self) -> Vec<Permission> {
        match self {
            Role::Admin => vec![Permission::new("*")],
            Role::Dispatcher => vec![
                Permission::new("buses.read"),
                Permission::new("incidents.read"),
                Permission::new("incidents.report"),
                Permission::new("incidents.resolve"),
            ],
            Role::Viewer => vec![
                Permission::new("buses.read"),
                Permission::new("incidents.read"),
            ],
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.authority())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
