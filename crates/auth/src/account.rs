use fleetwatch_core::UserId;

use crate::credential::PasswordHash;
use crate::permissions::Permission;
use crate::roles::Role;

/// A user account as the directory returns it.
///
/// Plain data record: accounts are created and maintained by an external
/// user-management flow and are read-only inside the session lifecycle.
/// Deliberately not `Serialize`; the password hash must never leave the
/// process through a serializer.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub password_hash: PasswordHash,
    pub role: Role,
    /// Fine-grained grants beyond what `role` already implies.
    pub permissions: Vec<Permission>,
}

impl UserAccount {
    pub fn new(
        username: impl Into<String>,
        password_hash: PasswordHash,
        role: Role,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash,
            role,
            permissions: Vec::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Effective permission set: role defaults plus explicit grants, deduplicated.
    pub fn effective_permissions(&self) -> Vec<Permission> {
        let mut perms = self.role.default_permissions();
        for p in &self.permissions {
            if !perms.contains(p) {
                perms.push(p.clone());
            }
        }
        perms
    }

    /// Whether the account may perform `needed`, honoring the wildcard.
    pub fn allows(&self, needed: &Permission) -> bool {
        self.effective_permissions()
            .iter()
            .any(|p| p.is_wildcard() || p == needed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(extra: Vec<Permission>) -> UserAccount {
        UserAccount::new("vera", PasswordHash::from_phc("x"), Role::Viewer)
            .with_permissions(extra)
    }

    #[test]
    fn effective_permissions_merge_role_defaults_with_explicit_grants() {
        let account = viewer(vec![Permission::new("incidents.report")]);
        let perms = account.effective_permissions();
        assert!(perms.contains(&Permission::new("buses.read")));
        assert!(perms.contains(&Permission::new("incidents.report")));
    }

    #[test]
    fn duplicate_grants_are_not_repeated() {
        let account = viewer(vec![Permission::new("buses.read")]);
        let perms = account.effective_permissions();
        let hits = perms.iter().filter(|p| p.as_str() == "buses.read").count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn wildcard_allows_everything() {
        let admin = UserAccount::new("root", PasswordHash::from_phc("x"), Role::Admin);
        assert!(admin.allows(&Permission::new("incidents.delete")));
        assert!(admin.allows(&Permission::new("anything.at.all")));
    }

    #[test]
    fn viewer_cannot_resolve_incidents() {
        let account = viewer(vec![]);
        assert!(account.allows(&Permission::new("incidents.read")));
        assert!(!account.allows(&Permission::new("incidents.resolve")));
    }
}
