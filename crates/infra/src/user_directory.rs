use std::collections::HashMap;
use std::sync::RwLock;

use fleetwatch_auth::{CredentialError, PasswordHash, Role, UserAccount, UserDirectory};

/// In-memory user directory for dev and tests.
///
/// The session lifecycle only ever reads through [`UserDirectory`]; the
/// mutating methods exist so a deployment (or a test) can manage accounts.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<HashMap<String, UserAccount>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory seeded with the three dev accounts, one per role.
    ///
    /// Dev convenience only. The fixed dispatcher/viewer passwords and the
    /// defaultable admin password are not fit for anything reachable from a
    /// network you do not own.
    pub fn seeded(admin_password: &str) -> Result<Self, CredentialError> {
        tracing::warn!("seeding in-memory user directory with dev accounts");
        let directory = Self::new();
        directory.upsert(UserAccount::new(
            "admin",
            PasswordHash::hash(admin_password)?,
            Role::Admin,
        ));
        directory.upsert(UserAccount::new(
            "dispatch",
            PasswordHash::hash("dispatch123")?,
            Role::Dispatcher,
        ));
        directory.upsert(UserAccount::new(
            "viewer",
            PasswordHash::hash("viewer123")?,
            Role::Viewer,
        ));
        Ok(directory)
    }

    /// Insert or replace the account stored under its username.
    pub fn upsert(&self, account: UserAccount) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(account.username.clone(), account);
        }
    }

    /// Remove an account, returning whether it existed.
    pub fn remove(&self, username: &str) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(username).is_some(),
            Err(_) => false,
        }
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn resolve(&self, username: &str) -> Option<UserAccount> {
        let map = self.inner.read().ok()?;
        map.get(username).cloned()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_returns_the_stored_account() {
        let directory = InMemoryUserDirectory::new();
        directory.upsert(UserAccount::new(
            "vera",
            PasswordHash::from_phc("x"),
            Role::Viewer,
        ));

        let account = directory.resolve("vera").unwrap();
        assert_eq!(account.username, "vera");
        assert_eq!(account.role, Role::Viewer);
        assert!(directory.resolve("nobody").is_none());
    }

    #[test]
    fn removed_accounts_stop_resolving() {
        let directory = InMemoryUserDirectory::new();
        directory.upsert(UserAccount::new(
            "vera",
            PasswordHash::from_phc("x"),
            Role::Viewer,
        ));

        assert!(directory.remove("vera"));
        assert!(!directory.remove("vera"));
        assert!(directory.resolve("vera").is_none());
    }

    #[test]
    fn seeded_directory_carries_one_account_per_role() {
        let directory = InMemoryUserDirectory::seeded("admin123").unwrap();
        assert_eq!(directory.resolve("admin").unwrap().role, Role::Admin);
        assert_eq!(directory.resolve("dispatch").unwrap().role, Role::Dispatcher);
        assert_eq!(directory.resolve("viewer").unwrap().role, Role::Viewer);
        assert!(directory.resolve("admin").unwrap().password_hash.verify("admin123"));
    }
}
