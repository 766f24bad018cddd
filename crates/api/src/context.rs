use fleetwatch_auth::{Permission, Role, UserAccount};

/// Authentication context for a request (authenticated identity + authorities).
///
/// Bound to a request as an axum extension by the authentication middleware
/// and dropped with the request; never stored anywhere ambient. The
/// authorities are snapshotted from the directory at bind time, not read from
/// token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    username: String,
    role: Role,
    permissions: Vec<Permission>,
}

impl AuthContext {
    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            username: account.username.clone(),
            role: account.role,
            permissions: account.effective_permissions(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Whether this request may perform `needed`, honoring the wildcard.
    pub fn allows(&self, needed: &Permission) -> bool {
        self.permissions.iter().any(|p| p.is_wildcard() || p == needed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
