use std::sync::Arc;

use crate::account::UserAccount;

/// Read-only lookup of user accounts by username.
///
/// The narrow seam between the session lifecycle and whatever stores user
/// records. Implementations live outside this crate; the in-memory one used
/// by the fleet backend is in `fleetwatch-infra`.
pub trait UserDirectory: Send + Sync {
    /// Resolve a username to its account, or `None` when unknown.
    fn resolve(&self, username: &str) -> Option<UserAccount>;
}

impl<D> UserDirectory for Arc<D>
where
    D: UserDirectory + ?Sized,
{
    fn resolve(&self, username: &str) -> Option<UserAccount> {
        (**self).resolve(username)
    }
}
