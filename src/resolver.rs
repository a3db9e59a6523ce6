//! Permission resolution: roles + direct grants → effective set

use tracing::debug;

use crate::catalog::Permission;
use crate::error::Result;
use crate::perms::PermissionSet;
use crate::profile::UserAuthProfile;
use crate::store::{RoleSnapshot, RoleStore};

/// Resolves effective permissions against a fixed role snapshot.
/// Pure: no I/O, no caching, safe to share across request handlers.
#[derive(Debug, Clone, Default)]
pub struct PermissionResolver {
    roles: RoleSnapshot,
}

impl PermissionResolver {
    pub fn new(roles: RoleSnapshot) -> Self {
        PermissionResolver { roles }
    }

    /// Snapshot the store now
    pub fn from_store(store: &dyn RoleStore) -> Result<Self> {
        Ok(Self::new(store.snapshot()?))
    }

    pub fn roles(&self) -> &RoleSnapshot {
        &self.roles
    }

    /// Union of the permissions of every named role still in the snapshot,
    /// plus direct grants. Names with no matching role are skipped.
    pub fn effective_permissions(&self, profile: &UserAuthProfile) -> PermissionSet {
        let mut mask = *profile.direct_permissions();
        for name in profile.role_names() {
            match self.roles.permissions_of(name) {
                Some(p) => mask = mask.union(p),
                None => debug!(user = profile.user_id(), role = %name, "skipping unknown role"),
            }
        }
        mask
    }

    #[inline]
    pub fn has_permission(&self, profile: &UserAuthProfile, p: Permission) -> bool {
        self.effective_permissions(profile).contains(p)
    }

    /// String-keyed check for call sites holding raw keys. Unknown keys are
    /// an error, never a silent deny.
    pub fn has_permission_key(&self, profile: &UserAuthProfile, key: &str) -> Result<bool> {
        Ok(self.has_permission(profile, key.parse()?))
    }
}
