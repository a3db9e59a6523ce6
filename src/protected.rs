//! Protected role administration
//!
//! Every mutation requires `roles:manage`; listing requires `roles:view`
//! or `roles:manage`. The actor's permissions are resolved against the
//! store as it is at call time.

use crate::catalog::Permission;
use crate::error::{AccessError, Result};
use crate::profile::UserAuthProfile;
use crate::resolver::PermissionResolver;
use crate::role::{Role, RoleId, RoleUpdate};
use crate::store::RoleStore;

// ============================================================================
// Permission Checks
// ============================================================================

fn check_permission(store: &dyn RoleStore, actor: &UserAuthProfile, any_of: &[Permission]) -> Result<()> {
    let perms = PermissionResolver::from_store(store)?.effective_permissions(actor);
    if any_of.iter().any(|p| perms.contains(*p)) {
        return Ok(());
    }
    Err(AccessError::Forbidden {
        user: actor.user_id().to_string(),
        permission: any_of.first().map(|p| p.key()).unwrap_or_default(),
    })
}

// ============================================================================
// Roles
// ============================================================================

/// Create a role. Requires `roles:manage`.
pub fn create_role(
    store: &dyn RoleStore,
    actor: &UserAuthProfile,
    name: &str,
    description: &str,
    permissions: &[&str],
) -> Result<Role> {
    check_permission(store, actor, &[Permission::RolesManage])?;
    store.create_role(name, description, permissions)
}

/// Update a role's description and/or permission set. Requires `roles:manage`.
pub fn update_role(store: &dyn RoleStore, actor: &UserAuthProfile, id: RoleId, update: RoleUpdate) -> Result<Role> {
    check_permission(store, actor, &[Permission::RolesManage])?;
    store.update_role(id, update)
}

/// Delete a role. Requires `roles:manage`.
pub fn delete_role(store: &dyn RoleStore, actor: &UserAuthProfile, id: RoleId) -> Result<()> {
    check_permission(store, actor, &[Permission::RolesManage])?;
    store.delete_role(id)
}

/// List roles. Requires `roles:view` or `roles:manage`.
pub fn list_roles(store: &dyn RoleStore, actor: &UserAuthProfile) -> Result<Vec<Role>> {
    check_permission(store, actor, &[Permission::RolesView, Permission::RolesManage])?;
    store.list_roles()
}
