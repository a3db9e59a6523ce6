//! Role store: trait, in-memory backend and read snapshots

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use tracing::info;

use crate::error::{AccessError, Result};
use crate::perms::PermissionSet;
use crate::role::{self, Role, RoleId, RoleUpdate};

/// Role persistence.
///
/// Implementations validate permission keys before writing, so a failed
/// create or update leaves the store untouched. Concurrent edits of the same
/// role are last-writer-wins.
pub trait RoleStore: Send + Sync {
    /// Fails with `DuplicateRoleName` (exact, case-sensitive) or `UnknownPermission`
    fn create_role(&self, name: &str, description: &str, permissions: &[&str]) -> Result<Role>;

    fn update_role(&self, id: RoleId, update: RoleUpdate) -> Result<Role>;

    /// No check against users still naming the role
    fn delete_role(&self, id: RoleId) -> Result<()>;

    /// Ordered by id
    fn list_roles(&self) -> Result<Vec<Role>>;

    fn get_role(&self, id: RoleId) -> Result<Option<Role>>;

    fn find_by_name(&self, name: &str) -> Result<Option<Role>>;

    /// Consistent view for permission resolution
    fn snapshot(&self) -> Result<RoleSnapshot> {
        Ok(RoleSnapshot::from_roles(self.list_roles()?))
    }
}

/// Immutable name → permissions view of the store at one point in time
#[derive(Debug, Clone, Default)]
pub struct RoleSnapshot {
    by_name: HashMap<String, PermissionSet>,
}

impl RoleSnapshot {
    pub fn from_roles<I: IntoIterator<Item = Role>>(roles: I) -> Self {
        RoleSnapshot {
            by_name: roles.into_iter().map(|r| (r.name, r.permissions)).collect(),
        }
    }

    #[inline]
    pub fn permissions_of(&self, name: &str) -> Option<&PermissionSet> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    roles: BTreeMap<RoleId, Role>,
}

impl MemoryState {
    fn name_taken(&self, name: &str) -> bool {
        self.roles.values().any(|r| r.name == name)
    }
}

/// Process-local store for tests and hosts that persist roles elsewhere
#[derive(Default)]
pub struct MemoryRoleStore {
    state: RwLock<MemoryState>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl RoleStore for MemoryRoleStore {
    fn create_role(&self, name: &str, description: &str, permissions: &[&str]) -> Result<Role> {
        let permissions = role::validate_new(name, permissions)?;
        let mut st = self.write();
        if st.name_taken(name) {
            return Err(AccessError::DuplicateRoleName(name.to_string()));
        }
        st.next_id += 1;
        let role = Role {
            id: RoleId(st.next_id),
            name: name.to_string(),
            description: description.to_string(),
            permissions,
        };
        st.roles.insert(role.id, role.clone());
        info!(role = %role.name, id = %role.id, permissions = role.permissions.len(), "role created");
        Ok(role)
    }

    fn update_role(&self, id: RoleId, update: RoleUpdate) -> Result<Role> {
        let update = update.validate()?;
        let mut st = self.write();
        let role = st.roles.get_mut(&id).ok_or(AccessError::RoleNotFound(id))?;
        update.apply(role);
        info!(role = %role.name, id = %id, "role updated");
        Ok(role.clone())
    }

    fn delete_role(&self, id: RoleId) -> Result<()> {
        let removed = self.write().roles.remove(&id).ok_or(AccessError::RoleNotFound(id))?;
        info!(role = %removed.name, id = %id, "role deleted");
        Ok(())
    }

    fn list_roles(&self) -> Result<Vec<Role>> {
        Ok(self.read().roles.values().cloned().collect())
    }

    fn get_role(&self, id: RoleId) -> Result<Option<Role>> {
        Ok(self.read().roles.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(self.read().roles.values().find(|r| r.name == name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Permission;

    #[test]
    fn create_assigns_increasing_ids() {
        let s = MemoryRoleStore::new();
        let a = s.create_role("A", "", &[]).unwrap();
        let b = s.create_role("B", "", &["files:view"]).unwrap();
        assert!(a.id < b.id);
        assert_eq!(s.list_roles().unwrap().len(), 2);
    }

    #[test]
    fn duplicate_name_is_case_sensitive() {
        let s = MemoryRoleStore::new();
        s.create_role("Editor", "", &[]).unwrap();
        assert!(matches!(s.create_role("Editor", "", &[]), Err(AccessError::DuplicateRoleName(_))));
        s.create_role("editor", "", &[]).unwrap();
    }

    #[test]
    fn unknown_permission_leaves_store_unchanged() {
        let s = MemoryRoleStore::new();
        let e = s.create_role("Editor", "", &["knowledge:create", "bogus:key"]);
        assert!(matches!(e, Err(AccessError::UnknownPermission(_))));
        assert!(s.list_roles().unwrap().is_empty());
        assert!(s.find_by_name("Editor").unwrap().is_none());
    }

    #[test]
    fn update_and_delete_missing() {
        let s = MemoryRoleStore::new();
        assert!(matches!(s.update_role(RoleId(9), RoleUpdate::new()), Err(AccessError::RoleNotFound(RoleId(9)))));
        assert!(matches!(s.delete_role(RoleId(9)), Err(AccessError::RoleNotFound(_))));
    }

    #[test]
    fn failed_update_keeps_old_permissions() {
        let s = MemoryRoleStore::new();
        let r = s.create_role("Editor", "", &["knowledge:create"]).unwrap();
        assert!(s.update_role(r.id, RoleUpdate::new().description("x").permissions(&["nope:nope"])).is_err());
        let same = s.get_role(r.id).unwrap().unwrap();
        assert_eq!(same, r);
    }

    #[test]
    fn snapshot_is_detached() {
        let s = MemoryRoleStore::new();
        let r = s.create_role("Editor", "", &["knowledge:create"]).unwrap();
        let snap = s.snapshot().unwrap();
        s.delete_role(r.id).unwrap();
        assert!(snap.permissions_of("Editor").unwrap().contains(Permission::KnowledgeCreate));
        assert!(s.snapshot().unwrap().permissions_of("Editor").is_none());
    }
}
