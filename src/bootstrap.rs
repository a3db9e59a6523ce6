//! Bootstrap: seed the administrator and member roles

use tracing::{info, warn};

use crate::catalog::{self, Permission};
use crate::config::BootstrapConfig;
use crate::error::{AccessError, Result};
use crate::perms::PermissionSet;
use crate::role::{self, Role};
use crate::store::RoleStore;

/// Baseline permissions every employee gets
pub const MEMBER_PERMISSIONS: &[Permission] = &[
    Permission::TimelineView,
    Permission::TimelineCreate,
    Permission::TimelineEditOwn,
    Permission::TimelineDeleteOwn,
    Permission::TimelineComment,
    Permission::TimelineReact,
    Permission::FilesView,
    Permission::FilesDownload,
    Permission::KnowledgeView,
    Permission::ChatUse,
    Permission::ChatViewHistory,
    Permission::InstitutionalView,
    Permission::JobsView,
    Permission::JobsApply,
    Permission::CoinsView,
    Permission::CoinsSend,
    Permission::CalendarView,
];

/// True once the administrator role exists
pub fn is_bootstrapped(store: &dyn RoleStore, cfg: &BootstrapConfig) -> Result<bool> {
    Ok(store.find_by_name(&cfg.admin_role)?.is_some())
}

/// Create the administrator role (every catalog key) and the member role.
/// Returns (admin, member).
///
/// All or nothing: if the member role cannot be created the administrator
/// role is removed again, so a corrected config can retry.
pub fn bootstrap(store: &dyn RoleStore, cfg: &BootstrapConfig) -> Result<(Role, Role)> {
    role::validate_name(&cfg.admin_role)?;
    role::validate_name(&cfg.member_role)?;
    if is_bootstrapped(store, cfg)? {
        return Err(AccessError::AlreadyBootstrapped);
    }
    let existing_member = store.find_by_name(&cfg.member_role)?;
    let all: Vec<&str> = catalog::all_keys().collect();
    let admin = store.create_role(&cfg.admin_role, "Full access to the portal", &all)?;
    let member = match existing_member {
        Some(existing) => existing,
        None => {
            let keys = PermissionSet::from_iter(MEMBER_PERMISSIONS.iter().copied()).keys();
            match store.create_role(&cfg.member_role, "Default employee access", &keys) {
                Ok(m) => m,
                Err(e) => {
                    warn!(admin = %admin.name, error = %e, "member role failed, rolling back bootstrap");
                    store.delete_role(admin.id)?;
                    return Err(e);
                }
            }
        }
    };
    info!(admin = %admin.name, member = %member.name, fingerprint = %catalog::fingerprint(), "bootstrapped roles");
    Ok((admin, member))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRoleStore;

    #[test]
    fn seeds_admin_and_member() {
        let s = MemoryRoleStore::new();
        let cfg = BootstrapConfig::default();
        assert!(!is_bootstrapped(&s, &cfg).unwrap());
        let (admin, member) = bootstrap(&s, &cfg).unwrap();
        assert_eq!(admin.permissions, PermissionSet::all());
        assert!(member.permissions.contains(Permission::FilesView));
        assert!(!member.permissions.contains(Permission::RolesManage));
        assert!(is_bootstrapped(&s, &cfg).unwrap());
    }

    #[test]
    fn second_bootstrap_fails() {
        let s = MemoryRoleStore::new();
        let cfg = BootstrapConfig::default();
        bootstrap(&s, &cfg).unwrap();
        assert!(matches!(bootstrap(&s, &cfg), Err(AccessError::AlreadyBootstrapped)));
        assert_eq!(s.list_roles().unwrap().len(), 2);
    }

    #[test]
    fn keeps_existing_member_role() {
        let s = MemoryRoleStore::new();
        let cfg = BootstrapConfig::default();
        let pre = s.create_role(&cfg.member_role, "custom", &["files:view"]).unwrap();
        let (_, member) = bootstrap(&s, &cfg).unwrap();
        assert_eq!(member, pre);
    }

    #[test]
    fn bad_member_name_writes_nothing() {
        let s = MemoryRoleStore::new();
        let bad = BootstrapConfig { member_role: "  ".into(), ..BootstrapConfig::default() };
        assert!(matches!(bootstrap(&s, &bad), Err(AccessError::InvalidRoleName)));
        assert!(s.list_roles().unwrap().is_empty());

        let (admin, _) = bootstrap(&s, &BootstrapConfig::default()).unwrap();
        assert_eq!(admin.name, "Administrador");
    }

    #[test]
    fn same_name_for_both_roles_rolls_back() {
        let s = MemoryRoleStore::new();
        let cfg = BootstrapConfig { admin_role: "Equipe".into(), member_role: "Equipe".into() };
        // the admin create claims the name, so the member create collides
        assert!(bootstrap(&s, &cfg).is_err());
        assert!(s.list_roles().unwrap().is_empty());
        assert!(!is_bootstrapped(&s, &cfg).unwrap());
    }
}
