//! LMDB role store: persistence, validation, atomicity

use portal_access::{
    bootstrap, AccessConfig, AccessEngine, AccessError, Backend, BootstrapConfig, LmdbRoleStore, MemoryRoleStore,
    Permission, RoleId, RoleStore, RoleUpdate, UserAuthProfile,
};
use portal_access::constants::MAX_ROLE_NAME_LEN;
use tempfile::TempDir;

const MAP_SIZE: usize = 10 << 20;

fn setup() -> (TempDir, LmdbRoleStore) {
    let dir = TempDir::new().unwrap();
    let store = LmdbRoleStore::open(dir.path(), MAP_SIZE).unwrap();
    (dir, store)
}

#[test]
fn create_get_find() {
    let (_dir, store) = setup();
    let r = store.create_role("Editor", "Knowledge writers", &["knowledge:create", "knowledge:edit_own"]).unwrap();
    assert_eq!(r.id, RoleId(1));
    assert_eq!(store.get_role(r.id).unwrap(), Some(r.clone()));
    assert_eq!(store.find_by_name("Editor").unwrap(), Some(r));
    assert_eq!(store.find_by_name("editor").unwrap(), None);
}

#[test]
fn duplicate_name_rejected() {
    let (_dir, store) = setup();
    store.create_role("Editor", "", &[]).unwrap();
    assert!(matches!(store.create_role("Editor", "again", &["files:view"]), Err(AccessError::DuplicateRoleName(_))));
    assert_eq!(store.list_roles().unwrap().len(), 1);
}

#[test]
fn unknown_permission_persists_nothing() {
    let (_dir, store) = setup();
    let e = store.create_role("Editor", "", &["knowledge:create", "bogus:key"]);
    assert!(matches!(e, Err(AccessError::UnknownPermission(_))));
    assert!(store.list_roles().unwrap().is_empty());
    assert!(store.find_by_name("Editor").unwrap().is_none());
    // id counter untouched
    assert_eq!(store.create_role("Editor", "", &[]).unwrap().id, RoleId(1));
}

#[test]
fn long_names_rejected_like_memory_store() {
    let (_dir, store) = setup();
    let memory = MemoryRoleStore::new();
    let long = "R".repeat(600);
    assert!(matches!(store.create_role(&long, "", &[]), Err(AccessError::InvalidRoleName)));
    assert!(matches!(memory.create_role(&long, "", &[]), Err(AccessError::InvalidRoleName)));
    assert!(store.list_roles().unwrap().is_empty());

    let longest = "R".repeat(MAX_ROLE_NAME_LEN);
    assert_eq!(store.create_role(&longest, "", &[]).unwrap().name, longest);
    assert!(store.find_by_name(&longest).unwrap().is_some());
}

#[test]
fn update_replaces_permissions() {
    let (_dir, store) = setup();
    let r = store.create_role("Editor", "", &["knowledge:create", "knowledge:edit_own"]).unwrap();
    let u = store.update_role(r.id, RoleUpdate::new().permissions(&["knowledge:view"])).unwrap();
    assert_eq!(u.permissions.keys(), vec!["knowledge:view"]);
    assert_eq!(u.description, "");

    let u = store.update_role(r.id, RoleUpdate::new().description("readers")).unwrap();
    assert_eq!(u.permissions.keys(), vec!["knowledge:view"]);
    assert_eq!(store.get_role(r.id).unwrap().unwrap().description, "readers");

    assert!(matches!(store.update_role(RoleId(99), RoleUpdate::new()), Err(AccessError::RoleNotFound(_))));
}

#[test]
fn delete_frees_the_name() {
    let (_dir, store) = setup();
    let r = store.create_role("Editor", "", &[]).unwrap();
    store.delete_role(r.id).unwrap();
    assert!(matches!(store.delete_role(r.id), Err(AccessError::RoleNotFound(_))));
    let again = store.create_role("Editor", "", &[]).unwrap();
    assert_ne!(again.id, r.id);
}

#[test]
fn survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = LmdbRoleStore::open(dir.path(), MAP_SIZE).unwrap();
        store.create_role("Editor", "", &["knowledge:create"]).unwrap();
    }
    let store = LmdbRoleStore::open(dir.path(), MAP_SIZE).unwrap();
    let roles = store.list_roles().unwrap();
    assert_eq!(roles.len(), 1);
    assert!(roles[0].permissions.contains(Permission::KnowledgeCreate));
    assert_eq!(store.create_role("Viewer", "", &[]).unwrap().id, RoleId(2));
}

#[test]
fn clear_resets() {
    let (_dir, store) = setup();
    store.create_role("Editor", "", &[]).unwrap();
    store.clear().unwrap();
    assert!(store.list_roles().unwrap().is_empty());
    assert_eq!(store.create_role("Editor", "", &[]).unwrap().id, RoleId(1));
}

#[test]
fn configured_store_bootstraps_and_decides() {
    let dir = TempDir::new().unwrap();
    let cfg = AccessConfig::from_toml_str(&format!(
        "[store]\nbackend = \"lmdb\"\npath = {:?}\nmap_size = {}\n",
        dir.path().join("roles").to_string_lossy(),
        MAP_SIZE
    ))
    .unwrap();
    assert_eq!(cfg.store.backend, Backend::Lmdb);

    let store = cfg.open_store().unwrap();
    bootstrap::bootstrap(store.as_ref(), &BootstrapConfig::default()).unwrap();

    let engine = AccessEngine::from_store(store.as_ref()).unwrap();
    let admin = UserAuthProfile::new("root").with_role("Administrador");
    let member = UserAuthProfile::new("u1").with_role("Colaborador");
    assert!(engine.can(&admin, Permission::RolesManage));
    assert!(engine.can(&member, Permission::FilesView));
    assert!(!engine.can(&member, Permission::RolesManage));
}
