//! Folder listings through ContentTree + filter_visible

use portal_access::{
    actions, AccessEngine, ContentNode, ContentTree, MemoryRoleStore, NodeKind, Reason, RoleStore, UserAuthProfile,
    Visibility,
};

fn store() -> MemoryRoleStore {
    let s = MemoryRoleStore::new();
    s.create_role("Colaborador", "", &["files:view", "files:download", "files:upload", "files:edit_own", "files:delete_own"])
        .unwrap();
    s.create_role("Gestor de arquivos", "", &["files:view", "files:manage", "files:delete_any"]).unwrap();
    s
}

fn tree() -> ContentTree {
    let mut t = ContentTree::new();
    t.insert(ContentNode::new("root", NodeKind::Folder, "admin", Visibility::All)).unwrap();
    t.insert(ContentNode::new("ops", NodeKind::Folder, "admin", Visibility::departments(["OPERACIONAL"])).with_parent("root"))
        .unwrap();
    // tagged more widely than its parent: visibility is per node
    t.insert(ContentNode::new("manual.pdf", NodeKind::File, "u1", Visibility::All).with_parent("ops")).unwrap();
    t.insert(
        ContentNode::new("escala.xlsx", NodeKind::File, "u2", Visibility::departments(["OPERACIONAL"])).with_parent("ops"),
    )
    .unwrap();
    t.insert(ContentNode::new("old.doc", NodeKind::File, "u2", Visibility::All).with_parent("ops").inactive())
        .unwrap();
    t.insert(ContentNode::new("intranet", NodeKind::Link, "u1", Visibility::All).with_parent("ops")).unwrap();
    t
}

fn ids(nodes: Vec<&ContentNode>) -> Vec<&str> {
    nodes.into_iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn listing_hides_other_departments() {
    let (s, t) = (store(), tree());
    let engine = AccessEngine::from_store(&s).unwrap();
    let admin_user = UserAuthProfile::new("u3").with_department("ADMINISTRATIVA").unwrap().with_role("Colaborador");
    let ops_user = UserAuthProfile::new("u2").with_department("OPERACIONAL").unwrap().with_role("Colaborador");

    assert_eq!(ids(engine.filter_visible(&admin_user, t.children("root"))), Vec::<&str>::new());
    assert_eq!(ids(engine.filter_visible(&ops_user, t.children("root"))), vec!["ops"]);
    assert_eq!(ids(engine.filter_visible(&ops_user, t.children("ops"))), vec!["manual.pdf", "escala.xlsx", "intranet"]);
}

#[test]
fn child_visibility_is_not_inherited() {
    let (s, t) = (store(), tree());
    let engine = AccessEngine::from_store(&s).unwrap();
    let admin_user = UserAuthProfile::new("u3").with_department("ADMINISTRATIVA").unwrap().with_role("Colaborador");

    let parent = t.get("ops").unwrap();
    let child = t.get("manual.pdf").unwrap();
    assert_eq!(engine.decide(&admin_user, parent, actions::FILES_VIEW).reason, Reason::NotVisible);
    assert_eq!(engine.decide(&admin_user, child, actions::FILES_VIEW).reason, Reason::Ok);
    assert_eq!(ids(t.ancestors(child).unwrap()), vec!["ops", "root"]);
}

#[test]
fn file_manager_sees_inactive_and_deletes_any() {
    let (s, t) = (store(), tree());
    let engine = AccessEngine::from_store(&s).unwrap();
    let mgr = UserAuthProfile::new("m").with_department("OPERACIONAL").unwrap().with_role("Gestor de arquivos");

    assert_eq!(
        ids(engine.filter_visible(&mgr, t.children("ops"))),
        vec!["manual.pdf", "escala.xlsx", "old.doc", "intranet"]
    );
    let old = t.get("old.doc").unwrap();
    assert!(engine.decide(&mgr, old, actions::FILES_DELETE).allowed);
    assert!(engine.decide(&mgr, old, actions::FILES_VIEW_INACTIVE).allowed);
}

#[test]
fn colaborador_deletes_only_own_files() {
    let (s, t) = (store(), tree());
    let engine = AccessEngine::from_store(&s).unwrap();
    let u1 = UserAuthProfile::new("u1").with_department("OPERACIONAL").unwrap().with_role("Colaborador");

    assert!(engine.decide(&u1, t.get("manual.pdf").unwrap(), actions::FILES_DELETE).allowed);
    let theirs = engine.decide(&u1, t.get("escala.xlsx").unwrap(), actions::FILES_DELETE);
    assert_eq!(theirs.reason, Reason::MissingPermission);
    assert_eq!(engine.decide(&u1, t.get("old.doc").unwrap(), actions::FILES_VIEW).reason, Reason::Inactive);
}

#[test]
fn upload_checks_target_folder() {
    let (s, t) = (store(), tree());
    let engine = AccessEngine::from_store(&s).unwrap();
    let outsider = UserAuthProfile::new("u9").with_department("FINANCEIRO").unwrap().with_role("Colaborador");
    let insider = UserAuthProfile::new("u2").with_department("OPERACIONAL").unwrap().with_role("Colaborador");

    assert!(engine.authorize(&outsider, t.get("ops"), actions::FILES_UPLOAD).is_err());
    assert!(engine.authorize(&outsider, t.get("nope"), actions::FILES_UPLOAD).is_err());
    assert!(engine.authorize(&insider, t.get("ops"), actions::FILES_UPLOAD).is_ok());
}
