//! portal-access - access control core for the intranet portal
//!
//! Answers one question for the content features (files, knowledge base,
//! institutional areas, job postings): may this user perform this action
//! on this node? It combines role-based permissions with department-scoped
//! visibility and owner/any key selection.
//!
//! ```
//! use portal_access::*;
//!
//! let store = MemoryRoleStore::new();
//! store.create_role("Editor", "", &["knowledge:create", "knowledge:edit_own"]).unwrap();
//! let engine = AccessEngine::from_store(&store).unwrap();
//!
//! let user = UserAuthProfile::new("u1").with_department("RH").unwrap().with_role("Editor");
//! let article = ContentNode::new("a1", NodeKind::Article, "u1", Visibility::All);
//! assert!(engine.decide(&user, &article, actions::KNOWLEDGE_EDIT).allowed);
//! ```

pub mod actions;
pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod db;
pub mod engine;
pub mod error;
pub mod node;
pub mod perms;
pub mod profile;
pub mod protected;
pub mod resolver;
pub mod role;
pub mod store;
pub mod visibility;

pub use catalog::{Category, Permission};
pub use config::{AccessConfig, Backend, BootstrapConfig, StoreConfig};
pub use db::LmdbRoleStore;
pub use engine::{AccessDecision, AccessEngine, Action, Reason};
pub use error::{AccessDenied, AccessError, Result};
pub use node::{ContentNode, ContentTree, NodeKind};
pub use perms::PermissionSet;
pub use profile::UserAuthProfile;
pub use resolver::PermissionResolver;
pub use role::{Role, RoleId, RoleUpdate};
pub use store::{MemoryRoleStore, RoleSnapshot, RoleStore};
pub use visibility::{is_visible, Visibility};
