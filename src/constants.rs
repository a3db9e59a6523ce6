//! Reserved tokens, limits and defaults

/// Legacy encoding of "all departments" in persisted visibility arrays.
/// The department selector emits exactly `["TODOS"]`.
pub const ALL_DEPARTMENTS_TOKEN: &str = "TODOS";

/// Maximum folder nesting, counting the root level. Enforced on insert and
/// reparent; ancestor walks stop here.
pub const MAX_TREE_DEPTH: usize = 64;

/// Longest role name in bytes. LMDB keys cap out at 511.
pub const MAX_ROLE_NAME_LEN: usize = 255;

// LMDB defaults
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;
pub const LMDB_MAX_DBS: u32 = 3;

// Bootstrap role names
pub const DEFAULT_ADMIN_ROLE: &str = "Administrador";
pub const DEFAULT_MEMBER_ROLE: &str = "Colaborador";

// Environment overrides for AccessConfig
pub const ENV_STORE_PATH: &str = "PORTAL_ACCESS_STORE_PATH";
pub const ENV_BACKEND: &str = "PORTAL_ACCESS_BACKEND";
