//! Error types for portal-access

use std::fmt;

use thiserror::Error;

use crate::engine::Reason;
use crate::role::RoleId;

/// Configuration, validation and storage failures.
///
/// Access denials are not errors; see [`crate::AccessDecision`].
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("unknown permission key '{0}'")]
    UnknownPermission(String),

    #[error("role {0} not found")]
    RoleNotFound(RoleId),

    #[error("a role named '{0}' already exists")]
    DuplicateRoleName(String),

    #[error("role name must be non-empty and at most 255 bytes")]
    InvalidRoleName,

    #[error("'{0}' is not a valid department for a user profile")]
    InvalidDepartment(String),

    #[error("{user} lacks {permission}")]
    Forbidden { user: String, permission: &'static str },

    #[error("already bootstrapped")]
    AlreadyBootstrapped,

    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("parent '{0}' not found")]
    ParentNotFound(String),

    #[error("node '{node}' cannot be placed under '{parent}'")]
    InvalidParent { node: String, parent: String },

    #[error("folder hierarchy around '{0}' is cyclic")]
    CyclicHierarchy(String),

    #[error("node '{node}' would sit deeper than {max} levels")]
    TreeTooDeep { node: String, max: usize },

    #[error("storage: {0}")]
    Storage(#[from] heed::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config: {0}")]
    Config(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for portal-access operations
pub type Result<T> = std::result::Result<T, AccessError>;

/// User-facing denial.
///
/// Renders identically whatever the cause, so a requester cannot tell a
/// missing node from an invisible one. The cause stays available for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied {
    reason: Option<Reason>,
}

impl AccessDenied {
    pub(crate) fn because(reason: Reason) -> Self {
        AccessDenied { reason: Some(reason) }
    }

    pub(crate) fn not_found() -> Self {
        AccessDenied { reason: None }
    }

    /// Backend-only cause. `None` means the node did not exist.
    pub fn reason(&self) -> Option<Reason> {
        self.reason
    }
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("access denied")
    }
}

impl std::error::Error for AccessDenied {}
