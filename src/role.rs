//! Roles: named bundles of catalog permissions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_ROLE_NAME_LEN;
use crate::error::{AccessError, Result};
use crate::perms::PermissionSet;

/// Store-assigned role identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub u64);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Persisted shape: `{id, name, description, permissions: [key, ...]}`.
/// An empty permission set is legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub permissions: PermissionSet,
}

/// Partial update. `permissions` replaces the whole set when present.
#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

impl RoleUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, d: impl Into<String>) -> Self {
        self.description = Some(d.into());
        self
    }

    pub fn permissions<S: AsRef<str>>(mut self, keys: &[S]) -> Self {
        self.permissions = Some(keys.iter().map(|k| k.as_ref().to_string()).collect());
        self
    }

    /// Validate keys before any store is touched
    pub(crate) fn validate(&self) -> Result<ValidUpdate> {
        let permissions = match &self.permissions {
            Some(keys) => Some(PermissionSet::parse(keys)?),
            None => None,
        };
        Ok(ValidUpdate {
            description: self.description.clone(),
            permissions,
        })
    }
}

pub(crate) struct ValidUpdate {
    pub description: Option<String>,
    pub permissions: Option<PermissionSet>,
}

impl ValidUpdate {
    pub fn apply(self, role: &mut Role) {
        if let Some(d) = self.description {
            role.description = d;
        }
        if let Some(p) = self.permissions {
            role.permissions = p;
        }
    }
}

/// Name must be non-empty after trimming and fit `MAX_ROLE_NAME_LEN`;
/// it is stored as given.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.len() > MAX_ROLE_NAME_LEN {
        return Err(AccessError::InvalidRoleName);
    }
    Ok(())
}

/// Shared create-time validation for every store backend
pub(crate) fn validate_new<S: AsRef<str>>(name: &str, permissions: &[S]) -> Result<PermissionSet> {
    validate_name(name)?;
    PermissionSet::parse(permissions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Permission;

    #[test]
    fn persisted_shape() {
        let r = Role {
            id: RoleId(7),
            name: "Editor".into(),
            description: "Writes articles".into(),
            permissions: PermissionSet::from([Permission::KnowledgeCreate, Permission::KnowledgeEditOwn]),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "id": 7,
                "name": "Editor",
                "description": "Writes articles",
                "permissions": ["knowledge:create", "knowledge:edit_own"]
            })
        );
        let back: Role = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn blank_names_rejected() {
        assert!(matches!(validate_new::<&str>("  ", &[]), Err(AccessError::InvalidRoleName)));
        assert!(validate_new::<&str>("Bookkeeping", &[]).unwrap().is_empty());
    }

    #[test]
    fn name_length_limit() {
        assert!(validate_name(&"r".repeat(MAX_ROLE_NAME_LEN)).is_ok());
        assert!(matches!(validate_name(&"r".repeat(MAX_ROLE_NAME_LEN + 1)), Err(AccessError::InvalidRoleName)));
        // bytes, not chars
        assert!(matches!(validate_name(&"ç".repeat(128)), Err(AccessError::InvalidRoleName)));
    }

    #[test]
    fn update_replaces_wholesale() {
        let mut r = Role {
            id: RoleId(1),
            name: "Editor".into(),
            description: String::new(),
            permissions: PermissionSet::from([Permission::KnowledgeCreate, Permission::KnowledgeEditOwn]),
        };
        RoleUpdate::new().permissions(&["files:view"]).validate().unwrap().apply(&mut r);
        assert_eq!(r.permissions, PermissionSet::from([Permission::FilesView]));
        assert_eq!(r.description, "");
    }

    #[test]
    fn update_with_unknown_key_fails_validation() {
        let e = RoleUpdate::new().permissions(&["files:view", "files:nuke"]).validate();
        assert!(matches!(e, Err(AccessError::UnknownPermission(k)) if k == "files:nuke"));
    }
}
