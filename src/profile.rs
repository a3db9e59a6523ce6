//! User authorization profile, supplied by the identity collaborator

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Permission;
use crate::constants::ALL_DEPARTMENTS_TOKEN;
use crate::error::{AccessError, Result};
use crate::perms::PermissionSet;

/// What the core knows about an authenticated user.
///
/// `departments` never holds the "all departments" token; that token only
/// appears in node visibility lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile", into = "RawProfile")]
pub struct UserAuthProfile {
    user_id: String,
    departments: BTreeSet<String>,
    role_names: BTreeSet<String>,
    direct: PermissionSet,
}

impl UserAuthProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        UserAuthProfile {
            user_id: user_id.into(),
            departments: BTreeSet::new(),
            role_names: BTreeSet::new(),
            direct: PermissionSet::EMPTY,
        }
    }

    /// Build from raw collaborator data, validating departments and keys
    pub fn from_parts<D, R, P>(user_id: impl Into<String>, departments: D, role_names: R, direct: P) -> Result<Self>
    where
        D: IntoIterator,
        D::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let mut p = UserAuthProfile::new(user_id);
        for d in departments {
            p = p.with_department(d)?;
        }
        p.role_names = role_names.into_iter().map(Into::into).collect();
        p.direct = PermissionSet::parse(direct)?;
        Ok(p)
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Result<Self> {
        let department = department.into();
        if department == ALL_DEPARTMENTS_TOKEN || department.trim().is_empty() {
            return Err(AccessError::InvalidDepartment(department));
        }
        self.departments.insert(department);
        Ok(self)
    }

    pub fn with_role(mut self, name: impl Into<String>) -> Self {
        self.role_names.insert(name.into());
        self
    }

    /// Add a direct grant on top of role permissions
    pub fn with_direct(mut self, p: Permission) -> Self {
        self.direct.insert(p);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn departments(&self) -> &BTreeSet<String> {
        &self.departments
    }

    pub fn role_names(&self) -> &BTreeSet<String> {
        &self.role_names
    }

    pub fn direct_permissions(&self) -> &PermissionSet {
        &self.direct
    }
}

#[derive(Serialize, Deserialize)]
struct RawProfile {
    user_id: String,
    #[serde(default)]
    departments: Vec<String>,
    #[serde(default)]
    role_names: Vec<String>,
    #[serde(default)]
    direct_permissions: PermissionSet,
}

impl TryFrom<RawProfile> for UserAuthProfile {
    type Error = AccessError;

    fn try_from(raw: RawProfile) -> Result<Self> {
        let mut p = UserAuthProfile::from_parts(raw.user_id, raw.departments, raw.role_names, Vec::<&str>::new())?;
        p.direct = raw.direct_permissions;
        Ok(p)
    }
}

impl From<UserAuthProfile> for RawProfile {
    fn from(p: UserAuthProfile) -> Self {
        RawProfile {
            user_id: p.user_id,
            departments: p.departments.into_iter().collect(),
            role_names: p.role_names.into_iter().collect(),
            direct_permissions: p.direct,
        }
    }
}
