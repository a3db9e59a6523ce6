//! Department-scoped visibility.
//!
//! Internally a tagged union; the legacy `["TODOS"]` array encoding exists
//! only at the (de)serialization boundary.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::constants::ALL_DEPARTMENTS_TOKEN;
use crate::profile::UserAuthProfile;

/// Who may discover a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Every department, including users with none
    All,
    /// Only members of at least one listed department. Empty means nobody.
    Departments(BTreeSet<String>),
}

impl Visibility {
    /// Writer-side normalization of the department selector: choosing
    /// "all" discards any explicit names.
    pub fn from_selection<I, S>(all: bool, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if all {
            Visibility::All
        } else {
            Visibility::Departments(departments.into_iter().map(Into::into).collect())
        }
    }

    pub fn departments<I, S>(departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_selection(false, departments)
    }

    /// Decode a persisted array. Any occurrence of the sentinel means `All`.
    pub fn from_legacy<S: AsRef<str>>(values: &[S]) -> Self {
        let has_all = values.iter().any(|v| v.as_ref() == ALL_DEPARTMENTS_TOKEN);
        if has_all {
            if values.len() > 1 {
                warn!(entries = values.len(), "visibility mixes the all-departments token with names; treating as all");
            }
            return Visibility::All;
        }
        Visibility::Departments(values.iter().map(|v| v.as_ref().to_string()).collect())
    }

    /// Encode for persistence: `All` → `["TODOS"]`, otherwise the sorted names
    pub fn to_legacy(&self) -> Vec<String> {
        match self {
            Visibility::All => vec![ALL_DEPARTMENTS_TOKEN.to_string()],
            Visibility::Departments(d) => d.iter().cloned().collect(),
        }
    }

    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, Visibility::All)
    }
}

impl Serialize for Visibility {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_legacy().serialize(s)
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let values = Vec::<String>::deserialize(d)?;
        Ok(Visibility::from_legacy(&values))
    }
}

/// Visibility is judged on the node alone; ancestors never widen or narrow
/// it, and ownership never overrides it.
pub fn is_visible(profile: &UserAuthProfile, visibility: &Visibility) -> bool {
    match visibility {
        Visibility::All => true,
        Visibility::Departments(allowed) => profile.departments().iter().any(|d| allowed.contains(d)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(depts: &[&str]) -> UserAuthProfile {
        let mut p = UserAuthProfile::new("u");
        for d in depts {
            p = p.with_department(*d).unwrap();
        }
        p
    }

    #[test]
    fn all_is_visible_to_everyone() {
        assert!(is_visible(&user(&[]), &Visibility::All));
        assert!(is_visible(&user(&["OPERACIONAL"]), &Visibility::All));
    }

    #[test]
    fn departments_need_an_intersection() {
        let v = Visibility::departments(["OPERACIONAL", "FINANCEIRO"]);
        assert!(is_visible(&user(&["FINANCEIRO"]), &v));
        assert!(is_visible(&user(&["RH", "OPERACIONAL"]), &v));
        assert!(!is_visible(&user(&["ADMINISTRATIVA"]), &v));
        assert!(!is_visible(&user(&[]), &v));
    }

    #[test]
    fn empty_department_list_hides_from_all() {
        let v = Visibility::departments(Vec::<String>::new());
        assert!(!is_visible(&user(&["OPERACIONAL"]), &v));
    }

    #[test]
    fn legacy_sentinel_round_trip() {
        let v: Visibility = serde_json::from_str(r#"["TODOS"]"#).unwrap();
        assert_eq!(v, Visibility::All);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"["TODOS"]"#);

        let v: Visibility = serde_json::from_str(r#"["OPERACIONAL"]"#).unwrap();
        assert_eq!(v, Visibility::departments(["OPERACIONAL"]));
    }

    #[test]
    fn mixed_legacy_array_normalizes_to_all() {
        assert_eq!(Visibility::from_legacy(&["OPERACIONAL", "TODOS"]), Visibility::All);
    }

    #[test]
    fn selection_all_drops_names() {
        let v = Visibility::from_selection(true, ["OPERACIONAL"]);
        assert_eq!(v.to_legacy(), vec!["TODOS".to_string()]);
    }
}
