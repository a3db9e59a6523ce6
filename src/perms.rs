//! Permission sets as bitmasks (one bit per catalog entry)

use std::fmt;

use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use crate::catalog::{self, Permission};
use crate::error::Result;

/// Upper bound on catalog size
pub const CAPACITY: usize = 128;

/// Set of catalog permissions.
///
/// Serializes as an array of keys in catalog order, which is the persisted
/// role shape. Deserializing rejects unknown keys.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet(u128);

impl PermissionSet {
    pub const EMPTY: PermissionSet = PermissionSet(0);

    /// Every catalog permission
    pub fn all() -> Self {
        catalog::all_permissions().collect()
    }

    /// Parse keys, failing on the first one not in the catalog
    pub fn parse<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .map(|k| k.as_ref().parse::<Permission>())
            .collect()
    }

    #[inline]
    fn bit(p: Permission) -> u128 {
        1u128 << p.index()
    }

    #[inline]
    pub fn contains(&self, p: Permission) -> bool {
        self.0 & Self::bit(p) != 0
    }

    /// True if every permission in `other` is in `self`
    #[inline]
    pub fn contains_all(&self, other: &PermissionSet) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, p: Permission) -> bool {
        let had = self.contains(p);
        self.0 |= Self::bit(p);
        !had
    }

    #[inline]
    pub fn remove(&mut self, p: Permission) -> bool {
        let had = self.contains(p);
        self.0 &= !Self::bit(p);
        had
    }

    #[inline]
    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        PermissionSet(self.0 | other.0)
    }

    #[inline]
    pub fn difference(&self, other: &PermissionSet) -> PermissionSet {
        PermissionSet(self.0 & !other.0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in catalog order
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        (0..CAPACITY)
            .filter(move |i| self.0 & (1u128 << *i) != 0)
            .filter_map(Permission::from_index)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.iter().map(|p| p.key()).collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut s = PermissionSet::EMPTY;
        for p in iter {
            s.insert(p);
        }
        s
    }
}

impl Extend<Permission> for PermissionSet {
    fn extend<I: IntoIterator<Item = Permission>>(&mut self, iter: I) {
        for p in iter {
            self.insert(p);
        }
    }
}

impl<const N: usize> From<[Permission; N]> for PermissionSet {
    fn from(ps: [Permission; N]) -> Self {
        ps.into_iter().collect()
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|p| p.key())).finish()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(self.len()))?;
        for p in self.iter() {
            seq.serialize_element(&p)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = PermissionSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of permission keys")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<PermissionSet, A::Error> {
                let mut s = PermissionSet::EMPTY;
                while let Some(p) = seq.next_element::<Permission>()? {
                    s.insert(p);
                }
                Ok(s)
            }
        }

        d.deserialize_seq(SetVisitor)
    }
}
