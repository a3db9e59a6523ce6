//! Permission catalog: the only source of valid permission keys.
//!
//! Keys are namespaced `category:action`. The catalog is fixed at compile
//! time; adding a permission means adding a line below and shipping.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::AccessError;

struct PermissionInfo {
    permission: Permission,
    key: &'static str,
    description: &'static str,
    category: Category,
}

struct CategoryInfo {
    category: Category,
    key: &'static str,
    name: &'static str,
    permissions: &'static [Permission],
    manage: Option<Permission>,
}

macro_rules! catalog {
    ($(
        $cat:ident ($cat_key:literal, $cat_name:literal, manage = $manage:expr) {
            $( $perm:ident => $key:literal, $desc:literal; )+
        }
    )+) => {
        /// A catalog permission. The discriminant is the bit index in a
        /// [`crate::PermissionSet`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Permission { $( $( $perm, )+ )+ }

        /// Permission category, in display order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Category { $( $cat, )+ }

        static PERMISSIONS: &[PermissionInfo] = &[
            $( $( PermissionInfo {
                permission: Permission::$perm,
                key: $key,
                description: $desc,
                category: Category::$cat,
            }, )+ )+
        ];

        static CATEGORIES: &[CategoryInfo] = &[
            $( CategoryInfo {
                category: Category::$cat,
                key: $cat_key,
                name: $cat_name,
                permissions: &[ $( Permission::$perm, )+ ],
                manage: $manage,
            }, )+
        ];
    };
}

catalog! {
    Timeline ("timeline", "Timeline", manage = Some(Permission::TimelineManage)) {
        TimelineView => "timeline:view", "View the timeline";
        TimelineCreate => "timeline:create", "Publish posts";
        TimelineEditOwn => "timeline:edit_own", "Edit own posts";
        TimelineEditAny => "timeline:edit_any", "Edit any post";
        TimelineDeleteOwn => "timeline:delete_own", "Delete own posts";
        TimelineDeleteAny => "timeline:delete_any", "Delete any post";
        TimelineComment => "timeline:comment", "Comment on posts";
        TimelineReact => "timeline:react", "React to posts";
        TimelineManage => "timeline:manage", "Moderate the timeline";
    }
    Files ("files", "Files", manage = Some(Permission::FilesManage)) {
        FilesView => "files:view", "Browse folders and files";
        FilesUpload => "files:upload", "Upload files";
        FilesCreateFolder => "files:create_folder", "Create folders";
        FilesEditOwn => "files:edit_own", "Rename or move own files and folders";
        FilesEditAny => "files:edit_any", "Rename or move any file or folder";
        FilesDeleteOwn => "files:delete_own", "Delete own files and folders";
        FilesDeleteAny => "files:delete_any", "Delete any file or folder";
        FilesDownload => "files:download", "Download files";
        FilesManage => "files:manage", "Manage file storage";
    }
    Knowledge ("knowledge", "Knowledge base", manage = Some(Permission::KnowledgeManage)) {
        KnowledgeView => "knowledge:view", "Read articles";
        KnowledgeCreate => "knowledge:create", "Write articles";
        KnowledgeEditOwn => "knowledge:edit_own", "Edit own articles";
        KnowledgeEditAny => "knowledge:edit_any", "Edit any article";
        KnowledgeDeleteOwn => "knowledge:delete_own", "Delete own articles";
        KnowledgeDeleteAny => "knowledge:delete_any", "Delete any article";
        KnowledgeManage => "knowledge:manage", "Manage the knowledge base";
    }
    Chat ("chat", "Chat", manage = Some(Permission::ChatManage)) {
        ChatUse => "chat:use", "Use the chat assistant";
        ChatViewHistory => "chat:view_history", "View conversation history";
        ChatManage => "chat:manage", "Manage chat settings";
    }
    Institutional ("institutional", "Institutional", manage = Some(Permission::InstitutionalManage)) {
        InstitutionalView => "institutional:view", "View institutional areas";
        InstitutionalCreate => "institutional:create", "Create institutional areas";
        InstitutionalEditOwn => "institutional:edit_own", "Edit own institutional areas";
        InstitutionalEditAny => "institutional:edit_any", "Edit any institutional area";
        InstitutionalDeleteOwn => "institutional:delete_own", "Delete own institutional areas";
        InstitutionalDeleteAny => "institutional:delete_any", "Delete any institutional area";
        InstitutionalManage => "institutional:manage", "Manage institutional areas";
    }
    Jobs ("jobs", "Job postings", manage = Some(Permission::JobsManage)) {
        JobsView => "jobs:view", "View job postings";
        JobsCreate => "jobs:create", "Publish job postings";
        JobsEditOwn => "jobs:edit_own", "Edit own job postings";
        JobsEditAny => "jobs:edit_any", "Edit any job posting";
        JobsDeleteOwn => "jobs:delete_own", "Delete own job postings";
        JobsDeleteAny => "jobs:delete_any", "Delete any job posting";
        JobsApply => "jobs:apply", "Apply to job postings";
        JobsManage => "jobs:manage", "Manage job postings";
    }
    Coins ("coins", "Coins", manage = Some(Permission::CoinsManage)) {
        CoinsView => "coins:view", "View coin balance and ranking";
        CoinsSend => "coins:send", "Send coins to colleagues";
        CoinsGrant => "coins:grant", "Grant coins as a reward";
        CoinsManage => "coins:manage", "Manage the coin programme";
    }
    Calendar ("calendar", "Calendar", manage = Some(Permission::CalendarManage)) {
        CalendarView => "calendar:view", "View events";
        CalendarCreate => "calendar:create", "Create events";
        CalendarEditOwn => "calendar:edit_own", "Edit own events";
        CalendarEditAny => "calendar:edit_any", "Edit any event";
        CalendarDeleteOwn => "calendar:delete_own", "Delete own events";
        CalendarDeleteAny => "calendar:delete_any", "Delete any event";
        CalendarManage => "calendar:manage", "Manage the calendar";
    }
    Users ("users", "Users", manage = Some(Permission::UsersManage)) {
        UsersView => "users:view", "View users";
        UsersCreate => "users:create", "Create users";
        UsersEdit => "users:edit", "Edit users";
        UsersDelete => "users:delete", "Delete users";
        UsersManage => "users:manage", "Assign roles and direct permissions";
    }
    Roles ("roles", "Roles", manage = None) {
        RolesView => "roles:view", "View roles";
        RolesManage => "roles:manage", "Create, edit and delete roles";
    }
}

impl Permission {
    #[inline]
    fn info(self) -> &'static PermissionInfo {
        &PERMISSIONS[self as usize]
    }

    /// Namespaced key, e.g. `files:delete_any`
    #[inline]
    pub fn key(self) -> &'static str {
        self.info().key
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }

    pub fn category(self) -> Category {
        self.info().category
    }

    /// Bit index within a permission set
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn from_index(i: usize) -> Option<Permission> {
        PERMISSIONS.get(i).map(|p| p.permission)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Permission {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).ok_or_else(|| AccessError::UnknownPermission(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = Permission;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a catalog permission key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Permission, E> {
                lookup(v).ok_or_else(|| E::custom(format!("unknown permission key '{}'", v)))
            }
        }

        d.deserialize_str(KeyVisitor)
    }
}

impl Category {
    #[inline]
    fn info(self) -> &'static CategoryInfo {
        &CATEGORIES[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.info().key
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Permissions of this category, in display order
    pub fn permissions(self) -> &'static [Permission] {
        self.info().permissions
    }

    /// Blanket `*:manage` key. Only consulted for the inactive-node bypass,
    /// never as a wildcard for the category's other keys.
    pub fn manage_key(self) -> Option<Permission> {
        self.info().manage
    }
}

/// All categories in display order
pub fn list_categories() -> impl Iterator<Item = Category> {
    CATEGORIES.iter().map(|c| c.category)
}

/// All permissions in catalog order
pub fn all_permissions() -> impl Iterator<Item = Permission> {
    PERMISSIONS.iter().map(|p| p.permission)
}

/// All keys in catalog order
pub fn all_keys() -> impl Iterator<Item = &'static str> {
    PERMISSIONS.iter().map(|p| p.key)
}

/// Number of catalog entries
pub fn len() -> usize {
    PERMISSIONS.len()
}

pub fn lookup(key: &str) -> Option<Permission> {
    PERMISSIONS.iter().find(|p| p.key == key).map(|p| p.permission)
}

pub fn exists(key: &str) -> bool {
    lookup(key).is_some()
}

pub fn category_of(p: Permission) -> Category {
    p.category()
}

/// SHA-256 over the ordered catalog (categories, keys, descriptions), hex encoded.
///
/// Clients that embed their own copy of the catalog compare this value to
/// detect drift.
pub fn fingerprint() -> String {
    let mut hasher = Sha256::new();
    for c in CATEGORIES {
        hasher.update(c.key.as_bytes());
        hasher.update(b"\n");
        for p in c.permissions {
            hasher.update(p.key().as_bytes());
            hasher.update(b"=");
            hasher.update(p.description().as_bytes());
            hasher.update(b"\n");
        }
    }
    hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}
