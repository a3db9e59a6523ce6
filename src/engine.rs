//! Access decision engine
//!
//! Order of checks for `decide`:
//! 1. inactive nodes are refused unless the action is the explicit
//!    "view inactive" action or the user holds the category's manage key
//! 2. the node must be visible to one of the user's departments
//! 3. owner → own key, anyone else → any key
//!
//! Decisions are values, never errors, and are computed fresh on each call.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::catalog::Permission;
use crate::error::{AccessDenied, Result};
use crate::node::ContentNode;
use crate::perms::PermissionSet;
use crate::profile::UserAuthProfile;
use crate::resolver::PermissionResolver;
use crate::store::RoleStore;
use crate::visibility;

/// Permission pair for an operation on a node.
/// `own == any` when ownership makes no difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub own: Permission,
    pub any: Permission,
    /// Administrative "view inactive" action; skips the inactive gate
    pub view_inactive: bool,
}

impl Action {
    pub const fn owned(own: Permission, any: Permission) -> Self {
        Action { own, any, view_inactive: false }
    }

    pub const fn uniform(key: Permission) -> Self {
        Action { own: key, any: key, view_inactive: false }
    }

    pub const fn view_inactive(key: Permission) -> Self {
        Action { own: key, any: key, view_inactive: true }
    }

    #[inline]
    pub fn required(&self, is_owner: bool) -> Permission {
        if is_owner {
            self.own
        } else {
            self.any
        }
    }
}

/// Machine-readable outcome, for audit logs and admin diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    Ok,
    NotVisible,
    MissingPermission,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: Reason,
}

impl AccessDecision {
    const fn allow() -> Self {
        AccessDecision { allowed: true, reason: Reason::Ok }
    }

    const fn deny(reason: Reason) -> Self {
        AccessDecision { allowed: false, reason }
    }

    /// Collapse into the user-facing form
    pub fn into_result(self) -> std::result::Result<(), AccessDenied> {
        if self.allowed {
            Ok(())
        } else {
            Err(AccessDenied::because(self.reason))
        }
    }
}

/// Composes permission resolution, visibility and ownership.
/// Holds no mutable state; share freely between request handlers.
#[derive(Debug, Clone, Default)]
pub struct AccessEngine {
    resolver: PermissionResolver,
}

impl AccessEngine {
    pub fn new(resolver: PermissionResolver) -> Self {
        AccessEngine { resolver }
    }

    /// Engine over a fresh snapshot of `store`
    pub fn from_store(store: &dyn RoleStore) -> Result<Self> {
        Ok(Self::new(PermissionResolver::from_store(store)?))
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Node-less check, e.g. `jobs:create`
    pub fn can(&self, profile: &UserAuthProfile, p: Permission) -> bool {
        self.resolver.has_permission(profile, p)
    }

    pub fn is_visible(&self, profile: &UserAuthProfile, node: &ContentNode) -> bool {
        visibility::is_visible(profile, node.visibility())
    }

    fn manage_override(perms: &PermissionSet, node: &ContentNode) -> bool {
        node.category().manage_key().is_some_and(|k| perms.contains(k))
    }

    fn evaluate(perms: &PermissionSet, profile: &UserAuthProfile, node: &ContentNode, action: Action) -> AccessDecision {
        if !node.is_active() && !action.view_inactive && !Self::manage_override(perms, node) {
            return AccessDecision::deny(Reason::Inactive);
        }
        if !visibility::is_visible(profile, node.visibility()) {
            return AccessDecision::deny(Reason::NotVisible);
        }
        let key = action.required(node.owner() == profile.user_id());
        if perms.contains(key) {
            AccessDecision::allow()
        } else {
            AccessDecision::deny(Reason::MissingPermission)
        }
    }

    /// Can `profile` perform `action` on `node`?
    pub fn decide(&self, profile: &UserAuthProfile, node: &ContentNode, action: Action) -> AccessDecision {
        let perms = self.resolver.effective_permissions(profile);
        let d = Self::evaluate(&perms, profile, node, action);
        if d.allowed {
            trace!(user = profile.user_id(), node = %node.id, own = %action.own, any = %action.any, "access allowed");
        } else {
            debug!(user = profile.user_id(), node = %node.id, own = %action.own, any = %action.any, reason = ?d.reason, "access denied");
        }
        d
    }

    /// Like `decide`, but a missing node is denied the same way as an
    /// invisible or forbidden one.
    pub fn authorize(
        &self,
        profile: &UserAuthProfile,
        node: Option<&ContentNode>,
        action: Action,
    ) -> std::result::Result<(), AccessDenied> {
        match node {
            Some(n) => self.decide(profile, n, action).into_result(),
            None => {
                debug!(user = profile.user_id(), "access denied: node not found");
                Err(AccessDenied::not_found())
            }
        }
    }

    /// Nodes the user may see in a listing, in input order. Inactive nodes
    /// are kept only for holders of the category's manage key.
    pub fn filter_visible<'n, I>(&self, profile: &UserAuthProfile, nodes: I) -> Vec<&'n ContentNode>
    where
        I: IntoIterator<Item = &'n ContentNode>,
    {
        let perms = self.resolver.effective_permissions(profile);
        nodes
            .into_iter()
            .filter(|n| n.is_active() || Self::manage_override(&perms, n))
            .filter(|n| visibility::is_visible(profile, n.visibility()))
            .collect()
    }
}
