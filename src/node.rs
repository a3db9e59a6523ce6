//! Content nodes: folder trees (folders, files, links) and flat collections
//! (institutional areas, job postings, articles).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::constants::MAX_TREE_DEPTH;
use crate::error::{AccessError, Result};
use crate::visibility::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Folder,
    File,
    Link,
    InstitutionalArea,
    JobPosting,
    Article,
}

impl NodeKind {
    /// Permission category governing this kind
    pub fn category(self) -> Category {
        match self {
            NodeKind::Folder | NodeKind::File | NodeKind::Link => Category::Files,
            NodeKind::InstitutionalArea => Category::Institutional,
            NodeKind::JobPosting => Category::Jobs,
            NodeKind::Article => Category::Knowledge,
        }
    }

    /// Lives in a folder tree
    pub fn is_hierarchical(self) -> bool {
        matches!(self, NodeKind::Folder | NodeKind::File | NodeKind::Link)
    }
}

/// A piece of portal content as far as access control is concerned.
///
/// Persisted visibility uses the legacy field name and encoding
/// (`departamentoVisibilidade: ["TODOS"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    pub id: String,
    pub kind: NodeKind,
    pub owner_id: String,
    #[serde(rename = "departamentoVisibilidade", alias = "visibleDepartments")]
    pub visibility: Visibility,
    #[serde(default = "active_default")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

fn active_default() -> bool {
    true
}

impl ContentNode {
    /// Active node with no parent
    pub fn new(id: impl Into<String>, kind: NodeKind, owner_id: impl Into<String>, visibility: Visibility) -> Self {
        ContentNode {
            id: id.into(),
            kind,
            owner_id: owner_id.into(),
            visibility,
            active: true,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner_id
    }

    #[inline]
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

/// Id-indexed set of nodes with validated parent links
#[derive(Debug, Clone, Default)]
pub struct ContentTree {
    nodes: HashMap<String, ContentNode>,
    order: Vec<String>,
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. A parent must already exist and be a folder; flat
    /// collection items take no parent. Nesting is capped at
    /// `MAX_TREE_DEPTH` levels.
    pub fn insert(&mut self, node: ContentNode) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(AccessError::DuplicateNode(node.id));
        }
        if let Some(pid) = &node.parent_id {
            self.check_parent(&node, pid)?;
            self.check_depth(&node.id, pid, 1)?;
        }
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Move a node under a new parent (or to the root)
    pub fn reparent(&mut self, id: &str, parent_id: Option<&str>) -> Result<()> {
        let node = self.nodes.get(id).ok_or_else(|| AccessError::NodeNotFound(id.to_string()))?;
        if let Some(pid) = parent_id {
            self.check_parent(node, pid)?;
            if self.ancestor_ids(pid)?.iter().any(|a| a == id) {
                return Err(AccessError::CyclicHierarchy(id.to_string()));
            }
            self.check_depth(id, pid, self.height(id))?;
        }
        if let Some(n) = self.nodes.get_mut(id) {
            n.parent_id = parent_id.map(str::to_string);
        }
        Ok(())
    }

    fn check_parent(&self, node: &ContentNode, pid: &str) -> Result<()> {
        let invalid = || AccessError::InvalidParent { node: node.id.clone(), parent: pid.to_string() };
        if !node.kind.is_hierarchical() || pid == node.id {
            return Err(invalid());
        }
        let parent = self.nodes.get(pid).ok_or_else(|| AccessError::ParentNotFound(pid.to_string()))?;
        if parent.kind != NodeKind::Folder {
            return Err(invalid());
        }
        Ok(())
    }

    /// A subtree `height` levels tall hung under `pid` must stay within
    /// `MAX_TREE_DEPTH`.
    fn check_depth(&self, id: &str, pid: &str, height: usize) -> Result<()> {
        let parent = self.nodes.get(pid).ok_or_else(|| AccessError::ParentNotFound(pid.to_string()))?;
        let parent_level = self.ancestors(parent)?.len() + 1;
        if parent_level + height > MAX_TREE_DEPTH {
            return Err(AccessError::TreeTooDeep { node: id.to_string(), max: MAX_TREE_DEPTH });
        }
        Ok(())
    }

    /// Levels in the subtree rooted at `id`, counting `id` itself
    fn height(&self, id: &str) -> usize {
        let mut height = 0;
        let mut level = vec![id];
        while !level.is_empty() {
            height += 1;
            level = level.into_iter().flat_map(|p| self.children(p)).map(|n| n.id.as_str()).collect();
        }
        height
    }

    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ancestors from immediate parent to root; empty for flat collections
    pub fn ancestors(&self, node: &ContentNode) -> Result<Vec<&ContentNode>> {
        let mut out = Vec::new();
        if !node.kind.is_hierarchical() {
            return Ok(out);
        }
        let mut seen = HashSet::from([node.id.as_str()]);
        let mut cur = node.parent_id.as_deref();
        while let Some(pid) = cur {
            if !seen.insert(pid) {
                return Err(AccessError::CyclicHierarchy(node.id.clone()));
            }
            if out.len() + 1 >= MAX_TREE_DEPTH {
                return Err(AccessError::TreeTooDeep { node: node.id.clone(), max: MAX_TREE_DEPTH });
            }
            let parent = self.nodes.get(pid).ok_or_else(|| AccessError::ParentNotFound(pid.to_string()))?;
            out.push(parent);
            cur = parent.parent_id.as_deref();
        }
        Ok(out)
    }

    fn ancestor_ids(&self, id: &str) -> Result<Vec<String>> {
        let node = self.nodes.get(id).ok_or_else(|| AccessError::NodeNotFound(id.to_string()))?;
        let mut ids: Vec<String> = self.ancestors(node)?.into_iter().map(|n| n.id.clone()).collect();
        ids.insert(0, id.to_string());
        Ok(ids)
    }

    /// Direct children of a folder, in insertion order
    pub fn children(&self, folder_id: &str) -> Vec<&ContentNode> {
        self.iter().filter(|n| n.parent_id.as_deref() == Some(folder_id)).collect()
    }

    /// Root-level nodes (no parent), in insertion order
    pub fn roots(&self) -> Vec<&ContentNode> {
        self.iter().filter(|n| n.parent_id.is_none()).collect()
    }

    /// All nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ContentNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }
}
