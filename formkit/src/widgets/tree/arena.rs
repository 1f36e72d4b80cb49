//! Flat node storage for the tree.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A node as supplied by the consumer.
///
/// `has_children` with absent or empty `children` marks a node whose
/// children are loaded on first expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Unique within one tree
    pub id: String,
    /// Display text
    #[serde(default)]
    pub label: String,
    /// Loaded children, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    /// Children exist but may not be loaded yet
    #[serde(default)]
    pub has_children: bool,
    /// Disabled nodes cannot be expanded or selected
    #[serde(default)]
    pub disabled: bool,
}

impl TreeNode {
    /// A leaf node.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: None,
            has_children: false,
            disabled: false,
        }
    }

    /// Attach loaded children.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Mark the node as having children that still need loading.
    pub fn loadable(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Mark the node disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Stored form of a node. Structure lives in id lists.
#[derive(Debug, Clone)]
pub(super) struct NodeRecord {
    pub label: String,
    pub has_children: bool,
    pub disabled: bool,
    pub parent: Option<String>,
    /// `None` until children are delivered
    pub children: Option<Vec<String>>,
}

impl NodeRecord {
    /// Whether the node can be expanded at all.
    pub fn is_expandable(&self) -> bool {
        self.has_children || self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Whether expanding the node should request its children.
    pub fn needs_load(&self) -> bool {
        self.has_children && self.children.as_ref().is_none_or(|c| c.is_empty())
    }
}

/// Id-indexed node storage: a map of records plus the ordered root list.
#[derive(Debug, Default)]
pub(super) struct Arena {
    nodes: HashMap<String, NodeRecord>,
    roots: Vec<String>,
}

impl Arena {
    /// Build from consumer nodes. Nodes with an empty or repeated id are
    /// skipped together with their subtree.
    pub fn from_nodes(nodes: Vec<TreeNode>) -> Self {
        let mut arena = Self::default();
        for node in nodes {
            if let Some(id) = arena.insert_subtree(node, None) {
                arena.roots.push(id);
            }
        }
        arena
    }

    pub fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn children_of(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .and_then(|n| n.children.as_deref())
            .unwrap_or(&[])
    }

    /// Number of ancestors.
    pub fn depth(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = self.nodes.get(id).and_then(|n| n.parent.as_deref());
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes.get(parent).and_then(|n| n.parent.as_deref());
        }
        depth
    }

    /// All ids in pre-order, ignoring expansion.
    pub fn preorder(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<&String> = self.roots.iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id.clone());
            stack.extend(self.children_of(id).iter().rev());
        }
        out
    }

    fn insert_subtree(&mut self, node: TreeNode, parent: Option<&str>) -> Option<String> {
        if node.id.is_empty() {
            log::warn!("[tree] skipping node without id (label '{}')", node.label);
            return None;
        }
        if self.nodes.contains_key(&node.id) {
            log::warn!("[tree] skipping duplicate node id '{}'", node.id);
            return None;
        }

        let id = node.id;
        self.nodes.insert(
            id.clone(),
            NodeRecord {
                label: node.label,
                has_children: node.has_children,
                disabled: node.disabled,
                parent: parent.map(str::to_string),
                children: None,
            },
        );

        if let Some(children) = node.children {
            let ids = children
                .into_iter()
                .filter_map(|child| self.insert_subtree(child, Some(&id)))
                .collect();
            if let Some(record) = self.nodes.get_mut(&id) {
                record.children = Some(ids);
            }
        }
        Some(id)
    }

    fn remove_subtree(&mut self, id: &str) {
        let Some(record) = self.nodes.remove(id) else {
            return;
        };
        for child in record.children.unwrap_or_default() {
            self.remove_subtree(&child);
        }
    }

    /// Merge delivered children into `parent`, matching by id.
    ///
    /// Children that already exist under `parent` keep their records (and
    /// their own loaded children unless new ones are delivered); children
    /// that are no longer listed are removed with their subtrees. Returns
    /// false if `parent` does not exist.
    pub fn replace_children(&mut self, parent: &str, children: Vec<TreeNode>) -> bool {
        let Some(previous) = self.nodes.get(parent).map(|n| n.children.clone()) else {
            return false;
        };
        let previous: HashSet<String> = previous.unwrap_or_default().into_iter().collect();

        let mut ids: Vec<String> = Vec::with_capacity(children.len());
        for child in children {
            if ids.contains(&child.id) {
                log::warn!("[tree] skipping repeated child '{}' of '{}'", child.id, parent);
                continue;
            }
            if previous.contains(&child.id) {
                let id = child.id.clone();
                self.update_existing(child);
                ids.push(id);
            } else if let Some(id) = self.insert_subtree(child, Some(parent)) {
                ids.push(id);
            }
        }

        for stale in previous.iter().filter(|id| !ids.contains(id)) {
            self.remove_subtree(stale);
        }

        if let Some(record) = self.nodes.get_mut(parent) {
            record.children = Some(ids);
        }
        true
    }

    fn update_existing(&mut self, node: TreeNode) {
        if let Some(record) = self.nodes.get_mut(&node.id) {
            record.label = node.label;
            record.has_children = node.has_children;
            record.disabled = node.disabled;
        }
        if let Some(children) = node.children
            && !children.is_empty()
        {
            self.replace_children(&node.id, children);
        }
    }

    /// Rebuild nested nodes for export.
    pub fn to_nodes(&self) -> Vec<TreeNode> {
        self.roots.iter().filter_map(|id| self.export(id)).collect()
    }

    fn export(&self, id: &str) -> Option<TreeNode> {
        let record = self.nodes.get(id)?;
        Some(TreeNode {
            id: id.to_string(),
            label: record.label.clone(),
            children: record
                .children
                .as_ref()
                .map(|ids| ids.iter().filter_map(|c| self.export(c)).collect()),
            has_children: record.has_children,
            disabled: record.disabled,
        })
    }
}
