//! Tree widget state.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use crate::aria::AriaAttributes;
use crate::context::Scope;
use crate::events::{EventDetail, WidgetEvent, WidgetEventKind};
use crate::ids::WidgetId;

use super::arena::{Arena, TreeNode};
use super::load::{LoadRequest, LoadSlot};

/// Selection mode for the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Activation only moves the active node.
    None,
    /// Activation replaces the selection.
    #[default]
    Single,
    /// Activation toggles membership.
    Multiple,
}

/// A visible node in the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    /// Node id.
    pub id: String,
    /// Display text.
    pub label: String,
    /// Depth in tree (0 = root).
    pub depth: usize,
    /// Whether the node can be expanded.
    pub expandable: bool,
    /// Whether the node is currently expanded.
    pub expanded: bool,
    /// Whether children are being loaded.
    pub loading: bool,
    /// Whether the node is selected.
    pub selected: bool,
    /// Whether the node is disabled.
    pub disabled: bool,
}

/// Internal state for the Tree widget.
#[derive(Debug, Default)]
pub(super) struct TreeInner {
    /// Node storage.
    pub arena: Arena,
    /// Set of expanded node IDs.
    pub expanded: HashSet<String>,
    /// Set of selected node IDs.
    pub selected: HashSet<String>,
    /// Roving focus target.
    pub active: Option<String>,
    /// Selection mode.
    pub selection_mode: SelectionMode,
    /// Per-node load book-keeping.
    pub loads: HashMap<String, LoadSlot>,
    /// Flattened visible nodes (rebuilt on every structural change).
    pub visible: Vec<String>,
    /// Form field name.
    pub name: String,
}

impl TreeInner {
    /// Recompute the flattened visible order: pre-order, descending only
    /// into expanded nodes.
    pub fn rebuild_visible(&mut self) {
        let mut out = Vec::new();
        let mut stack: Vec<&String> = self.arena.roots().iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id.clone());
            if self.expanded.contains(id) {
                stack.extend(self.arena.children_of(id).iter().rev());
            }
        }
        self.visible = out;
    }

    /// Drop state that refers to nodes no longer in the arena.
    pub fn prune(&mut self) {
        let arena = &self.arena;
        self.expanded.retain(|id| arena.contains(id));
        self.selected.retain(|id| arena.contains(id));
        self.loads.retain(|id, slot| {
            let keep = arena.contains(id);
            if !keep && let Some(task) = slot.task.take() {
                task.abort();
            }
            keep
        });
        if self.active.as_ref().is_some_and(|id| !arena.contains(id)) {
            self.active = None;
        }
    }

    /// Selected ids in document order.
    pub fn selected_ordered(&self) -> Vec<String> {
        self.arena
            .preorder()
            .into_iter()
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    fn active_or_first(&self) -> Option<String> {
        self.active
            .clone()
            .or_else(|| self.arena.roots().first().cloned())
    }
}

/// A tree with expansion, selection, keyboard roving focus and lazy child
/// loading.
///
/// # Example
///
/// ```ignore
/// let tree = Tree::new(&cx).with_nodes(vec![TreeNode::new("x", "Docs").loadable()]);
/// let request = tree.toggle_expand("x", &cx).expect("loadable node");
/// request.resolve(vec![TreeNode::new("x1", "Child")])?;
/// assert_eq!(tree.children_of("x"), vec!["x1"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Unique identifier.
    id: WidgetId,
    /// Internal state.
    pub(super) inner: Arc<RwLock<TreeInner>>,
    /// Dirty flag for re-render.
    pub(super) dirty: Arc<AtomicBool>,
}

impl Tree {
    /// Create an empty tree with a generated id.
    pub fn new(cx: &Scope) -> Self {
        Self::with_id(cx.next_id("tree"))
    }

    /// Create an empty tree with an explicit id.
    pub fn with_id(id: impl Into<WidgetId>) -> Self {
        Self::from_parts(
            id.into(),
            Arc::new(RwLock::new(TreeInner::default())),
            Arc::new(AtomicBool::new(false)),
        )
    }

    pub(super) fn from_parts(
        id: WidgetId,
        inner: Arc<RwLock<TreeInner>>,
        dirty: Arc<AtomicBool>,
    ) -> Self {
        Self { id, inner, dirty }
    }

    /// Set the nodes.
    pub fn with_nodes(self, nodes: Vec<TreeNode>) -> Self {
        self.set_nodes(nodes);
        self
    }

    /// Set the selection mode.
    pub fn with_selection_mode(self, mode: SelectionMode) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection_mode = mode;
        }
        self
    }

    /// Start with these nodes expanded. Unknown ids are ignored.
    pub fn with_expanded<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut guard) = self.inner.write() {
            guard.expanded.extend(ids.into_iter().map(Into::into));
            guard.prune();
            guard.rebuild_visible();
        }
        self
    }

    /// Start with these nodes selected. Unknown ids are ignored.
    pub fn with_selected<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut guard) = self.inner.write() {
            guard.selected.extend(ids.into_iter().map(Into::into));
            guard.prune();
        }
        self
    }

    /// Set the form field name (the tree submits its selection).
    pub fn with_name(self, name: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.name = name.into();
        }
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    pub(super) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    /// Replace all nodes. Expansion and selection survive for ids that
    /// still exist; pending loads for removed nodes are dropped.
    pub fn set_nodes(&self, nodes: Vec<TreeNode>) {
        if let Ok(mut guard) = self.inner.write() {
            guard.arena = Arena::from_nodes(nodes);
            guard.prune();
            guard.rebuild_visible();
            self.mark_dirty();
        }
    }

    /// Export the current nodes.
    pub fn nodes(&self) -> Vec<TreeNode> {
        self.inner
            .read()
            .map(|g| g.arena.to_nodes())
            .unwrap_or_default()
    }

    /// Number of nodes stored.
    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.arena.len()).unwrap_or(0)
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a node exists.
    pub fn contains(&self, id: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.arena.contains(id))
            .unwrap_or(false)
    }

    /// Ids of a node's loaded children.
    pub fn children_of(&self, id: &str) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.arena.children_of(id).to_vec())
            .unwrap_or_default()
    }

    /// Label of a node.
    pub fn label_of(&self, id: &str) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.arena.get(id).map(|n| n.label.clone()))
    }

    /// Merge children into a node by id, without a load request.
    ///
    /// Re-applying the same children is a no-op for expansion and
    /// selection. Any outstanding request for the node becomes stale.
    pub fn apply_children(&self, id: &str, children: Vec<TreeNode>) -> bool {
        let applied = {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            if !guard.arena.replace_children(id, children) {
                return false;
            }
            let slot = guard.loads.entry(id.to_string()).or_default();
            slot.generation += 1;
            slot.pending = false;
            if let Some(task) = slot.task.take() {
                task.abort();
            }
            guard.prune();
            guard.rebuild_visible();
            true
        };
        self.mark_dirty();
        applied
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    /// Check if a node is expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.expanded.contains(id))
            .unwrap_or(false)
    }

    /// Expanded ids in document order.
    pub fn expanded(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| {
                g.arena
                    .preorder()
                    .into_iter()
                    .filter(|id| g.expanded.contains(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Expand if collapsed, collapse if expanded.
    ///
    /// Expanding a node that declares unloaded children emits `load-needed`
    /// and returns the request. While a request is outstanding, further
    /// expansions reuse it and return `None`.
    pub fn toggle_expand(&self, id: &str, cx: &Scope) -> Option<LoadRequest> {
        if self.is_expanded(id) {
            self.collapse(id, cx);
            None
        } else {
            self.expand(id, cx)
        }
    }

    /// Expand a node. Disabled or unknown nodes are ignored.
    pub fn expand(&self, id: &str, cx: &Scope) -> Option<LoadRequest> {
        let generation = {
            let mut guard = self.inner.write().ok()?;
            let record = guard.arena.get(id)?;
            if record.disabled || !record.is_expandable() {
                return None;
            }
            let needs_load = record.needs_load();
            if !guard.expanded.insert(id.to_string()) {
                return None;
            }
            guard.rebuild_visible();

            if needs_load {
                let slot = guard.loads.entry(id.to_string()).or_default();
                if slot.pending {
                    log::debug!("[tree] {} load of '{}' already pending", self.id, id);
                    None
                } else {
                    slot.generation += 1;
                    slot.pending = true;
                    Some(slot.generation)
                }
            } else {
                None
            }
        };
        self.mark_dirty();
        self.push_toggle(id, true, cx);

        let request = LoadRequest::new(self, id, generation?);
        log::debug!("[tree] {} requests children of '{}'", self.id, id);
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::LoadNeeded, self.id.clone())
                .with_detail(EventDetail::LoadNeeded(request.clone())),
        );
        Some(request)
    }

    /// Collapse a node. Returns false if it was not expanded.
    pub fn collapse(&self, id: &str, cx: &Scope) -> bool {
        let collapsed = match self.inner.write() {
            Ok(mut guard) => {
                let disabled = guard.arena.get(id).is_none_or(|n| n.disabled);
                let removed = !disabled && guard.expanded.remove(id);
                if removed {
                    guard.rebuild_visible();
                    if let Some(active) = guard.active.clone()
                        && !guard.visible.contains(&active)
                    {
                        guard.active = Some(id.to_string());
                    }
                }
                removed
            }
            Err(_) => false,
        };
        if collapsed {
            self.mark_dirty();
            self.push_toggle(id, false, cx);
        }
        collapsed
    }

    /// Expand every node whose children are loaded. Never triggers loads.
    pub fn expand_all(&self) {
        if let Ok(mut guard) = self.inner.write() {
            let ids: Vec<String> = guard
                .arena
                .preorder()
                .into_iter()
                .filter(|id| {
                    guard
                        .arena
                        .get(id)
                        .is_some_and(|n| !n.disabled && !guard.arena.children_of(id).is_empty())
                })
                .collect();
            guard.expanded.extend(ids);
            guard.rebuild_visible();
            self.mark_dirty();
        }
    }

    /// Collapse every node.
    pub fn collapse_all(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.expanded.clear();
            guard.rebuild_visible();
            if let Some(active) = guard.active.clone()
                && !guard.visible.contains(&active)
            {
                guard.active = None;
            }
            self.mark_dirty();
        }
    }

    fn push_toggle(&self, id: &str, expanded: bool, cx: &Scope) {
        cx.push_event(
            WidgetEvent::new(WidgetEventKind::Toggle, self.id.clone()).with_detail(
                EventDetail::Toggle {
                    id: id.to_string(),
                    expanded,
                },
            ),
        );
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Get the selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.inner
            .read()
            .map(|g| g.selection_mode)
            .unwrap_or_default()
    }

    /// Check if a node is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.inner
            .read()
            .map(|g| g.selected.contains(id))
            .unwrap_or(false)
    }

    /// Selected ids in document order.
    pub fn selected(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.selected_ordered())
            .unwrap_or_default()
    }

    /// Activate a node as the user would.
    ///
    /// Single mode replaces the selection, multiple mode toggles the node.
    /// The node always becomes active. Disabled or unknown nodes are
    /// ignored. Returns false when nothing happened.
    pub fn select(&self, id: &str, cx: &Scope) -> bool {
        let selected = {
            let Ok(mut guard) = self.inner.write() else {
                return false;
            };
            if guard.arena.get(id).is_none_or(|n| n.disabled) {
                return false;
            }
            guard.active = Some(id.to_string());
            match guard.selection_mode {
                SelectionMode::None => None,
                SelectionMode::Single => {
                    guard.selected.clear();
                    guard.selected.insert(id.to_string());
                    Some(guard.selected_ordered())
                }
                SelectionMode::Multiple => {
                    if !guard.selected.remove(id) {
                        guard.selected.insert(id.to_string());
                    }
                    Some(guard.selected_ordered())
                }
            }
        };
        self.mark_dirty();

        if let Some(selected) = selected {
            log::debug!("[tree] {} selected {:?}", self.id, selected);
            cx.push_event(
                WidgetEvent::new(WidgetEventKind::Select, self.id.clone()).with_detail(
                    EventDetail::Select {
                        id: id.to_string(),
                        selected,
                    },
                ),
            );
        }
        true
    }

    /// Clear the selection without events.
    pub fn clear_selection(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.selected.clear();
            self.mark_dirty();
        }
    }

    /// Form field name.
    pub fn name(&self) -> String {
        self.inner
            .read()
            .map(|g| g.name.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Roving focus
    // -------------------------------------------------------------------------

    /// The keyboard-focusable node: the last activated one, or the first
    /// root.
    pub fn active_id(&self) -> Option<String> {
        self.inner.read().ok().and_then(|g| g.active_or_first())
    }

    /// Make a node the keyboard-focusable one. Returns false for unknown or
    /// hidden nodes.
    pub fn set_active(&self, id: &str) -> bool {
        let Ok(mut guard) = self.inner.write() else {
            return false;
        };
        if !guard.visible.iter().any(|v| v == id) {
            return false;
        }
        guard.active = Some(id.to_string());
        self.mark_dirty();
        true
    }

    /// Move the active node by `delta` in visible order, without wrapping.
    /// Returns the new active id when it moved.
    pub fn move_active(&self, delta: isize) -> Option<String> {
        let mut guard = self.inner.write().ok()?;
        let current = guard.active_or_first()?;
        let pos = guard.visible.iter().position(|v| *v == current)?;
        let target = pos.checked_add_signed(delta)?;
        let next = guard.visible.get(target)?.clone();
        guard.active = Some(next.clone());
        drop(guard);
        self.mark_dirty();
        Some(next)
    }

    /// Ids in flattened visible order.
    pub fn visible_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.visible.clone())
            .unwrap_or_default()
    }

    /// Visible nodes with their render state.
    pub fn visible(&self) -> Vec<FlatNode> {
        let Ok(guard) = self.inner.read() else {
            return Vec::new();
        };
        guard
            .visible
            .iter()
            .filter_map(|id| {
                let record = guard.arena.get(id)?;
                Some(FlatNode {
                    id: id.clone(),
                    label: record.label.clone(),
                    depth: guard.arena.depth(id),
                    expandable: record.is_expandable(),
                    expanded: guard.expanded.contains(id),
                    loading: guard.loads.get(id).is_some_and(|s| s.pending),
                    selected: guard.selected.contains(id),
                    disabled: record.disabled,
                })
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Rendering contract
    // -------------------------------------------------------------------------

    /// ARIA attributes of the tree container.
    pub fn aria(&self) -> AriaAttributes {
        let mut aria = AriaAttributes::with_role("tree");
        if self.selection_mode() == SelectionMode::Multiple {
            aria.set_bool("aria-multiselectable", true);
        }
        aria
    }

    /// ARIA attributes of one visible item.
    pub fn item_aria(&self, id: &str) -> Option<AriaAttributes> {
        let node = self.visible().into_iter().find(|n| n.id == id)?;
        let active = self.active_id();

        let mut aria = AriaAttributes::with_role("treeitem");
        aria.set("aria-level", (node.depth + 1).to_string())
            .set(
                "tabindex",
                if active.as_deref() == Some(id) { "0" } else { "-1" },
            );
        if node.expandable {
            aria.set_bool("aria-expanded", node.expanded);
        }
        if self.selection_mode() != SelectionMode::None {
            aria.set_bool("aria-selected", node.selected);
        }
        if node.disabled {
            aria.set_bool("aria-disabled", true);
        }
        if node.loading {
            aria.set_bool("aria-busy", true);
        }
        Some(aria)
    }

    /// Check if the tree state has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
