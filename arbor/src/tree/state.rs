//! Tree state: arena, registries, flattened visible list, focus.

use std::sync::Arc;

use log::warn;
use slotmap::SlotMap;

use crate::config::TreeConfig;
use crate::data::NodeData;
use crate::error::{Result, TreeError};
use crate::events::{ItemRenderEventArgs, NoopHandler, TreeHandler};
use crate::level::{ChildContent, ChildSource, LevelConfig};
use crate::node::{Expansion, NodeId, NodeParams, TreeNode};

/// A visible node in the flattened tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// The node.
    pub id: NodeId,
    /// Template output, or the node text.
    pub text: String,
    /// Depth in tree (0 = root).
    pub depth: usize,
    /// Whether the node offers expansion.
    pub has_children: bool,
    /// Expansion state.
    pub expansion: Expansion,
    /// Whether the node is selected.
    pub selected: bool,
    /// Whether the node has keyboard focus.
    pub focused: bool,
    /// Whether an expand request is in flight.
    pub loading: bool,
}

/// A lazily expanding tree.
///
/// `Tree<D>` owns every node in an arena and coordinates:
/// - per-depth [`LevelConfig`]s turning raw data into nodes
/// - expansion through the [`TreeHandler`] (lazy loading)
/// - single selection and the bound value
/// - the flattened list of visible nodes and the keyboard focus
///
/// # Example
///
/// ```
/// use arbor::{LevelConfig, Tree};
/// use serde_json::{Value, json};
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let mut tree: Tree<Value> = Tree::default();
/// tree.add_level(LevelConfig::new()
///     .with_text_property("name")
///     .with_children_property("children"));
/// tree.set_data(vec![json!({ "name": "root", "children": [{ "name": "leaf" }] })])
///     .await
///     .unwrap();
///
/// let root = tree.roots()[0];
/// tree.toggle(root).await.unwrap();
/// let texts: Vec<_> = tree.rows().into_iter().map(|r| r.text).collect();
/// assert_eq!(texts, ["root", "leaf"]);
/// # });
/// ```
pub struct Tree<D: NodeData> {
    pub(super) nodes: SlotMap<NodeId, TreeNode<D>>,
    /// Root registry.
    pub(super) roots: Vec<NodeId>,
    pub(super) levels: Vec<Arc<LevelConfig<D>>>,
    /// Flattened visible nodes; `None` until first mutated, reading as the roots.
    pub(super) current: Option<Vec<NodeId>>,
    /// Focused index into the visible list.
    pub(super) focused: Option<usize>,
    pub(super) selected: Option<NodeId>,
    /// Externally bound selected value.
    pub(super) value: Option<D>,
    /// Root data.
    pub(super) data: Option<Vec<D>>,
    pub(super) handler: Arc<dyn TreeHandler<D>>,
    pub(super) config: TreeConfig,
    pub(super) dirty: bool,
}

impl<D: NodeData> Tree<D> {
    /// Create an empty tree reporting to `handler`.
    pub fn new(handler: impl TreeHandler<D> + 'static) -> Self {
        Self::with_config(handler, TreeConfig::default())
    }

    /// Create an empty tree with explicit configuration.
    pub fn with_config(handler: impl TreeHandler<D> + 'static, config: TreeConfig) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            levels: Vec::new(),
            current: None,
            focused: None,
            selected: None,
            value: None,
            data: None,
            handler: Arc::new(handler),
            config,
            dirty: false,
        }
    }

    /// Replace the handler.
    pub fn set_handler(&mut self, handler: impl TreeHandler<D> + 'static) {
        self.handler = Arc::new(handler);
    }

    /// Configuration in use.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Node access
    // -------------------------------------------------------------------------

    /// Get a mounted node.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode<D>> {
        self.nodes.get(id)
    }

    /// Get a mounted node or fail.
    pub fn node(&self, id: NodeId) -> Result<&TreeNode<D>> {
        self.nodes.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    pub(super) fn node_mut(&mut self, id: NodeId) -> Result<&mut TreeNode<D>> {
        self.nodes.get_mut(id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Number of mounted nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no nodes are mounted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes in order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Add a node to the root registry. Returns `false` if already present.
    pub fn add_item(&mut self, id: NodeId) -> bool {
        if self.roots.contains(&id) {
            return false;
        }
        self.roots.push(id);
        true
    }

    /// Remove a node from the root registry. Returns `false` if absent.
    pub fn remove_item(&mut self, id: NodeId) -> bool {
        let before = self.roots.len();
        self.roots.retain(|&r| r != id);
        self.roots.len() != before
    }

    /// Whether `other` is a strict descendant of `ancestor`.
    pub fn contains(&self, ancestor: NodeId, other: NodeId) -> bool {
        let mut parent = self.nodes.get(other).and_then(|n| n.parent);
        while let Some(id) = parent {
            if id == ancestor {
                return true;
            }
            parent = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Values of all mounted descendants in tree order.
    ///
    /// Each child is followed by its own descendants before the next sibling.
    pub fn all_child_values(&self, id: NodeId, predicate: Option<&dyn Fn(&D) -> bool>) -> Vec<D> {
        let mut values = Vec::new();
        self.collect_child_values(id, predicate, &mut values);
        values
    }

    fn collect_child_values(
        &self,
        id: NodeId,
        predicate: Option<&dyn Fn(&D) -> bool>,
        out: &mut Vec<D>,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for &child in &node.children {
            if let Some(child_node) = self.nodes.get(child)
                && predicate.is_none_or(|p| p(&child_node.value))
            {
                out.push(child_node.value.clone());
            }
            self.collect_child_values(child, predicate, out);
        }
    }

    /// Build render arguments for a row and let the handler decorate them.
    pub fn item_render_args(&self, id: NodeId) -> Result<ItemRenderEventArgs<D>> {
        let node = self.node(id)?;
        let mut args = ItemRenderEventArgs {
            attributes: Default::default(),
            value: node.value.clone(),
            data: self.all_child_values(id, None),
        };
        self.handler.on_item_render(&mut args);
        Ok(args)
    }

    // -------------------------------------------------------------------------
    // Levels
    // -------------------------------------------------------------------------

    /// Register the configuration for the next depth.
    ///
    /// Registering the same level twice is a no-op. Returns whether the level
    /// was added; the tree is marked dirty so the host re-renders.
    pub fn add_level(&mut self, level: impl Into<Arc<LevelConfig<D>>>) -> bool {
        let level = level.into();
        if self.levels.iter().any(|l| Arc::ptr_eq(l, &level)) {
            return false;
        }
        self.levels.push(level);
        self.dirty = true;
        true
    }

    /// Registered levels in depth order.
    pub fn levels(&self) -> &[Arc<LevelConfig<D>>] {
        &self.levels
    }

    /// Level for `depth`; the last level is reused below the configured ones.
    pub(super) fn level(&self, depth: usize) -> Arc<LevelConfig<D>> {
        match self.levels.get(depth).or_else(|| self.levels.last()) {
            Some(level) => level.clone(),
            None => Arc::new(LevelConfig::default()),
        }
    }

    /// Level-driven child content for children living at `depth`.
    pub(super) fn level_content(&self, depth: usize, data: Option<Vec<D>>) -> Option<ChildContent<D>> {
        let data = data?;
        if !self.config.allows_depth(depth) {
            return None;
        }
        Some(ChildContent {
            data,
            accessors: self.level(depth).accessors(),
            source: ChildSource::Level,
        })
    }

    /// External parameters for `item`, rendered at `depth` from `content`.
    pub(super) fn params_for(&self, content: &ChildContent<D>, item: &D, depth: usize) -> NodeParams<D> {
        let mut params = content.params_for(item, self.value.as_ref());
        if content.source == ChildSource::Level {
            params.data = self.level(depth).children_of(item);
        }
        params
    }

    // -------------------------------------------------------------------------
    // Flattened visible list
    // -------------------------------------------------------------------------

    /// Currently visible nodes in display order.
    pub fn current_items(&self) -> &[NodeId] {
        match &self.current {
            Some(current) => current,
            None => &self.roots,
        }
    }

    fn current_mut(&mut self) -> &mut Vec<NodeId> {
        self.current.get_or_insert_with(|| self.roots.clone())
    }

    pub(super) fn index_in_current(&self, id: NodeId) -> Option<usize> {
        self.current_items().iter().position(|&c| c == id)
    }

    /// Insert a node into the visible list.
    ///
    /// Stale indices beyond the end are ignored. Returns whether the node was
    /// inserted.
    pub fn insert_in_current_items(&mut self, index: usize, id: NodeId) -> bool {
        if index > self.current_items().len() {
            warn!("Ignoring insert at stale index {} for {:?}", index, id);
            return false;
        }
        self.current_mut().insert(index, id);
        self.dirty = true;
        true
    }

    /// Remove `count` nodes from the visible list starting at `index`.
    ///
    /// A focus beyond `index` snaps back to `index`.
    pub fn remove_from_current_items(&mut self, index: usize, count: usize) {
        let len = self.current_items().len();
        if index < len {
            let end = index.saturating_add(count).min(len);
            self.current_mut().drain(index..end);
            self.dirty = true;
        }

        if let Some(focused) = self.focused
            && focused > index
        {
            self.focused = Some(index);
        }
        self.clamp_focus();
    }

    /// Mounted descendants of `id` in display order.
    pub(super) fn visible_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_visible(id, &mut out);
        out
    }

    fn collect_visible(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        for &child in &node.children {
            out.push(child);
            self.collect_visible(child, out);
        }
    }

    /// Index right after `parent` and its descendants already in the list.
    pub(super) fn insertion_index(&self, parent: NodeId) -> Option<usize> {
        let current = self.current_items();
        let start = current.iter().position(|&c| c == parent)? + 1;
        let offset = current[start..]
            .iter()
            .take_while(|&&c| self.contains(parent, c))
            .count();
        Some(start + offset)
    }

    /// Rewrite the visible block below `parent` to match its subtree.
    pub(super) fn resync(&mut self, parent: Option<NodeId>) {
        match parent {
            Some(parent) => {
                let Some(index) = self.index_in_current(parent) else {
                    return;
                };
                let Some(end) = self.insertion_index(parent) else {
                    return;
                };
                let block = self.visible_descendants(parent);
                self.current_mut().splice(index + 1..end, block);
            }
            None => {
                if self.current.is_none() {
                    return;
                }
                let mut all = Vec::new();
                for &root in &self.roots {
                    all.push(root);
                    self.collect_visible(root, &mut all);
                }
                self.current = Some(all);
            }
        }
        self.dirty = true;
        self.clamp_focus();
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Focused index into the visible list.
    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    /// Set the focused index. Out-of-range indices are clamped.
    pub fn set_focused_index(&mut self, index: Option<usize>) {
        self.focused = index;
        self.clamp_focus();
        self.dirty = true;
    }

    /// Node under the focus.
    pub fn focused_node(&self) -> Option<NodeId> {
        self.focused
            .and_then(|i| self.current_items().get(i).copied())
    }

    /// Whether `id` has the keyboard focus.
    pub fn is_focused(&self, id: NodeId) -> bool {
        self.focused_node() == Some(id)
    }

    pub(super) fn clamp_focus(&mut self) {
        let len = self.current_items().len();
        if let Some(focused) = self.focused
            && focused >= len
        {
            self.focused = len.checked_sub(1);
        }
    }

    // -------------------------------------------------------------------------
    // Selection state
    // -------------------------------------------------------------------------

    /// The selected node.
    pub fn selected_item(&self) -> Option<NodeId> {
        self.selected
    }

    /// The externally bound value.
    pub fn value(&self) -> Option<&D> {
        self.value.as_ref()
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Visible rows in display order.
    pub fn rows(&self) -> Vec<TreeRow> {
        let focused = self.focused_node();
        self.current_items()
            .iter()
            .filter_map(|&id| {
                let node = self.nodes.get(id)?;
                Some(TreeRow {
                    id,
                    text: node.display(),
                    depth: node.depth,
                    has_children: node.has_children || node.content.is_some(),
                    expansion: node.expansion,
                    selected: node.selected,
                    focused: focused == Some(id),
                    loading: node.loading,
                })
            })
            .collect()
    }

    /// Check if the tree has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

impl<D: NodeData> Default for Tree<D> {
    fn default() -> Self {
        Self::new(NoopHandler)
    }
}

impl<D: NodeData + std::fmt::Debug> std::fmt::Debug for Tree<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("roots", &self.roots)
            .field("levels", &self.levels.len())
            .field("current", &self.current_items())
            .field("focused", &self.focused)
            .field("selected", &self.selected)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
