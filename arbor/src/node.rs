//! Tree nodes and their local state machine.

use std::fmt;

use slotmap::new_key_type;

use crate::data::NodeData;
use crate::level::{ChildContent, Template};

new_key_type! {
    /// Handle to a node stored in a [`Tree`](crate::Tree).
    ///
    /// Handles are generational: a handle to an unmounted node never
    /// resolves to a node mounted later in the same slot.
    pub struct NodeId;
}

/// Expansion state of a node.
///
/// Once a node has been expanded it never returns to `Collapsed`; hiding it
/// again only toggles visibility, so its child data stays cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Expansion {
    /// Never expanded.
    #[default]
    Collapsed,
    /// Expanded, children shown.
    ExpandedVisible,
    /// Expanded at least once, children hidden.
    ExpandedHidden,
}

impl Expansion {
    /// Whether the node has been expanded at least once.
    pub fn is_expanded(self) -> bool {
        !matches!(self, Expansion::Collapsed)
    }

    /// Whether children are currently shown.
    pub fn is_visible(self) -> bool {
        matches!(self, Expansion::ExpandedVisible)
    }

    /// The state after a user toggle.
    pub fn toggled(self) -> Self {
        match self {
            Expansion::Collapsed | Expansion::ExpandedHidden => Expansion::ExpandedVisible,
            Expansion::ExpandedVisible => Expansion::ExpandedHidden,
        }
    }
}

/// Externally bound parameters of a node.
///
/// Produced by the tree from level or expand settings, or by the host for
/// hand-built nodes, and pushed again on every render through
/// [`Tree::reconcile`](crate::Tree::reconcile).
pub struct NodeParams<D> {
    /// Display text.
    pub text: String,
    /// Data item represented by the node.
    pub value: D,
    /// Whether the node offers expansion.
    pub has_children: bool,
    /// Requested expansion.
    pub expanded: bool,
    /// Requested selection.
    pub selected: bool,
    /// Known child items, if any.
    pub data: Option<Vec<D>>,
    /// Row template.
    pub template: Option<Template<D>>,
}

impl<D: NodeData> NodeParams<D> {
    /// Parameters for a collapsed, unselected node with the given text.
    pub fn new(text: impl Into<String>, value: D) -> Self {
        Self {
            text: text.into(),
            value,
            has_children: false,
            expanded: false,
            selected: false,
            data: None,
            template: None,
        }
    }

    /// Marks the node as having children.
    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    /// Requests expansion.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Requests selection.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Supplies known child items.
    pub fn with_data(mut self, data: Vec<D>) -> Self {
        self.data = Some(data);
        self
    }
}

impl<D: Clone> Clone for NodeParams<D> {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            value: self.value.clone(),
            has_children: self.has_children,
            expanded: self.expanded,
            selected: self.selected,
            data: self.data.clone(),
            template: self.template.clone(),
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for NodeParams<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeParams")
            .field("text", &self.text)
            .field("value", &self.value)
            .field("has_children", &self.has_children)
            .field("expanded", &self.expanded)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

/// Side effects produced by [`TreeNode::reconcile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Run the expand protocol.
    pub expand: bool,
    /// Hide the node's children.
    pub hide: bool,
    /// Known child items changed.
    pub children_changed: bool,
    /// Run the select protocol.
    pub select: bool,
}

impl Reconciliation {
    /// Whether anything needs to happen.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single node in the tree arena.
pub struct TreeNode<D> {
    pub(crate) text: String,
    pub(crate) value: D,
    pub(crate) has_children: bool,
    pub(crate) expansion: Expansion,
    pub(crate) selected: bool,
    pub(crate) loading: bool,
    pub(crate) depth: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) template: Option<Template<D>>,
    pub(crate) content: Option<ChildContent<D>>,
    /// Last external values, used to detect parameter changes.
    pub(crate) bound_expanded: bool,
    pub(crate) bound_selected: bool,
    pub(crate) bound_data: Option<Vec<D>>,
}

impl<D: NodeData> TreeNode<D> {
    pub(crate) fn new(params: NodeParams<D>, parent: Option<NodeId>, depth: usize) -> Self {
        Self {
            text: params.text,
            value: params.value,
            has_children: params.has_children,
            expansion: if params.expanded {
                Expansion::ExpandedVisible
            } else {
                Expansion::Collapsed
            },
            selected: params.selected,
            loading: false,
            depth,
            parent,
            children: Vec::new(),
            template: params.template,
            content: None,
            bound_expanded: params.expanded,
            bound_selected: params.selected,
            bound_data: params.data,
        }
    }

    /// Display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Data item represented by this node.
    pub fn value(&self) -> &D {
        &self.value
    }

    /// Whether the node offers expansion.
    pub fn has_children(&self) -> bool {
        self.has_children
    }

    /// Current expansion state.
    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    /// Whether the node is marked selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether an expand request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Depth below the roots (roots are 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parent node, `None` for roots.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Mounted children in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether child content is known (cached data or supplied children).
    pub fn has_child_content(&self) -> bool {
        self.content.is_some()
    }

    /// Text for display: the template output, or the plain text.
    pub fn display(&self) -> String {
        match &self.template {
            Some(template) => template(self),
            None => self.text.clone(),
        }
    }

    /// Adds a child to the registry. Returns `false` if already present.
    pub(crate) fn add_item(&mut self, child: NodeId) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Removes a child from the registry. Returns `false` if absent.
    pub(crate) fn remove_item(&mut self, child: NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        self.children.len() != before
    }

    /// Adopts new external parameters and reports the resulting effects.
    ///
    /// Only parameters that changed since the previous call are acted on,
    /// so the internal state can diverge from the bound state through user
    /// interaction until the host pushes a different value.
    pub fn reconcile(&mut self, params: NodeParams<D>) -> Reconciliation {
        let mut effects = Reconciliation::default();

        self.text = params.text;
        self.has_children = params.has_children;
        self.template = params.template;

        if params.expanded != self.bound_expanded {
            self.bound_expanded = params.expanded;
            if params.expanded != self.expansion.is_visible() {
                if params.expanded {
                    self.expansion = Expansion::ExpandedVisible;
                    effects.expand = true;
                } else if self.expansion.is_visible() {
                    effects.hide = true;
                }
            }
        }

        if params.value != self.value {
            self.value = params.value;
            effects.expand |= self.expansion.is_expanded() && !effects.hide;
        }

        if params.data != self.bound_data {
            self.bound_data = params.data;
            effects.children_changed = true;
        }

        if params.selected != self.bound_selected {
            self.bound_selected = params.selected;
            self.selected = params.selected;
            effects.select = params.selected;
        }

        effects
    }
}

impl<D: fmt::Debug> fmt::Debug for TreeNode<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("text", &self.text)
            .field("value", &self.value)
            .field("expansion", &self.expansion)
            .field("selected", &self.selected)
            .field("loading", &self.loading)
            .field("depth", &self.depth)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(params: NodeParams<String>) -> TreeNode<String> {
        TreeNode::new(params, None, 0)
    }

    #[test]
    fn test_toggle_never_returns_to_collapsed() {
        let state = Expansion::Collapsed.toggled();
        assert_eq!(state, Expansion::ExpandedVisible);
        assert_eq!(state.toggled(), Expansion::ExpandedHidden);
        assert_eq!(state.toggled().toggled(), Expansion::ExpandedVisible);
    }

    #[test]
    fn test_seeded_expansion() {
        let n = node(NodeParams::new("a", "a".to_string()).expanded(true));
        assert_eq!(n.expansion(), Expansion::ExpandedVisible);
    }

    #[test]
    fn test_registry_is_idempotent() {
        let mut n = node(NodeParams::new("a", "a".to_string()));
        let mut keys = slotmap::SlotMap::<NodeId, ()>::with_key();
        let child = keys.insert(());

        assert!(n.add_item(child));
        assert!(!n.add_item(child));
        assert_eq!(n.children(), &[child]);
        assert!(n.remove_item(child));
        assert!(!n.remove_item(child));
        assert!(n.children().is_empty());
    }

    #[test]
    fn test_reconcile_unchanged_is_empty() {
        let params = NodeParams::new("a", "a".to_string());
        let mut n = node(params.clone());
        assert!(n.reconcile(params).is_empty());
    }

    #[test]
    fn test_reconcile_expand_request() {
        let mut n = node(NodeParams::new("a", "a".to_string()));
        let effects = n.reconcile(NodeParams::new("a", "a".to_string()).expanded(true));
        assert!(effects.expand);
        assert_eq!(n.expansion(), Expansion::ExpandedVisible);
    }

    #[test]
    fn test_reconcile_collapse_request_hides() {
        let mut n = node(NodeParams::new("a", "a".to_string()).expanded(true));
        let effects = n.reconcile(NodeParams::new("a", "a".to_string()));
        assert!(effects.hide);
        assert!(!effects.expand);
    }

    #[test]
    fn test_reconcile_value_change_reexpands_when_expanded() {
        let mut n = node(NodeParams::new("a", "a".to_string()).expanded(true));
        let effects = n.reconcile(NodeParams::new("a", "b".to_string()).expanded(true));
        assert!(effects.expand);
        assert_eq!(n.value(), "b");

        let mut collapsed = node(NodeParams::new("a", "a".to_string()));
        let effects = collapsed.reconcile(NodeParams::new("a", "b".to_string()));
        assert!(!effects.expand);
    }

    #[test]
    fn test_reconcile_selected_change() {
        let mut n = node(NodeParams::new("a", "a".to_string()));
        let effects = n.reconcile(NodeParams::new("a", "a".to_string()).selected(true));
        assert!(effects.select);
        assert!(n.is_selected());

        let effects = n.reconcile(NodeParams::new("a", "a".to_string()).selected(false));
        assert!(!effects.select);
        assert!(!n.is_selected());
    }

    #[test]
    fn test_reconcile_ignores_repeated_bound_value() {
        let mut n = node(NodeParams::new("a", "a".to_string()).expanded(true));
        n.expansion = Expansion::ExpandedHidden;
        // Host still says expanded; the user's hide is kept.
        let effects = n.reconcile(NodeParams::new("a", "a".to_string()).expanded(true));
        assert!(effects.is_empty());
        assert_eq!(n.expansion(), Expansion::ExpandedHidden);
    }

    #[test]
    fn test_display_uses_template() {
        let mut params = NodeParams::new("a", "a".to_string());
        params.template = Some(std::sync::Arc::new(|n: &TreeNode<String>| {
            format!("<{}>", n.text())
        }));
        assert_eq!(node(params).display(), "<a>");
    }
}
