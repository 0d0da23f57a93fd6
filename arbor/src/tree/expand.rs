//! Mounting, expansion and collapse.

use futures::future::BoxFuture;
use log::debug;

use crate::data::NodeData;
use crate::error::{Result, TreeError};
use crate::events::{ExpandEventArgs, TreeEventArgs};
use crate::level::{ChildContent, ChildSource};
use crate::node::{Expansion, NodeId, NodeParams, Reconciliation, TreeNode};
use crate::settings::ExpandSettings;

use super::state::Tree;

impl<D: NodeData> Tree<D> {
    // -------------------------------------------------------------------------
    // Root data
    // -------------------------------------------------------------------------

    /// Set the root data and render the roots from the first level.
    ///
    /// Roots whose value is still present are kept and reconciled; the rest
    /// are unmounted.
    pub async fn set_data(&mut self, data: Vec<D>) -> Result<()> {
        self.data = Some(data);
        self.render_children(None).await
    }

    /// Re-render the roots from the current data and levels.
    pub async fn render(&mut self) -> Result<()> {
        self.render_children(None).await
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Mount a hand-built node under `parent` (or as a root).
    ///
    /// The node registers with its owner, takes its place in the visible
    /// list, and expands or selects itself if its parameters ask for it.
    /// Child data in `params.data` is rendered with the level configuration.
    pub async fn mount(&mut self, parent: Option<NodeId>, params: NodeParams<D>) -> Result<NodeId> {
        self.mount_node(parent, params, ChildSource::Level).await
    }

    async fn mount_node(
        &mut self,
        parent: Option<NodeId>,
        params: NodeParams<D>,
        source: ChildSource,
    ) -> Result<NodeId> {
        let depth = match parent {
            Some(parent) => self.node(parent)?.depth + 1,
            None => 0,
        };
        let expanded = params.expanded;
        let selected = params.selected;

        let mut node = TreeNode::new(params, parent, depth);
        if source == ChildSource::Level {
            node.content = self.level_content(depth + 1, node.bound_data.clone());
        }
        let id = self.nodes.insert(node);

        match parent {
            Some(parent) => {
                self.node_mut(parent)?.add_item(id);
                if let Some(index) = self.insertion_index(parent) {
                    self.insert_in_current_items(index, id);
                }
            }
            None => {
                self.add_item(id);
                if self.current.is_some() {
                    let end = self.current_items().len();
                    self.insert_in_current_items(end, id);
                }
            }
        }

        if expanded {
            self.expand_node(id).await?;
        }
        if selected {
            self.select_item(id).await?;
        }

        Ok(id)
    }

    /// Unmount a node and its subtree.
    ///
    /// The node leaves the visible list and its owner's registry. If the
    /// selection pointed into the subtree it is forgotten.
    pub fn unmount(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node(id)?.parent;

        if let Some(index) = self.index_in_current(id) {
            let count = 1 + self.visible_descendants(id).len();
            self.remove_from_current_items(index, count);
        }

        match parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(parent) {
                    parent.remove_item(id);
                }
            }
            None => {
                self.remove_item(id);
            }
        }

        self.free_subtree(id);
        self.dirty = true;
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        if self.selected == Some(id) {
            self.selected = None;
        }
        for child in node.children {
            self.free_subtree(child);
        }
    }

    /// Push new external parameters to a node and apply the effects.
    pub async fn reconcile(&mut self, id: NodeId, params: NodeParams<D>) -> Result<Reconciliation> {
        let node = self.node_mut(id)?;
        let was_selected = node.selected;
        let effects = node.reconcile(params);
        let deselected = was_selected && !node.selected;
        if deselected && self.selected == Some(id) {
            debug!("Bound selection moved off {:?}", id);
            self.selected = None;
            self.dirty = true;
        }
        if effects.is_empty() {
            return Ok(effects);
        }
        debug!("Reconciling {:?}: {:?}", id, effects);

        if effects.children_changed {
            let node = self.node(id)?;
            let content = self.level_content(node.depth + 1, node.bound_data.clone());
            self.node_mut(id)?.content = content;
        }

        if effects.hide {
            self.hide(id, false).await?;
        } else if effects.expand {
            self.expand_node(id).await?;
        } else if effects.children_changed && self.node(id)?.expansion.is_visible() {
            self.render_children(Some(id)).await?;
        }

        if effects.select {
            self.select_item(id).await?;
        }

        Ok(effects)
    }

    /// Set a node's loading flag.
    pub fn start_loading(&mut self, id: NodeId, loading: bool) -> Result<()> {
        self.node_mut(id)?.loading = loading;
        self.dirty = true;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    /// Run the expand protocol for a node.
    ///
    /// The handler receives empty [`ExpandSettings`]; if it supplies data the
    /// node's child content is replaced. Cached child content is rendered
    /// when the node's children are visible.
    pub async fn expand_item(&mut self, id: NodeId) -> Result<()> {
        self.expand_node(id).await
    }

    fn expand_node(&mut self, id: NodeId) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let node = self.node_mut(id)?;
            let mut args = ExpandEventArgs {
                text: node.text.clone(),
                value: node.value.clone(),
                target: id,
                children: ExpandSettings::default(),
            };
            node.loading = true;
            debug!("Expanding {:?} ({})", id, args.text);

            let handler = self.handler.clone();
            let outcome = handler.on_expand(&mut args).await;

            let node = self.node_mut(id)?;
            node.loading = false;
            outcome.map_err(TreeError::Handler)?;

            if let Some(content) = args.children.into_content() {
                debug!("Expand of {:?} supplied {} children", id, content.data.len());
                node.content = Some(content);
            }

            if node.expansion.is_visible() && node.content.is_some() {
                self.render_children(Some(id)).await?;
            }
            self.dirty = true;
            Ok(())
        })
    }

    /// Toggle the visible expansion of a node.
    ///
    /// The first toggle expands the node. Later toggles hide and show its
    /// children; showing runs the expand protocol again.
    pub async fn toggle(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        match node.expansion.toggled() {
            Expansion::ExpandedVisible => {
                node.expansion = Expansion::ExpandedVisible;
                self.expand_node(id).await
            }
            _ => self.hide(id, true).await,
        }
    }

    /// Expand (`open`) or collapse a node explicitly.
    ///
    /// Expanding an already expanded node refreshes its children. Collapsing
    /// a node whose children are not shown does nothing.
    pub async fn expand_collapse(&mut self, id: NodeId, open: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if open {
            node.expansion = Expansion::ExpandedVisible;
            self.expand_node(id).await
        } else if node.expansion.is_visible() {
            self.hide(id, true).await
        } else {
            Ok(())
        }
    }

    /// Hide a visible node's children and unmount them.
    async fn hide(&mut self, id: NodeId, notify: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.expansion.is_visible() {
            return Ok(());
        }
        node.expansion = Expansion::ExpandedHidden;
        let children = node.children.clone();

        if let Some(index) = children.first().and_then(|&c| self.index_in_current(c)) {
            let count = self.visible_descendants(id).len();
            self.remove_from_current_items(index, count);
        }
        for child in children {
            self.unmount(child)?;
        }

        let node = self.node(id)?;
        debug!("Collapsed {:?} ({})", id, node.text);
        if notify {
            let args = TreeEventArgs {
                text: node.text.clone(),
                value: node.value.clone(),
            };
            let handler = self.handler.clone();
            handler.on_collapse(&args).await;
        }
        self.dirty = true;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Rendering children
    // -------------------------------------------------------------------------

    /// Render the child content of `parent` (or the root data).
    ///
    /// Existing children are matched to the new items by value: matches are
    /// reconciled in place, new items are mounted, leftovers are unmounted.
    fn render_children(&mut self, parent: Option<NodeId>) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let (content, existing, depth) = match parent {
                Some(parent) => {
                    let node = self.node(parent)?;
                    (node.content.clone(), node.children.clone(), node.depth + 1)
                }
                None => {
                    let content = self.data.clone().map(|data| ChildContent {
                        data,
                        accessors: self.level(0).accessors(),
                        source: ChildSource::Level,
                    });
                    (content, self.roots.clone(), 0)
                }
            };
            let items = content.as_ref().map(|c| c.data.as_slice()).unwrap_or_default();

            let mut remaining = existing;
            let mut matched = Vec::with_capacity(items.len());
            for item in items {
                let position = remaining
                    .iter()
                    .position(|&c| self.nodes.get(c).is_some_and(|n| &n.value == item));
                matched.push(position.map(|i| remaining.remove(i)));
            }
            for stale in remaining {
                self.unmount(stale)?;
            }

            let mut order = Vec::with_capacity(items.len());
            if let Some(content) = &content {
                for (item, existing) in content.data.iter().zip(matched) {
                    let params = self.params_for(content, item, depth);
                    let id = match existing {
                        Some(id) => {
                            self.reconcile(id, params).await?;
                            id
                        }
                        None => self.mount_node(parent, params, content.source).await?,
                    };
                    order.push(id);
                }
            }

            match parent {
                Some(parent) => self.node_mut(parent)?.children = order,
                None => self.roots = order,
            }
            self.resync(parent);
            Ok(())
        })
    }
}
