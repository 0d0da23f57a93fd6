//! Selection protocol.

use log::debug;

use crate::data::NodeData;
use crate::error::Result;
use crate::events::TreeEventArgs;
use crate::node::NodeId;

use super::state::Tree;

impl<D: NodeData> Tree<D> {
    /// Make `id` the selected node.
    ///
    /// Reselecting the current selection does nothing. Otherwise the previous
    /// selection is cleared visually, the value-changed callback fires if the
    /// bound value differs from the node's value, and the change callback
    /// always fires.
    pub async fn select_item(&mut self, id: NodeId) -> Result<()> {
        if self.selected == Some(id) {
            return Ok(());
        }

        let node = self.node_mut(id)?;
        node.selected = true;
        let args = TreeEventArgs {
            text: node.text.clone(),
            value: node.value.clone(),
        };

        if let Some(previous) = self.selected.replace(id)
            && let Some(previous) = self.nodes.get_mut(previous)
        {
            previous.selected = false;
        }
        self.dirty = true;
        debug!("Selected {:?} ({})", id, args.text);

        let handler = self.handler.clone();
        if self.value.as_ref() != Some(&args.value) {
            handler.on_value_changed(&args.value).await;
        }
        handler.on_change(&args).await;
        Ok(())
    }

    /// Mark a node selected and run the select protocol.
    pub async fn select(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.selected = true;
        self.select_item(id).await
    }

    /// Clear a node's selected mark.
    ///
    /// Only the node's own state changes; the tree keeps pointing at it until
    /// another node is selected or the selection is cleared.
    pub fn unselect(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.selected = false;
        self.dirty = true;
        Ok(())
    }

    /// Forget the current selection so the same node can be selected again.
    pub fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take()
            && let Some(node) = self.nodes.get_mut(previous)
        {
            node.selected = false;
            self.dirty = true;
        }
    }

    /// Set the externally bound selected value.
    ///
    /// Resetting the value to `None` forgets the current selection. Nodes
    /// pick up a new value on the next render.
    pub fn set_value(&mut self, value: Option<D>) {
        if self.value == value {
            return;
        }
        if value.is_none() {
            self.clear_selection();
        }
        self.value = value;
    }
}
