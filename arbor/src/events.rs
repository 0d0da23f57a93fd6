//! Notifications raised by the tree and the handler that receives them.
//!
//! The tree never renders anything itself. Every interaction that the host
//! may care about (selection, expansion, collapse, per-row attributes) is
//! reported through a [`TreeHandler`]. All handler methods default to doing
//! nothing, so a host implements only the callbacks it needs.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::data::NodeData;
use crate::node::NodeId;
use crate::settings::ExpandSettings;

/// Error type returned by handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// Event Result
// =============================================================================

/// Result of handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Key was ignored; the host should apply its default handling.
    Ignored,
    /// Key was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

// =============================================================================
// Event arguments
// =============================================================================

/// Text and value of the node a selection or collapse refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEventArgs<D> {
    /// Node text.
    pub text: String,
    /// Node value.
    pub value: D,
}

/// Argument of [`TreeHandler::on_expand`].
///
/// Populate `children` (at least `children.data`) to render child nodes.
#[derive(Debug)]
pub struct ExpandEventArgs<D> {
    /// Text of the expanded node.
    pub text: String,
    /// Value of the expanded node.
    pub value: D,
    /// The expanded node.
    pub target: NodeId,
    /// Children to render, empty by default.
    pub children: ExpandSettings<D>,
}

/// Argument of [`TreeHandler::on_item_render`].
#[derive(Debug)]
pub struct ItemRenderEventArgs<D> {
    /// Attributes to attach to the rendered row.
    pub attributes: HashMap<String, String>,
    /// Value of the rendered node.
    pub value: D,
    /// Values of all mounted descendants, in tree order.
    pub data: Vec<D>,
}

// =============================================================================
// Handler
// =============================================================================

/// Receives the tree's callbacks.
#[async_trait]
pub trait TreeHandler<D: NodeData>: Send + Sync {
    /// A node is being expanded.
    ///
    /// Populate `args.children` to supply children, either directly or after
    /// awaiting a data source. Errors propagate out of the expanding call.
    async fn on_expand(&self, _args: &mut ExpandEventArgs<D>) -> Result<(), BoxError> {
        Ok(())
    }

    /// The selection changed.
    async fn on_change(&self, _args: &TreeEventArgs<D>) {}

    /// A node was collapsed.
    async fn on_collapse(&self, _args: &TreeEventArgs<D>) {}

    /// The selected value differs from the bound value.
    async fn on_value_changed(&self, _value: &D) {}

    /// A row is about to be rendered.
    fn on_item_render(&self, _args: &mut ItemRenderEventArgs<D>) {}
}

/// Handler that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl<D: NodeData> TreeHandler<D> for NoopHandler {}
