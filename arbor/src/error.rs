//! Error types

use crate::events::BoxError;
use crate::node::NodeId;

/// Errors returned by tree operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The handle does not refer to a mounted node.
    #[error("node {0:?} is not mounted")]
    NodeNotFound(NodeId),

    /// The expand handler failed.
    #[error("expand handler failed: {0}")]
    Handler(#[source] BoxError),
}

/// Result alias for tree operations.
pub type Result<T, E = TreeError> = std::result::Result<T, E>;
