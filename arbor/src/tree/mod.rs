//! Tree coordinator for hierarchical data.
//!
//! The Tree owns every node, the per-depth level configuration, the single
//! selection, and the flattened list of visible nodes used for keyboard
//! navigation. Nodes are addressed by [`NodeId`](crate::NodeId) handles.
//!
//! # Example
//!
//! ```
//! use arbor::{BoxError, ExpandEventArgs, NodeParams, Tree, TreeHandler};
//! use async_trait::async_trait;
//!
//! struct Numbers;
//!
//! #[async_trait]
//! impl TreeHandler<String> for Numbers {
//!     async fn on_expand(&self, args: &mut ExpandEventArgs<String>) -> Result<(), BoxError> {
//!         let children = (1..=3).map(|i| format!("{}.{}", args.text, i)).collect();
//!         args.children.data = Some(children);
//!         Ok(())
//!     }
//! }
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let mut tree = Tree::new(Numbers);
//! let root = tree.mount(None, NodeParams::new("1", "1".to_string())).await.unwrap();
//! tree.toggle(root).await.unwrap();
//! assert_eq!(tree.rows().len(), 4);
//! # });
//! ```

mod events;
mod expand;
mod select;
mod state;

pub use state::{Tree, TreeRow};
