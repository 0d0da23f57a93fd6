//! Arbor: a lazily loading tree view model.
//!
//! Arbor keeps the state of a hierarchical view independent of any rendering
//! backend: which nodes exist, which are expanded, which one is selected, and
//! the flattened list of visible rows that keyboard navigation walks.
//!
//! Child nodes come from two places:
//! - [`LevelConfig`]s registered on the [`Tree`], one per depth, which read
//!   text and child collections out of the data items
//! - the [`TreeHandler::on_expand`] callback, which may supply the children
//!   of a node on demand through [`ExpandSettings`]
//!
//! Data items implement [`NodeData`]; it is already implemented for
//! `String` and `serde_json::Value`.

pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod input;
pub mod keybinds;
pub mod level;
pub mod node;
pub mod settings;
pub mod tree;

pub use config::TreeConfig;
pub use data::NodeData;
pub use error::{Result, TreeError};
pub use events::{
    BoxError, EventResult, ExpandEventArgs, ItemRenderEventArgs, NoopHandler, TreeEventArgs,
    TreeHandler,
};
pub use keybinds::{Key, KeyCombo, Modifiers};
pub use level::{LevelConfig, Predicate, Template, TextFn};
pub use node::{Expansion, NodeId, NodeParams, Reconciliation, TreeNode};
pub use settings::ExpandSettings;
pub use tree::{Tree, TreeRow};

pub mod prelude {
    pub use crate::config::TreeConfig;
    pub use crate::data::NodeData;
    pub use crate::error::TreeError;
    pub use crate::events::{
        BoxError, EventResult, ExpandEventArgs, ItemRenderEventArgs, TreeEventArgs, TreeHandler,
    };
    pub use crate::input::convert_key_event;
    pub use crate::keybinds::{Key, KeyCombo, Modifiers};
    pub use crate::level::LevelConfig;
    pub use crate::node::{Expansion, NodeId, NodeParams};
    pub use crate::settings::ExpandSettings;
    pub use crate::tree::{Tree, TreeRow};
}
