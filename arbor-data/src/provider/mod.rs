//! Data providers
//!
//! A `DataProvider` answers "what are the children of this item?" for the
//! tree. The parameter is an item name; the empty string asks for the roots.
//! Requests carry a [`CancellationToken`] so a pending fetch can be abandoned
//! when the view goes away.

mod cache;
mod json;
mod sample;

pub use cache::*;
pub use json::*;
pub use sample::*;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::item::Item;

/// Source of tree items.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches the children of the item named `parameter`.
    ///
    /// An empty `parameter` returns the root items. Unknown names return an
    /// empty list. Returns [`DataError::Cancelled`](crate::DataError::Cancelled)
    /// if `cancel` fires first.
    async fn get_children(&self, parameter: &str, cancel: CancellationToken) -> Result<Vec<Item>>;
}

#[async_trait]
impl<P: DataProvider + ?Sized> DataProvider for Arc<P> {
    async fn get_children(&self, parameter: &str, cancel: CancellationToken) -> Result<Vec<Item>> {
        (**self).get_children(parameter, cancel).await
    }
}

/// Children of `parameter` within `roots`.
pub(crate) fn lookup(roots: &[Item], parameter: &str) -> Vec<Item> {
    if parameter.is_empty() {
        return roots.to_vec();
    }
    roots
        .iter()
        .find_map(|root| root.find(parameter))
        .map(|item| item.children.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::sample_items;

    #[test]
    fn test_lookup_roots_and_nested() {
        let items = sample_items();
        assert_eq!(lookup(&items, "").len(), 4);

        let names: Vec<_> = lookup(&items, "item1").into_iter().map(|i| i.name).collect();
        assert_eq!(names, ["item2", "item6", "item7"]);

        assert_eq!(lookup(&items, "item4"), vec![Item::new("item5")]);
        assert!(lookup(&items, "item5").is_empty());
        assert!(lookup(&items, "missing").is_empty());
    }
}
