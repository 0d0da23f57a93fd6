//! Answering tree expand requests from a data provider.

use arbor::{BoxError, ExpandEventArgs, ExpandSettings, TreeHandler};
use async_trait::async_trait;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::item::Item;
use crate::provider::DataProvider;

/// A [`TreeHandler`] that loads children through a [`DataProvider`].
///
/// When the provider knows nothing about the expanded item, the item's own
/// children are used instead. Every request uses a child of the handler's
/// cancellation token, so [`cancel`](Self::cancel) abandons all pending
/// loads.
#[derive(Debug)]
pub struct ProviderHandler<P> {
    provider: P,
    cancel: CancellationToken,
}

impl<P: DataProvider> ProviderHandler<P> {
    /// Creates a handler with its own cancellation token.
    pub fn new(provider: P) -> Self {
        Self::with_cancellation(provider, CancellationToken::new())
    }

    /// Creates a handler whose requests are children of `cancel`.
    pub fn with_cancellation(provider: P, cancel: CancellationToken) -> Self {
        Self { provider, cancel }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Cancels pending and future requests.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Fetches the root items.
    pub async fn roots(&self) -> Result<Vec<Item>> {
        self.provider.get_children("", self.cancel.child_token()).await
    }
}

#[async_trait]
impl<P: DataProvider> TreeHandler<Item> for ProviderHandler<P> {
    async fn on_expand(&self, args: &mut ExpandEventArgs<Item>) -> std::result::Result<(), BoxError> {
        let mut children = self
            .provider
            .get_children(&args.value.name, self.cancel.child_token())
            .await?;
        if children.is_empty() {
            children = args.value.children.clone();
        }
        debug!("Loaded {} children for {}", children.len(), args.value.name);

        if !children.is_empty() {
            args.children = ExpandSettings::default()
                .with_data(children)
                .with_has_children(|item: &Item| !item.is_leaf());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arbor::NodeId;

    use super::*;
    use crate::error::DataError;
    use crate::provider::{JsonProvider, SampleProvider};

    fn args(value: Item) -> ExpandEventArgs<Item> {
        ExpandEventArgs {
            text: value.name.clone(),
            value,
            target: NodeId::default(),
            children: ExpandSettings::default(),
        }
    }

    #[tokio::test]
    async fn test_children_from_provider() {
        let handler = ProviderHandler::new(SampleProvider::new());
        let mut args = args(Item::new("item1"));

        handler.on_expand(&mut args).await.unwrap();

        let data = args.children.data.unwrap();
        let names: Vec<_> = data.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["item2", "item6", "item7"]);
        assert!((args.children.has_children)(&data[0]));
        assert!(!(args.children.has_children)(&data[1]));
    }

    #[tokio::test]
    async fn test_falls_back_to_own_children() {
        let handler = ProviderHandler::new(JsonProvider::default());
        let mut args = args(Item::new("x").with_children(vec![Item::new("y")]));

        handler.on_expand(&mut args).await.unwrap();
        assert_eq!(args.children.data, Some(vec![Item::new("y")]));
    }

    #[tokio::test]
    async fn test_leaf_supplies_nothing() {
        let handler = ProviderHandler::new(SampleProvider::new());
        let mut args = args(Item::new("item9"));

        handler.on_expand(&mut args).await.unwrap();
        assert!(args.children.data.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_handler_fails() {
        let handler = ProviderHandler::new(SampleProvider::new());
        handler.cancel();

        let err = handler.on_expand(&mut args(Item::new("item1"))).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::Cancelled)));
        assert!(matches!(handler.roots().await, Err(DataError::Cancelled)));
    }
}
