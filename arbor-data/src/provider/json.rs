//! Items loaded from a JSON document.

use std::path::Path;

use async_trait::async_trait;
use log::info;
use tokio_util::sync::CancellationToken;

use super::{DataProvider, lookup};
use crate::error::{DataError, Result};
use crate::item::Item;

/// Serves items parsed from a JSON array of [`Item`]s.
#[derive(Debug, Clone, Default)]
pub struct JsonProvider {
    items: Vec<Item>,
}

impl JsonProvider {
    /// Creates a provider over already parsed items.
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Parses a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Ok(Self::new(items))
    }

    /// Reads and parses a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let provider = Self::from_json(&json)?;
        info!("Loaded {} root items from {}", provider.items.len(), path.display());
        Ok(provider)
    }

    /// The root items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

#[async_trait]
impl DataProvider for JsonProvider {
    async fn get_children(&self, parameter: &str, cancel: CancellationToken) -> Result<Vec<Item>> {
        if cancel.is_cancelled() {
            return Err(DataError::Cancelled);
        }
        Ok(lookup(&self.items, parameter))
    }
}
