//! Built-in demo data with simulated latency.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio_util::sync::CancellationToken;

use super::{DataProvider, lookup};
use crate::error::{DataError, Result};
use crate::item::{Item, sample_items};

/// Serves the demo hierarchy after an artificial delay.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use arbor_data::SampleProvider;
///
/// let provider = SampleProvider::new().with_latency(Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct SampleProvider {
    items: Vec<Item>,
    latency: Duration,
}

impl Default for SampleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleProvider {
    /// Creates a provider over [`sample_items`] with no latency.
    pub fn new() -> Self {
        Self::with_items(sample_items())
    }

    /// Creates a provider over custom items.
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            latency: Duration::ZERO,
        }
    }

    /// Sets the simulated latency of every request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl DataProvider for SampleProvider {
    async fn get_children(&self, parameter: &str, cancel: CancellationToken) -> Result<Vec<Item>> {
        if cancel.is_cancelled() {
            return Err(DataError::Cancelled);
        }
        if !self.latency.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(DataError::Cancelled),
                _ = tokio::time::sleep(self.latency) => {}
            }
        }

        let children = lookup(&self.items, parameter);
        debug!("Sample provider: {} children for {:?}", children.len(), parameter);
        Ok(children)
    }
}
