//! TTL cache in front of another provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::debug;
use tokio_util::sync::CancellationToken;

use super::DataProvider;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::item::Item;

/// A cached child list with its expiry.
#[derive(Debug, Clone)]
pub struct CachedChildren {
    pub items: Vec<Item>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CachedChildren {
    /// Creates an entry expiring `ttl` from now.
    pub fn with_ttl(items: Vec<Item>, ttl: std::time::Duration) -> Self {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            items,
            created_at: now,
            expires_at,
        }
    }

    /// Returns `true` if this entry has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Caches child lists per parameter for the configured TTL.
///
/// Failed and cancelled requests are never cached.
///
/// # Example
///
/// ```
/// use arbor_data::{CacheConfig, CachingProvider, SampleProvider};
///
/// let provider = CachingProvider::new(SampleProvider::new(), CacheConfig::default());
/// assert!(provider.is_empty());
/// ```
#[derive(Debug)]
pub struct CachingProvider<P> {
    inner: P,
    config: CacheConfig,
    store: DashMap<String, CachedChildren>,
}

impl<P: DataProvider> CachingProvider<P> {
    /// Wraps `inner` with a cache.
    pub fn new(inner: P, config: CacheConfig) -> Self {
        Self {
            inner,
            config,
            store: DashMap::new(),
        }
    }

    /// The wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of entries (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drops the entry for `parameter`.
    pub fn invalidate(&self, parameter: &str) {
        self.store.remove(parameter);
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Removes expired entries, returning how many were removed.
    pub fn gc(&self) -> usize {
        let mut removed = 0;
        self.store.retain(|_, entry| {
            if entry.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    fn cached(&self, parameter: &str) -> Option<Vec<Item>> {
        let entry = self.store.get(parameter)?;
        if entry.is_expired() {
            drop(entry);
            self.store.remove(parameter);
            return None;
        }
        Some(entry.items.clone())
    }
}

#[async_trait]
impl<P: DataProvider> DataProvider for CachingProvider<P> {
    async fn get_children(&self, parameter: &str, cancel: CancellationToken) -> Result<Vec<Item>> {
        if let Some(items) = self.cached(parameter) {
            debug!("Cache hit for {:?}", parameter);
            return Ok(items);
        }

        let items = self.inner.get_children(parameter, cancel).await?;
        if self.config.is_enabled() {
            self.store.insert(
                parameter.to_string(),
                CachedChildren::with_ttl(items.clone(), self.config.children_ttl),
            );
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::error::DataError;
    use crate::provider::SampleProvider;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        inner: SampleProvider,
    }

    #[async_trait]
    impl DataProvider for Counting {
        async fn get_children(&self, parameter: &str, cancel: CancellationToken) -> Result<Vec<Item>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_children(parameter, cancel).await
        }
    }

    fn calls(provider: &CachingProvider<Counting>) -> usize {
        provider.inner().calls.load(Ordering::SeqCst)
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CachedChildren::with_ttl(Vec::new(), Duration::from_secs(10_000_000_000_000));
        assert_eq!(entry.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!entry.is_expired());
    }

    #[tokio::test]
    async fn test_second_request_is_cached() {
        let provider = CachingProvider::new(Counting::default(), CacheConfig::default());

        let first = provider.get_children("item1", CancellationToken::new()).await.unwrap();
        let second = provider.get_children("item1", CancellationToken::new()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls(&provider), 1);
        assert_eq!(provider.len(), 1);
    }

    #[tokio::test]
    async fn test_no_cache_always_fetches() {
        let provider = CachingProvider::new(Counting::default(), CacheConfig::no_cache());

        provider.get_children("", CancellationToken::new()).await.unwrap();
        provider.get_children("", CancellationToken::new()).await.unwrap();

        assert_eq!(calls(&provider), 2);
        assert!(provider.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let provider = CachingProvider::new(Counting::default(), CacheConfig::default());

        provider.get_children("", CancellationToken::new()).await.unwrap();
        provider.invalidate("");
        provider.get_children("", CancellationToken::new()).await.unwrap();

        assert_eq!(calls(&provider), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let provider = CachingProvider::new(Counting::default(), CacheConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = provider.get_children("", cancel).await;
        assert!(matches!(result, Err(DataError::Cancelled)));
        assert!(provider.is_empty());
    }

    #[tokio::test]
    async fn test_expired_entries() {
        let provider = CachingProvider::new(Counting::default(), CacheConfig::default());
        provider.store.insert(
            "item1".to_string(),
            CachedChildren::with_ttl(vec![Item::new("stale")], Duration::ZERO),
        );
        provider.store.insert(
            "item8".to_string(),
            CachedChildren::with_ttl(vec![], Duration::from_secs(60)),
        );

        assert_eq!(provider.gc(), 1);
        assert_eq!(provider.len(), 1);

        let fresh = provider.get_children("item1", CancellationToken::new()).await.unwrap();
        assert_eq!(fresh.len(), 3);
        assert_eq!(calls(&provider), 1);
    }
}
