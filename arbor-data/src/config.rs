//! Cache configuration

use std::time::Duration;

/// TTL settings for [`CachingProvider`](crate::CachingProvider).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use arbor_data::CacheConfig;
///
/// let config = CacheConfig::default().with_children_ttl(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for fetched child lists.
    ///
    /// Default: 5 minutes
    pub children_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            children_ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the children TTL.
    pub fn with_children_ttl(mut self, ttl: Duration) -> Self {
        self.children_ttl = ttl;
        self
    }

    /// Creates a config with no caching (zero TTL).
    pub fn no_cache() -> Self {
        Self {
            children_ttl: Duration::ZERO,
        }
    }

    /// Returns `true` if results should be stored at all.
    pub fn is_enabled(&self) -> bool {
        !self.children_ttl.is_zero()
    }
}
