//! Data sources for arbor trees.
//!
//! Provides the [`Item`] model, the async [`DataProvider`] trait with a demo,
//! a JSON and a caching implementation, and [`ProviderHandler`], which plugs a
//! provider into a [`Tree`](arbor::Tree) as its expand handler.

pub mod config;
pub mod error;
pub mod handler;
pub mod item;
pub mod provider;

pub use config::CacheConfig;
pub use error::{DataError, Result};
pub use handler::ProviderHandler;
pub use item::{Item, sample_items};
pub use provider::{CachedChildren, CachingProvider, DataProvider, JsonProvider, SampleProvider};
