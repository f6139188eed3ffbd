//! Uni Cache - one cache contract over many backends
//!
//! Provides a TTL-aware bounded LRU store, a map-based memory cache and a
//! multi-level cache that composes any of them behind the [`Cache`] trait.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, LruCache, MemoryCache, MultiLevelCache};
pub use config::Config;
pub use context::Context;
pub use error::{CacheError, Result};
pub use tasks::{spawn_sweep_task, SweepHandle};
