//! Cache Module
//!
//! The capability contract shared by every backend, plus the bounded LRU
//! store, the map-based memory cache and the multi-level cache.

mod entry;
mod lru;
mod memory;
mod multi_level;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;
use std::time::Duration;

use crate::context::Context;
use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::{RecencyList, SlotId};
pub use memory::MemoryCache;
pub use multi_level::MultiLevelCache;
pub use store::LruCache;

// == Cache Trait ==
/// Operations every cache backend provides.
///
/// `get` returns `Ok(None)` on a miss; errors are reserved for operational
/// faults such as a cancelled context or a failing remote store.
pub trait Cache<V>: Send + Sync {
    fn get(&self, ctx: &Context, key: &str) -> Result<Option<V>>;

    /// Stores `value` under `key`. A zero `ttl` makes the entry unusable for
    /// every later `get`.
    fn set(&self, ctx: &Context, key: &str, value: V, ttl: Duration) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete(&self, ctx: &Context, key: &str) -> Result<()>;
}

impl<V, C> Cache<V> for Arc<C>
where
    C: Cache<V> + ?Sized,
{
    fn get(&self, ctx: &Context, key: &str) -> Result<Option<V>> {
        (**self).get(ctx, key)
    }

    fn set(&self, ctx: &Context, key: &str, value: V, ttl: Duration) -> Result<()> {
        (**self).set(ctx, key, value, ttl)
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        (**self).delete(ctx, key)
    }
}
