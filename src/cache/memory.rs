//! Memory Cache Module
//!
//! Unbounded map-based cache. Reads hide expired entries; removing them is
//! left to [`MemoryCache::purge_expired`], normally driven by the background
//! sweep task.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::cache::{Cache, CacheEntry};
use crate::context::Context;
use crate::error::Result;

// == Memory Cache ==
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    /// Number of entries held, including expired entries not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, ctx: &Context, key: &str) -> Result<Option<V>> {
        ctx.check("Get")?;
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, ctx: &Context, key: &str, value: V, ttl: Duration) -> Result<()> {
        ctx.check("Set")?;
        let entry = CacheEntry::new(value, ttl, Instant::now());
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.check("Delete")?;
        self.entries.write().remove(key);
        Ok(())
    }
}
