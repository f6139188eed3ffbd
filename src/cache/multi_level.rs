//! Multi-Level Cache
//!
//! Presents an ordered list of caches as one cache. Reads cascade from the
//! first level to the last and stop at the first hit; writes and deletes fan
//! out to every level.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::context::Context;
use crate::error::Result;

/// Ordered stack of cache levels, fastest first.
///
/// A hit in a later level is not copied into earlier levels. Set and delete
/// stop at the first failing level without undoing the levels already
/// written, so a failure can leave the levels disagreeing.
///
/// The internal guard serializes set/delete against every other call made
/// through this value. Each level still does its own locking, and a caller
/// talking to a level directly can observe a fan-out half way through.
pub struct MultiLevelCache<V> {
    levels: Vec<Arc<dyn Cache<V>>>,
    guard: RwLock<()>,
}

impl<V> MultiLevelCache<V> {
    /// Builds a cache over `levels`. An empty list is allowed: every read
    /// misses and every write is a no-op.
    pub fn new(levels: Vec<Arc<dyn Cache<V>>>) -> Self {
        Self {
            levels,
            guard: RwLock::new(()),
        }
    }

    /// Number of configured levels.
    pub fn levels(&self) -> usize {
        self.levels.len()
    }
}

impl<V> Cache<V> for MultiLevelCache<V>
where
    V: Clone,
{
    fn get(&self, ctx: &Context, key: &str) -> Result<Option<V>> {
        let _guard = self.guard.read();

        for (level, cache) in self.levels.iter().enumerate() {
            match cache.get(ctx, key) {
                Ok(Some(value)) => {
                    debug!(key = %key, level, "multi-level hit");
                    return Ok(Some(value));
                }
                Ok(None) => continue,
                Err(err) => {
                    warn!(key = %key, level, error = %err, "multi-level get failed");
                    return Err(err);
                }
            }
        }
        Ok(None)
    }

    fn set(&self, ctx: &Context, key: &str, value: V, ttl: Duration) -> Result<()> {
        let _guard = self.guard.write();

        for (level, cache) in self.levels.iter().enumerate() {
            if let Err(err) = cache.set(ctx, key, value.clone(), ttl) {
                warn!(key = %key, level, error = %err, "multi-level set failed");
                return Err(err);
            }
        }
        Ok(())
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        let _guard = self.guard.write();

        for (level, cache) in self.levels.iter().enumerate() {
            if let Err(err) = cache.delete(ctx, key) {
                warn!(key = %key, level, error = %err, "multi-level delete failed");
                return Err(err);
            }
        }
        Ok(())
    }
}
