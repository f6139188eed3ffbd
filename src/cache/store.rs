//! Cache Store Module
//!
//! Bounded cache engine combining a HashMap index with an arena recency list
//! and lazy TTL expiration.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::{Cache, CacheEntry, RecencyList, SlotId};
use crate::context::Context;
use crate::error::{CacheError, Result};

#[derive(Debug)]
struct LruState<V> {
    capacity: NonZeroUsize,
    /// Key to list node; bijective with the live nodes of `list`
    index: HashMap<String, SlotId>,
    list: RecencyList<CacheEntry<V>>,
}

impl<V> LruState<V> {
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|(_, entry)| entry)
    }

    fn evict_oldest(&mut self) {
        if let Some((key, _)) = self.list.pop_back() {
            self.index.remove(&key);
            debug!(key = %key, "evicted least recently used entry");
        }
    }
}

// == LRU Cache ==
/// Capacity-bounded cache with per-entry TTL and LRU eviction.
///
/// Every operation runs under one mutex and checks its [`Context`] inside the
/// same critical section, so a cancelled call never mutates anything.
/// Expired entries are purged lazily, when a `get` finds them.
#[derive(Debug)]
pub struct LruCache<V> {
    state: Mutex<LruState<V>>,
}

impl<V> LruCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is rejected.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity)?;
        Ok(Self {
            state: Mutex::new(LruState {
                capacity,
                index: HashMap::with_capacity(capacity.get()),
                list: RecencyList::with_capacity(capacity.get()),
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().capacity.get()
    }

    // == Length ==
    /// Number of entries held, including expired entries not yet purged.
    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().index.is_empty()
    }

    /// Checks for a live entry without touching its recency.
    pub fn contains_key(&self, key: &str) -> bool {
        let state = self.state.lock();
        state
            .index
            .get(key)
            .and_then(|id| state.list.get(*id))
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Keys ordered from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.state
            .lock()
            .list
            .iter()
            .map(|(key, _)| key.to_string())
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let state = self.state.lock();
        state.list.assert_invariants();
        assert_eq!(state.index.len(), state.list.len());
        assert!(state.index.len() <= state.capacity.get());
        for (key, id) in &state.index {
            assert_eq!(state.list.key(*id), Some(key.as_str()));
        }
    }
}

impl<V> Cache<V> for LruCache<V>
where
    V: Clone + Send,
{
    // == Get ==
    fn get(&self, ctx: &Context, key: &str) -> Result<Option<V>> {
        let mut state = self.state.lock();
        ctx.check("Get")?;

        let Some(&id) = state.index.get(key) else {
            return Ok(None);
        };

        let expired = state
            .list
            .get(id)
            .map(|entry| entry.is_expired_at(Instant::now()))
            .unwrap_or(true);
        if expired {
            state.remove(key);
            trace!(key = %key, "dropped expired entry on read");
            return Ok(None);
        }

        state.list.move_to_front(id);
        Ok(state.list.get(id).map(|entry| entry.value.clone()))
    }

    // == Set ==
    fn set(&self, ctx: &Context, key: &str, value: V, ttl: Duration) -> Result<()> {
        let mut state = self.state.lock();
        ctx.check("Set")?;

        let now = Instant::now();
        if let Some(&id) = state.index.get(key) {
            if let Some(entry) = state.list.get_mut(id) {
                entry.refresh(value, ttl, now);
            }
            state.list.move_to_front(id);
            return Ok(());
        }

        let id = state
            .list
            .push_front(key.to_string(), CacheEntry::new(value, ttl, now));
        state.index.insert(key.to_string(), id);
        if state.index.len() > state.capacity.get() {
            state.evict_oldest();
        }
        Ok(())
    }

    // == Delete ==
    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        let mut state = self.state.lock();
        ctx.check("Delete")?;

        state.remove(key);
        Ok(())
    }
}
