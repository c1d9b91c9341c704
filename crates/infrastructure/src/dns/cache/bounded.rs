//! Adapters over the third-party bounded maps used by [`LruCache`](super::LruCache).
//!
//! Both expose the same small surface so the cache does not care which
//! eviction policy sits underneath.

use ferrous_dnscache_application::ports::Addresses;
use moka::sync::Cache as MokaCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub(crate) trait BoundedMap: Send + Sync {
    fn add(&self, key: &str, value: Addresses);
    fn contains(&self, key: &str) -> bool;
    fn get(&self, key: &str) -> Option<Addresses>;
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
    fn len(&self) -> usize;
    fn purge(&self);
    fn policy(&self) -> &'static str;
}

/// Fixed capacity, two-queue (2Q) eviction.
///
/// New keys land in `recent`. A second access moves a key to `frequent`, which
/// is ordered by recency. Keys pushed out of `recent` are remembered in
/// `ghost`; adding one of them again goes straight to `frequent`. A stream of
/// one-shot names only churns `recent`.
pub(crate) struct TwoQueueMap {
    capacity: usize,
    recent_target: usize,
    inner: Mutex<TwoQueues>,
}

struct TwoQueues {
    recent: lru::LruCache<String, Addresses>,
    frequent: lru::LruCache<String, Addresses>,
    ghost: lru::LruCache<String, ()>,
}

impl TwoQueueMap {
    pub fn new(capacity: NonZeroUsize) -> Self {
        let ghost = NonZeroUsize::new(capacity.get() / 2).unwrap_or(NonZeroUsize::MIN);
        Self {
            capacity: capacity.get(),
            recent_target: capacity.get() / 4,
            inner: Mutex::new(TwoQueues {
                recent: lru::LruCache::unbounded(),
                frequent: lru::LruCache::unbounded(),
                ghost: lru::LruCache::new(ghost),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TwoQueues> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Evicts one entry when the map is full. Shrinks `recent` first while it
    /// is over its share; a ghost hit tolerates `recent` sitting exactly at it.
    fn make_room(&self, queues: &mut TwoQueues, ghost_hit: bool) {
        let recent = queues.recent.len();
        if recent + queues.frequent.len() < self.capacity {
            return;
        }

        if recent > 0
            && (recent > self.recent_target || (recent == self.recent_target && !ghost_hit))
        {
            if let Some((key, _)) = queues.recent.pop_lru() {
                queues.ghost.put(key, ());
            }
            return;
        }

        queues.frequent.pop_lru();
    }
}

impl BoundedMap for TwoQueueMap {
    fn add(&self, key: &str, value: Addresses) {
        let mut queues = self.lock();

        if queues.frequent.contains(key) {
            queues.frequent.put(key.to_string(), value);
            return;
        }
        if queues.recent.pop(key).is_some() {
            queues.frequent.put(key.to_string(), value);
            return;
        }
        if queues.ghost.pop(key).is_some() {
            self.make_room(&mut queues, true);
            queues.frequent.put(key.to_string(), value);
            return;
        }

        self.make_room(&mut queues, false);
        queues.recent.put(key.to_string(), value);
    }

    fn contains(&self, key: &str) -> bool {
        let queues = self.lock();
        queues.frequent.contains(key) || queues.recent.contains(key)
    }

    fn get(&self, key: &str) -> Option<Addresses> {
        let mut queues = self.lock();

        if let Some(value) = queues.frequent.get(key) {
            return Some(Arc::clone(value));
        }
        let value = queues.recent.pop(key)?;
        queues.frequent.put(key.to_string(), Arc::clone(&value));
        Some(value)
    }

    fn remove(&self, key: &str) {
        let mut queues = self.lock();
        queues.frequent.pop(key);
        queues.recent.pop(key);
        queues.ghost.pop(key);
    }

    fn keys(&self) -> Vec<String> {
        let queues = self.lock();
        queues
            .frequent
            .iter()
            .chain(queues.recent.iter())
            .map(|(k, _)| k.clone())
            .collect()
    }

    fn len(&self) -> usize {
        let queues = self.lock();
        queues.frequent.len() + queues.recent.len()
    }

    fn purge(&self) {
        let mut queues = self.lock();
        queues.frequent.clear();
        queues.recent.clear();
        queues.ghost.clear();
    }

    fn policy(&self) -> &'static str {
        "2q"
    }
}

/// Fixed capacity with a rolling idle lifetime: entries not read or written
/// within `ttl` are evicted by moka on its own.
pub(crate) struct IdleExpiringMap {
    inner: MokaCache<String, Addresses>,
}

impl IdleExpiringMap {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            inner: MokaCache::builder()
                .max_capacity(capacity.get() as u64)
                .time_to_idle(ttl)
                .build(),
        }
    }
}

impl BoundedMap for IdleExpiringMap {
    fn add(&self, key: &str, value: Addresses) {
        self.inner.insert(key.to_string(), value);
    }

    fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Addresses> {
        self.inner.get(key)
    }

    fn remove(&self, key: &str) {
        self.inner.invalidate(key);
    }

    fn keys(&self) -> Vec<String> {
        self.inner.iter().map(|(k, _)| k.as_ref().clone()).collect()
    }

    // entry_count() lags behind pending maintenance; counting live entries
    // keeps len() consistent with keys() right after a purge.
    fn len(&self) -> usize {
        self.inner.iter().count()
    }

    fn purge(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }

    fn policy(&self) -> &'static str {
        "lru+tti"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addrs(ip: &str) -> Addresses {
        Arc::new(vec![ip.parse().unwrap()])
    }

    #[test]
    fn test_two_queue_map_keeps_reused_entry() {
        let map = TwoQueueMap::new(NonZeroUsize::new(2).unwrap());
        map.add("a", addrs("10.0.0.1"));
        map.add("b", addrs("10.0.0.2"));

        // second access moves "a" to the frequent queue
        assert!(map.get("a").is_some());
        map.add("c", addrs("10.0.0.3"));

        assert!(map.contains("a"));
        assert!(!map.contains("b"));
        assert!(map.contains("c"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_two_queue_map_survives_one_shot_burst() {
        let map = TwoQueueMap::new(NonZeroUsize::new(8).unwrap());
        map.add("hot", addrs("10.0.0.1"));
        assert!(map.get("hot").is_some());

        for i in 0..100 {
            map.add(&format!("once-{i}"), addrs("10.0.0.2"));
        }

        assert!(map.contains("hot"));
        assert!(map.contains("once-99"));
        assert!(!map.contains("once-0"));
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn test_two_queue_map_readmits_ghost_into_frequent() {
        let map = TwoQueueMap::new(NonZeroUsize::new(4).unwrap());
        for key in ["a", "b", "c", "d", "e"] {
            map.add(key, addrs("10.0.0.1"));
        }
        assert!(!map.contains("a"));

        // "a" is remembered, so it comes back as a frequent entry
        map.add("a", addrs("10.0.0.9"));
        for i in 0..20 {
            map.add(&format!("once-{i}"), addrs("10.0.0.2"));
        }

        assert_eq!(map.get("a"), Some(addrs("10.0.0.9")));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_two_queue_map_purge_and_remove() {
        let map = TwoQueueMap::new(NonZeroUsize::new(4).unwrap());
        map.add("a", addrs("10.0.0.1"));
        map.add("b", addrs("10.0.0.2"));

        map.remove("a");
        map.remove("missing");
        assert_eq!(map.keys(), vec!["b".to_string()]);

        map.purge();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_idle_map_expires_untouched_entries() {
        let ttl = Duration::from_millis(50);
        let map = IdleExpiringMap::new(NonZeroUsize::new(8).unwrap(), ttl);
        map.add("a", addrs("10.0.0.1"));
        assert!(map.contains("a"));

        std::thread::sleep(Duration::from_millis(120));

        assert!(!map.contains("a"));
        assert!(map.get("a").is_none());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_idle_map_purge() {
        let map = IdleExpiringMap::new(NonZeroUsize::new(8).unwrap(), Duration::from_secs(60));
        map.add("a", addrs("10.0.0.1"));
        map.add("b", addrs("10.0.0.2"));
        assert_eq!(map.len(), 2);

        map.purge();

        assert_eq!(map.len(), 0);
        assert!(map.keys().is_empty());
    }
}
