//! Vehicle detail cache.
//!
//! Last write wins per key. Under [`CacheRetention::Unbounded`] the cache
//! grows with the number of distinct vehicles seen during the session; a
//! [`CacheRetention::MaxEntries`] policy drops the least recently written
//! vehicle instead.

use fleetglass_core::CacheRetention;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use tracing::debug;

#[derive(Debug, Clone)]
struct Slot<V> {
    /// Write sequence of the stored value
    seq: u64,
    value: V,
}

/// Last-write-wins map with a pluggable retention policy
#[derive(Debug, Clone)]
pub struct DetailCache<K, V> {
    entries: HashMap<K, Slot<V>>,
    /// Write sequence -> key, oldest first
    write_order: BTreeMap<u64, K>,
    next_seq: u64,
    retention: CacheRetention,
}

impl<K, V> Default for DetailCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(CacheRetention::Unbounded)
    }
}

impl<K, V> DetailCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty cache with the given retention
    pub fn new(retention: CacheRetention) -> Self {
        Self {
            entries: HashMap::new(),
            write_order: BTreeMap::new(),
            next_seq: 0,
            retention,
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Returns the value it replaced.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        let seq = self.next_seq;
        self.next_seq += 1;

        let previous = self.entries.insert(key.clone(), Slot { seq, value });
        if let Some(old) = &previous {
            self.write_order.remove(&old.seq);
        }
        self.write_order.insert(seq, key);

        self.enforce_retention();
        previous.map(|slot| slot.value)
    }

    fn enforce_retention(&mut self) {
        let CacheRetention::MaxEntries(limit) = self.retention else {
            return;
        };
        while self.entries.len() > limit.max(1) {
            let Some((_, oldest)) = self.write_order.pop_first() else {
                break;
            };
            self.entries.remove(&oldest);
            debug!(retained = self.entries.len(), "detail cache evicted oldest vehicle");
        }
    }

    /// Latest value stored under `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|slot| &slot.value)
    }

    /// Whether `key` has a stored value
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys from least to most recently written
    pub fn keys_by_age(&self) -> impl Iterator<Item = &K> {
        self.write_order.values()
    }

    /// Active retention policy
    pub fn retention(&self) -> CacheRetention {
        self.retention
    }
}
