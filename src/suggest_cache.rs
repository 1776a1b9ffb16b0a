//! Suggestion cache for the autocomplete subsystem
//!
//! Maps normalized input text to the suggestions last generated for it.
//! Capacity-bounded with least-recently-used eviction so a long-running
//! session cannot grow the cache without limit. Interior locking: one
//! `Arc<SuggestionCache>` is shared between the event side and the
//! generation workers, and this is the only mutable state they share.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Hit/miss/eviction counters.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

struct Slot {
    suggestions: Vec<String>,
    last_used: u64,
}

struct Inner {
    map: HashMap<String, Slot>,
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Bounded LRU cache from normalized input to suggestion lists.
pub struct SuggestionCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl SuggestionCache {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                tick: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Normalize raw input into a cache key: trimmed and lowercased.
    pub fn normalize(input: &str) -> String {
        input.trim().to_lowercase()
    }

    /// Look up the suggestions stored for this input, refreshing its
    /// recency on hit.
    pub fn get(&self, input: &str) -> Option<Vec<String>> {
        let key = Self::normalize(input);
        let mut inner = self.inner.lock().unwrap();
        inner.tick += 1;
        let tick = inner.tick;
        let found = inner.map.get_mut(&key).map(|slot| {
            slot.last_used = tick;
            slot.suggestions.clone()
        });
        match found {
            Some(suggestions) => {
                inner.hits += 1;
                Some(suggestions)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store suggestions for this input, overwriting any previous entry.
    /// Evicts the least recently used entry when the cache is full.
    pub fn put(&self, input: &str, suggestions: Vec<String>) {
        let key = Self::normalize(input);
        let mut inner = self.inner.lock().unwrap();
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.map.contains_key(&key) && inner.map.len() >= self.capacity {
            if let Some(oldest) = inner
                .map
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(k, _)| k.clone())
            {
                inner.map.remove(&oldest);
                inner.evictions += 1;
            }
        }

        inner.map.insert(
            key,
            Slot {
                suggestions,
                last_used: tick,
            },
        );
    }

    /// Drop every entry. Counters survive so a session summary stays
    /// meaningful after a manual clear.
    pub fn clear(&self) {
        self.inner.lock().unwrap().map.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            entries: inner.map.len(),
        }
    }
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new()
    }
}
