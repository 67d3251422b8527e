use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use super::options::CacheConfig;

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub item: T,
    pub inserted_at: Instant,
}

/// Per-store item cache with a time-to-live and an optional size bound.
/// When full, inserting a new id evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    ttl: Duration,
    max_size: Option<usize>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: config.ttl,
            max_size: config.max_size,
        }
    }

    /// Insert or refresh an entry, returning the id evicted to make room
    pub fn insert(&mut self, id: impl Into<String>, item: T) -> Option<String> {
        let id = id.into();
        let mut evicted = None;

        if let Some(max_size) = self.max_size {
            if max_size == 0 {
                return None;
            }
            if !self.entries.contains_key(&id) && self.entries.len() >= max_size {
                evicted = self.oldest_id();
                if let Some(oldest) = &evicted {
                    self.entries.remove(oldest);
                }
            }
        }

        self.entries.insert(id, CacheEntry { item, inserted_at: Instant::now() });
        evicted
    }

    /// Fresh entry for `id`; an expired entry is dropped and reported as a miss
    pub fn get(&mut self, id: &str) -> Option<T> {
        let expired = self.entries.get(id)?.inserted_at.elapsed() > self.ttl;
        if expired {
            self.entries.remove(id);
            return None;
        }
        self.entries.get(id).map(|entry| entry.item.clone())
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.entries.remove(id).map(|entry| entry.item)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn oldest_id(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(id, _)| id.clone())
    }
}
