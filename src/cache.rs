//! Bounded-lifetime memoization of completed extractions.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::debug;
use lru::LruCache;

use crate::model::Recipe;

pub const CACHE_CAPACITY: usize = 128;
pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

struct CacheEntry {
    recipe: Recipe,
    inserted_at: Instant,
}

/// LRU cache of enriched recipes keyed by source URL.
///
/// Entries are immutable once stored and expire after a fixed TTL; expired
/// entries are evicted on the read that finds them. The single mutex is the
/// only synchronization the pipeline needs; critical sections are a lookup
/// or an insert, nothing more.
pub struct RecipeCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl RecipeCache {
    pub fn new() -> Self {
        Self::with_settings(CACHE_CAPACITY, CACHE_TTL)
    }

    pub fn with_settings(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        RecipeCache {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, url: &str) -> Option<Recipe> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(url) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                debug!("cache hit for {url}");
                Some(entry.recipe.clone())
            }
            Some(_) => {
                debug!("cache entry for {url} expired");
                entries.pop(url);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, url: &str, recipe: Recipe) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.put(
            url.to_string(),
            CacheEntry {
                recipe,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecipeCache {
    fn default() -> Self {
        Self::new()
    }
}
