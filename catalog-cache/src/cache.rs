//! TTL cache storage.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

/// TTL window for cache entries.
///
/// Each entry's lifetime is a uniform random draw from `[min_ttl, max_ttl]`,
/// so entries written at the same moment do not expire at the same moment.
#[derive(Debug, Clone)]
pub struct TtlConfig {
    pub min_ttl: Duration,
    pub max_ttl: Duration,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            min_ttl: Duration::from_secs(60),
            max_ttl: Duration::from_secs(120),
        }
    }
}

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
    generation: u64,
}

/// In-memory cache with jittered TTLs and O(1) group invalidation.
///
/// An entry is served only while it is unexpired and was stored under the
/// current generation. [`TtlCache::flush`] increments the generation, which
/// makes every existing entry unreachable at once without touching the map;
/// stale entries are removed lazily when a lookup lands on them.
///
/// Shared freely between request handlers and invalidators: operations are
/// single-key get/set/evict or the generation bump, so no coordination beyond
/// the interior lock is needed.
pub struct TtlCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    generation: AtomicU64,
    config: TtlConfig,
}

impl<T: Clone> TtlCache<T> {
    /// Create a cache with the default 60-120s TTL window.
    pub fn new() -> Self {
        Self::with_config(TtlConfig::default())
    }

    /// Create a cache with a custom TTL window.
    pub fn with_config(config: TtlConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
            config,
        }
    }

    /// Look up a live entry.
    ///
    /// Expired or flushed-over entries are removed on the way out and
    /// reported as misses.
    pub fn get(&self, key: &str) -> Option<T> {
        let current_generation = self.generation.load(Ordering::Acquire);

        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry)
                    if entry.generation == current_generation
                        && entry.expires_at > Instant::now() =>
                {
                    return Some(entry.value.clone());
                }
                Some(_) => {} // stale: fall through to removal
                None => return None,
            }
        }

        self.entries.write().unwrap().remove(key);
        None
    }

    /// Store a value under a freshly jittered TTL.
    pub fn put(&self, key: impl Into<String>, value: T) {
        let ttl = self.jittered_ttl();
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
            generation: self.generation.load(Ordering::Acquire),
        };
        self.entries.write().unwrap().insert(key.into(), entry);
    }

    /// Evict a single key immediately.
    pub fn forget(&self, key: &str) {
        self.entries.write().unwrap().remove(key);
    }

    /// Invalidate every entry in the cache at once.
    ///
    /// O(1): bumps the generation counter; entries stored under older
    /// generations become unreachable and are dropped lazily.
    pub fn flush(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "Flushed cache group");
    }

    /// Read-through lookup: return the cached value, or run the loader and
    /// cache its result.
    ///
    /// Loader errors pass through uncached.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, loader: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = loader().await?;
        self.put(key, value.clone());
        Ok(value)
    }

    /// Number of stored entries, live or stale. Intended for tests and
    /// diagnostics.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn jittered_ttl(&self) -> Duration {
        let min = self.config.min_ttl.as_secs();
        let max = self.config.max_ttl.as_secs().max(min);
        Duration::from_secs(rand::thread_rng().gen_range(min..=max))
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
