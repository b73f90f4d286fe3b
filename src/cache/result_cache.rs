use crate::clock::Clock;
use crate::core::ComplexityResult;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Default time-to-live for cached analysis results.
pub const DEFAULT_TTL: Duration = Duration::from_millis(30_000);

/// Cache entry for one analysis result
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub key: String,
    pub result: Arc<ComplexityResult>,
    /// Clock reading when the entry was stored
    pub created_at: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Duration, ttl: Duration) -> bool {
        now.saturating_sub(self.created_at) < ttl
    }
}

/// In-memory result cache keyed by content+language digest.
///
/// Staleness is checked lazily on read. Stale entries are ignored, not
/// evicted; they disappear when overwritten, removed or cleared.
#[derive(Debug)]
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    stale_reads: AtomicUsize,
}

impl ResultCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            stale_reads: AtomicUsize::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the stored result if it is younger than the TTL.
    pub fn get(&self, key: &str) -> Option<Arc<ComplexityResult>> {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now, self.ttl) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(&entry.result))
            }
            Some(entry) => {
                trace!(key, age_ms = ?now.saturating_sub(entry.created_at), "stale cache entry ignored");
                self.stale_reads.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Like [`ResultCache::get`] but leaves the counters untouched.
    pub fn peek(&self, key: &str) -> Option<Arc<ComplexityResult>> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.result))
    }

    /// Insert or overwrite, stamping the current clock reading.
    pub fn set(&self, key: impl Into<String>, result: Arc<ComplexityResult>) {
        let key = key.into();
        let entry = CacheEntry {
            key: key.clone(),
            result,
            created_at: self.clock.now(),
        };
        self.entries.insert(key, entry);
    }

    pub fn remove(&self, key: &str) -> Option<CacheEntry> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.stale_reads.store(0, Ordering::Relaxed);
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        CacheStats {
            entries: self.entries.len(),
            hits,
            misses,
            stale_reads: self.stale_reads.load(Ordering::Relaxed),
            hit_rate: if hits + misses > 0 {
                hits as f64 / (hits + misses) as f64
            } else {
                0.0
            },
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
    /// Misses caused by an expired entry
    pub stale_reads: usize,
    pub hit_rate: f64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache Stats: {} entries, {} hits, {} misses ({} stale), {:.1}% hit rate",
            self.entries,
            self.hits,
            self.misses,
            self.stale_reads,
            self.hit_rate * 100.0
        )
    }
}
