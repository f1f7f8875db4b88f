//! In-memory cache store with bounded capacity and scored eviction.

use crate::entry::{Entry, WriteOptions};
use crate::metrics::CacheMetrics;
use crate::store::CacheStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use quorum_core::{QuorumError, QuorumResult};
use regex::Regex;
use serde::Serialize;
use shaku::Component;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Mutable cache state behind the lock.
struct CacheState {
    entries: HashMap<String, Entry>,
    /// Monotone insertion counter for eviction tie-breaks.
    seq: u64,
    /// Reference instant for eviction scoring.
    epoch: Instant,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            seq: 0,
            epoch: Instant::now(),
        }
    }
}

/// Hit/miss/eviction counters.
#[derive(Debug, Default)]
pub struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expired: AtomicU64,
}

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Current number of stored entries.
    pub size: usize,
    /// Maximum capacity.
    pub capacity: usize,
    /// Total lookup hits.
    pub hits: u64,
    /// Total lookup misses.
    pub misses: u64,
    /// Total capacity evictions.
    pub evictions: u64,
    /// Total entries removed because their TTL elapsed.
    pub expired: u64,
}

/// In-memory TTL cache with bounded capacity.
///
/// When the cache is full and a new key arrives, the live entry with the
/// lowest score `(hits + 1) x priority weight x last-access seconds` is
/// evicted; ties fall to the oldest insertion. Expired entries are removed
/// lazily on access and in bulk by [`crate::Sweeper`].
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct MemoryCache {
    /// Maximum number of entries held at once.
    capacity: usize,
    #[shaku(force_default)]
    inner: RwLock<CacheState>,
    #[shaku(force_default)]
    counters: CacheCounters,
}

impl MemoryCache {
    /// Creates a cache bounded to `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::default(),
            counters: CacheCounters::default(),
        }
    }

    /// Creates a cache with [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Effective capacity (a zero configuration is clamped to one entry).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.max(1)
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let mut state = self.inner.write();
        let now = Instant::now();

        match state.entries.get(key).map(|e| e.is_expired(now)) {
            Some(false) => {
                let entry = state.entries.get_mut(key)?;
                entry.record_hit(now);
                self.counters.hits.fetch_add(1, AtomicOrdering::Relaxed);
                CacheMetrics::hit();
                trace!(key = %key, "Cache hit");
                Some(entry.value.clone())
            }
            Some(true) => {
                // Lazy removal on access past the deadline.
                state.entries.remove(key);
                self.counters.expired.fetch_add(1, AtomicOrdering::Relaxed);
                self.counters.misses.fetch_add(1, AtomicOrdering::Relaxed);
                CacheMetrics::expired(1);
                CacheMetrics::miss();
                CacheMetrics::update_size(state.entries.len());
                debug!(key = %key, "Cache entry expired on access");
                None
            }
            None => {
                self.counters.misses.fetch_add(1, AtomicOrdering::Relaxed);
                CacheMetrics::miss();
                trace!(key = %key, "Cache miss");
                None
            }
        }
    }

    fn insert(&self, key: &str, value: &str, options: WriteOptions) {
        let mut state = self.inner.write();
        let now = Instant::now();
        let capacity = self.capacity();

        if !state.entries.contains_key(key) && state.entries.len() >= capacity {
            // Reclaim expired entries before paying for an eviction.
            let reaped = Self::reap_expired(&mut state, now);
            if reaped > 0 {
                self.counters
                    .expired
                    .fetch_add(reaped as u64, AtomicOrdering::Relaxed);
                CacheMetrics::expired(reaped);
            }

            if state.entries.len() >= capacity {
                if let Some(victim) = select_victim(&state.entries, state.epoch) {
                    state.entries.remove(&victim);
                    self.counters.evictions.fetch_add(1, AtomicOrdering::Relaxed);
                    CacheMetrics::eviction();
                    debug!(key = %victim, "Evicted cache entry under capacity pressure");
                }
            }
        }

        state.seq += 1;
        let seq = state.seq;
        state
            .entries
            .insert(key.to_string(), Entry::new(value.to_string(), &options, now, seq));
        CacheMetrics::update_size(state.entries.len());
        trace!(key = %key, size = state.entries.len(), "Cache entry stored");
    }

    fn reap_expired(state: &mut CacheState, now: Instant) -> usize {
        let before = state.entries.len();
        state.entries.retain(|_, e| !e.is_expired(now));
        before - state.entries.len()
    }
}

/// Selects the eviction victim: lowest score first, ties broken by the
/// oldest insertion sequence.
fn select_victim(entries: &HashMap<String, Entry>, epoch: Instant) -> Option<String> {
    entries
        .iter()
        .min_by(|(_, a), (_, b)| {
            a.score(epoch)
                .partial_cmp(&b.score(epoch))
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.seq.cmp(&b.seq))
        })
        .map(|(k, _)| k.clone())
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get_raw(&self, key: &str) -> Option<String> {
        self.lookup(key)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) {
        self.insert(key, value, WriteOptions::new(ttl));
    }

    async fn set_with(&self, key: &str, value: &str, options: WriteOptions) {
        self.insert(key, value, options);
    }

    async fn delete(&self, key: &str) -> bool {
        let mut state = self.inner.write();
        let removed = state.entries.remove(key).is_some();
        if removed {
            CacheMetrics::update_size(state.entries.len());
            debug!(key = %key, "Cache entry deleted");
        }
        removed
    }

    async fn contains(&self, key: &str) -> bool {
        let state = self.inner.read();
        let now = Instant::now();
        state.entries.get(key).is_some_and(|e| !e.is_expired(now))
    }

    async fn touch(&self, key: &str, extra_ttl: Duration) -> bool {
        let mut state = self.inner.write();
        let now = Instant::now();

        match state.entries.get(key).map(|e| e.is_expired(now)) {
            Some(false) => {
                if let Some(entry) = state.entries.get_mut(key) {
                    entry.expires_at += extra_ttl;
                }
                trace!(key = %key, "Cache entry expiry extended");
                true
            }
            Some(true) => {
                state.entries.remove(key);
                self.counters.expired.fetch_add(1, AtomicOrdering::Relaxed);
                CacheMetrics::expired(1);
                CacheMetrics::update_size(state.entries.len());
                false
            }
            None => false,
        }
    }

    async fn clear(&self) {
        let mut state = self.inner.write();
        let removed = state.entries.len();
        state.entries.clear();
        CacheMetrics::update_size(0);
        debug!(removed, "Cache cleared");
    }

    async fn clear_tags(&self, tags: &[String]) -> u64 {
        let mut state = self.inner.write();
        let before = state.entries.len();
        state
            .entries
            .retain(|_, e| !tags.iter().any(|t| e.tags.contains(t)));
        let removed = (before - state.entries.len()) as u64;
        CacheMetrics::update_size(state.entries.len());
        debug!(removed, tags = ?tags, "Cache entries invalidated by tag");
        removed
    }

    async fn clear_pattern(&self, pattern: &str) -> QuorumResult<u64> {
        let re = Regex::new(pattern)
            .map_err(|e| QuorumError::validation(format!("invalid cache key pattern: {e}")))?;

        let mut state = self.inner.write();
        let before = state.entries.len();
        state.entries.retain(|k, _| !re.is_match(k));
        let removed = (before - state.entries.len()) as u64;
        CacheMetrics::update_size(state.entries.len());
        debug!(removed, pattern = %pattern, "Cache entries invalidated by pattern");
        Ok(removed)
    }

    async fn purge_expired(&self) -> usize {
        let mut state = self.inner.write();
        let reaped = Self::reap_expired(&mut state, Instant::now());
        if reaped > 0 {
            self.counters
                .expired
                .fetch_add(reaped as u64, AtomicOrdering::Relaxed);
            CacheMetrics::expired(reaped);
            CacheMetrics::update_size(state.entries.len());
        }
        reaped
    }

    async fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    fn stats(&self) -> CacheStats {
        let state = self.inner.read();
        CacheStats {
            size: state.entries.len(),
            capacity: self.capacity(),
            hits: self.counters.hits.load(AtomicOrdering::Relaxed),
            misses: self.counters.misses.load(AtomicOrdering::Relaxed),
            evictions: self.counters.evictions.load(AtomicOrdering::Relaxed),
            expired: self.counters.expired.load(AtomicOrdering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CachePriority;
    use crate::store::CacheStoreExt;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::AtomicU32;
    use tokio::time::sleep;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: u64,
        body: String,
    }

    fn payload(id: u64) -> Payload {
        Payload {
            id,
            body: format!("proposal-{id}"),
        }
    }

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_set_then_get_roundtrip() {
        let cache = MemoryCache::new(10);
        cache.set("p1", &payload(1), TTL).await.unwrap();

        let got: Option<Payload> = cache.get("p1").await.unwrap();
        assert_eq!(got, Some(payload(1)));
    }

    #[tokio::test]
    async fn test_get_returns_owned_copy() {
        let cache = MemoryCache::new(10);
        cache.set("p1", &payload(1), TTL).await.unwrap();

        let mut first: Payload = cache.get("p1").await.unwrap().unwrap();
        first.body.push_str("-mutated");

        let second: Payload = cache.get("p1").await.unwrap().unwrap();
        assert_eq!(second, payload(1));
    }

    #[tokio::test]
    async fn test_miss_after_ttl_elapses() {
        let cache = MemoryCache::new(10);
        cache
            .set("p1", &payload(1), Duration::from_millis(40))
            .await
            .unwrap();

        assert!(cache.contains("p1").await);
        sleep(Duration::from_millis(80)).await;

        let got: Option<Payload> = cache.get("p1").await.unwrap();
        assert_eq!(got, None);
        assert!(!cache.contains("p1").await);
    }

    #[tokio::test]
    async fn test_size_never_exceeds_capacity() {
        let cache = MemoryCache::new(2);

        for i in 0..10 {
            cache.set(&format!("k{i}"), &payload(i), TTL).await.unwrap();
            assert!(cache.len().await <= 2);
        }
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_over_capacity_set_evicts_exactly_one() {
        let cache = MemoryCache::new(2);
        cache.set("a", &payload(1), TTL).await.unwrap();
        cache.set("b", &payload(2), TTL).await.unwrap();
        cache.set("c", &payload(3), TTL).await.unwrap();

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.stats().evictions, 1);
        // The entry just inserted is never the victim.
        assert!(cache.contains("c").await);
    }

    #[tokio::test]
    async fn test_eviction_prefers_cold_entries() {
        let cache = MemoryCache::new(3);
        cache.set("a", &payload(1), TTL).await.unwrap();
        cache.set("b", &payload(2), TTL).await.unwrap();
        cache.set("c", &payload(3), TTL).await.unwrap();

        // Give a and b hits with a visibly later access time.
        sleep(Duration::from_millis(50)).await;
        let _: Option<Payload> = cache.get("a").await.unwrap();
        let _: Option<Payload> = cache.get("b").await.unwrap();

        cache.set("d", &payload(4), TTL).await.unwrap();

        assert!(cache.contains("a").await);
        assert!(cache.contains("b").await);
        assert!(!cache.contains("c").await);
        assert!(cache.contains("d").await);
    }

    #[tokio::test]
    async fn test_eviction_prefers_low_priority() {
        let cache = MemoryCache::new(2);
        cache
            .set_opts(
                "low",
                &payload(1),
                WriteOptions::new(TTL).with_priority(CachePriority::Low),
            )
            .await
            .unwrap();
        cache
            .set_opts(
                "high",
                &payload(2),
                WriteOptions::new(TTL).with_priority(CachePriority::High),
            )
            .await
            .unwrap();

        cache.set("newcomer", &payload(3), TTL).await.unwrap();

        assert!(!cache.contains("low").await);
        assert!(cache.contains("high").await);
        assert!(cache.contains("newcomer").await);
    }

    #[tokio::test]
    async fn test_expired_entries_reclaimed_before_eviction() {
        let cache = MemoryCache::new(2);
        cache
            .set("short", &payload(1), Duration::from_millis(30))
            .await
            .unwrap();
        cache.set("long", &payload(2), TTL).await.unwrap();

        sleep(Duration::from_millis(60)).await;
        cache.set("fresh", &payload(3), TTL).await.unwrap();

        // The expired entry made room; no live entry was evicted.
        assert_eq!(cache.stats().evictions, 0);
        assert!(cache.contains("long").await);
        assert!(cache.contains("fresh").await);
    }

    #[test]
    fn test_victim_tie_broken_by_insertion_order() {
        let now = Instant::now();
        let epoch = now;
        let mut entries = HashMap::new();

        let mut older = Entry::new(String::new(), &WriteOptions::new(TTL), now, 1);
        let mut newer = Entry::new(String::new(), &WriteOptions::new(TTL), now, 2);
        // Identical scores: same access time, hits, and priority.
        older.last_access = now;
        newer.last_access = now;
        entries.insert("older".to_string(), older);
        entries.insert("newer".to_string(), newer);

        assert_eq!(select_victim(&entries, epoch).as_deref(), Some("older"));
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_noop() {
        let cache = MemoryCache::new(10);
        assert!(!cache.delete("ghost").await);

        cache.set("p1", &payload(1), TTL).await.unwrap();
        assert!(cache.delete("p1").await);
        assert!(!cache.delete("p1").await);
    }

    #[tokio::test]
    async fn test_clear_tags_removes_exactly_tagged_entries() {
        let cache = MemoryCache::new(10);
        cache
            .set_opts("p1", &payload(1), WriteOptions::new(TTL).with_tag("proposals"))
            .await
            .unwrap();
        cache
            .set_opts("p2", &payload(2), WriteOptions::new(TTL).with_tag("proposals"))
            .await
            .unwrap();
        cache
            .set_opts("d1", &payload(3), WriteOptions::new(TTL).with_tag("deployments"))
            .await
            .unwrap();

        let removed = cache.clear_tags(&["proposals".to_string()]).await;
        assert_eq!(removed, 2);
        assert!(!cache.contains("p1").await);
        assert!(!cache.contains("p2").await);
        assert!(cache.contains("d1").await);
    }

    #[tokio::test]
    async fn test_clear_pattern() {
        let cache = MemoryCache::new(10);
        cache.set("proposal:1", &payload(1), TTL).await.unwrap();
        cache.set("proposal:2", &payload(2), TTL).await.unwrap();
        cache.set("deployment:1", &payload(3), TTL).await.unwrap();

        let removed = cache.clear_pattern("^proposal:").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_pattern_rejects_bad_regex() {
        let cache = MemoryCache::new(10);
        assert!(cache.clear_pattern("([unclosed").await.is_err());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let cache = MemoryCache::new(10);
        cache.set("a", &payload(1), TTL).await.unwrap();
        cache.set("b", &payload(2), TTL).await.unwrap();

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_touch_extends_expiry() {
        let cache = MemoryCache::new(10);
        cache
            .set("p1", &payload(1), Duration::from_millis(60))
            .await
            .unwrap();

        sleep(Duration::from_millis(30)).await;
        assert!(cache.touch("p1", Duration::from_millis(200)).await);

        sleep(Duration::from_millis(60)).await;
        // Past the original TTL but inside the extension.
        assert!(cache.contains("p1").await);
    }

    #[tokio::test]
    async fn test_touch_absent_or_expired_returns_false() {
        let cache = MemoryCache::new(10);
        assert!(!cache.touch("ghost", TTL).await);

        cache
            .set("p1", &payload(1), Duration::from_millis(30))
            .await
            .unwrap();
        sleep(Duration::from_millis(60)).await;
        assert!(!cache.touch("p1", TTL).await);
    }

    #[tokio::test]
    async fn test_purge_expired_reaps_only_expired() {
        let cache = MemoryCache::new(10);
        cache
            .set("short1", &payload(1), Duration::from_millis(30))
            .await
            .unwrap();
        cache
            .set("short2", &payload(2), Duration::from_millis(30))
            .await
            .unwrap();
        cache.set("long", &payload(3), TTL).await.unwrap();

        sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.purge_expired().await, 2);
        assert_eq!(cache.len().await, 1);
        assert!(cache.contains("long").await);
    }

    #[tokio::test]
    async fn test_get_or_set_invokes_factory_once_per_miss() {
        let cache = MemoryCache::new(10);
        let calls = AtomicU32::new(0);

        let value: Payload = cache
            .get_or_set("p1", TTL, || async {
                calls.fetch_add(1, AtomicOrdering::SeqCst);
                Ok(payload(1))
            })
            .await
            .unwrap();
        assert_eq!(value, payload(1));

        let value: Payload = cache
            .get_or_set("p1", TTL, || async {
                calls.fetch_add(1, AtomicOrdering::SeqCst);
                Ok(payload(2))
            })
            .await
            .unwrap();

        // Second call was served from cache.
        assert_eq!(value, payload(1));
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_set_propagates_factory_errors() {
        let cache = MemoryCache::new(10);

        let result: QuorumResult<Payload> = cache
            .get_or_set("p1", TTL, || async {
                Err(QuorumError::network("connection refused"))
            })
            .await;

        assert!(result.is_err());
        assert!(!cache.contains("p1").await);
    }

    #[tokio::test]
    async fn test_stats_counters() {
        let cache = MemoryCache::new(10);
        cache.set("p1", &payload(1), TTL).await.unwrap();

        let _: Option<Payload> = cache.get("p1").await.unwrap();
        let _: Option<Payload> = cache.get("p1").await.unwrap();
        let _: Option<Payload> = cache.get("ghost").await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.capacity, 10);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let cache = MemoryCache::new(0);
        cache.set("a", &payload(1), TTL).await.unwrap();
        cache.set("b", &payload(2), TTL).await.unwrap();
        assert_eq!(cache.len().await, 1);
    }
}
