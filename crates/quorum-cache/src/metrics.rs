//! Prometheus metrics for cache monitoring.

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Metric names for the cache subsystem.
pub mod names {
    /// Total lookup hits.
    pub const CACHE_HITS_TOTAL: &str = "quorum_cache_hits_total";
    /// Total lookup misses.
    pub const CACHE_MISSES_TOTAL: &str = "quorum_cache_misses_total";
    /// Total capacity evictions.
    pub const CACHE_EVICTIONS_TOTAL: &str = "quorum_cache_evictions_total";
    /// Total entries removed after their TTL elapsed.
    pub const CACHE_EXPIRED_TOTAL: &str = "quorum_cache_expired_total";
    /// Current number of stored entries.
    pub const CACHE_ENTRIES: &str = "quorum_cache_entries";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache lookup hits");
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of cache lookup misses"
    );
    describe_counter!(
        names::CACHE_EVICTIONS_TOTAL,
        "Total number of entries evicted under capacity pressure"
    );
    describe_counter!(
        names::CACHE_EXPIRED_TOTAL,
        "Total number of entries removed after TTL expiry"
    );
    describe_gauge!(names::CACHE_ENTRIES, "Current number of cached entries");
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a lookup hit.
    pub fn hit() {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }

    /// Record a lookup miss.
    pub fn miss() {
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record a capacity eviction.
    pub fn eviction() {
        counter!(names::CACHE_EVICTIONS_TOTAL).increment(1);
    }

    /// Record `count` TTL expiries.
    pub fn expired(count: usize) {
        counter!(names::CACHE_EXPIRED_TOTAL).increment(count as u64);
    }

    /// Update the stored-entry gauge.
    pub fn update_size(size: usize) {
        gauge!(names::CACHE_ENTRIES).set(size as f64);
    }
}
