//! Cache entry bookkeeping.

use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Eviction priority tier for a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePriority {
    /// Evicted first under pressure.
    Low,
    /// The default tier.
    #[default]
    Normal,
    /// Evicted last under pressure.
    High,
}

impl CachePriority {
    /// Multiplicative weight of this tier in the eviction score.
    #[must_use]
    pub const fn weight(self) -> u64 {
        match self {
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
        }
    }
}

/// Options applied when storing an entry.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Time-to-live for the entry.
    pub ttl: Duration,
    /// Eviction priority tier.
    pub priority: CachePriority,
    /// Tags for bulk invalidation.
    pub tags: Vec<String>,
}

impl WriteOptions {
    /// Creates write options with the given TTL and default priority.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            priority: CachePriority::default(),
            tags: Vec::new(),
        }
    }

    /// Sets the priority tier.
    #[must_use]
    pub fn with_priority(mut self, priority: CachePriority) -> Self {
        self.priority = priority;
        self
    }

    /// Adds an invalidation tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Adds several invalidation tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }
}

/// A stored entry. The value is an owned serialized copy.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    /// Serialized value.
    pub value: String,

    /// Absolute expiry deadline.
    pub expires_at: Instant,

    /// Eviction priority tier.
    pub priority: CachePriority,

    /// Tags for bulk invalidation.
    pub tags: HashSet<String>,

    /// Number of successful lookups.
    pub hit_count: u64,

    /// Time of the last successful lookup (insertion time until then).
    pub last_access: Instant,

    /// Monotone insertion sequence, used for deterministic eviction
    /// tie-breaks.
    pub seq: u64,
}

impl Entry {
    pub(crate) fn new(value: String, options: &WriteOptions, now: Instant, seq: u64) -> Self {
        Self {
            value,
            expires_at: now + options.ttl,
            priority: options.priority,
            tags: options.tags.iter().cloned().collect(),
            hit_count: 0,
            last_access: now,
            seq,
        }
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    /// Eviction score: `(hits + 1) x priority weight x seconds of
    /// last access since the cache epoch`. Lower scores are evicted first,
    /// so cold, low-priority, long-idle entries go before hot ones.
    pub(crate) fn score(&self, epoch: Instant) -> f64 {
        let last_access_secs = self.last_access.saturating_duration_since(epoch).as_secs_f64();
        (self.hit_count + 1) as f64 * self.priority.weight() as f64 * last_access_secs
    }

    pub(crate) fn record_hit(&mut self, now: Instant) {
        self.hit_count += 1;
        self.last_access = now;
    }
}
