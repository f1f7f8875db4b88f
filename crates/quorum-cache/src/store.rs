//! Cache store trait for abstracted caching operations.

use crate::entry::WriteOptions;
use crate::memory::CacheStats;
use async_trait::async_trait;
use quorum_core::{QuorumError, QuorumResult};
use shaku::Interface;
use std::time::Duration;
use tracing::warn;

/// Cache store for short-lived key/value pairs.
///
/// Uses JSON strings for type-erased storage to maintain dyn-compatibility;
/// typed access goes through [`CacheStoreExt`]. Lookups never fail: an
/// absent or expired key is simply a miss.
#[async_trait]
pub trait CacheStore: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired. On a hit the
    /// entry's access bookkeeping is refreshed.
    async fn get_raw(&self, key: &str) -> Option<String>;

    /// Store a raw JSON value with the given TTL and default options.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration);

    /// Store a raw JSON value with explicit write options.
    ///
    /// If the cache is at capacity and `key` is new, exactly one entry is
    /// evicted first. The entry being inserted is never an eviction
    /// candidate.
    async fn set_with(&self, key: &str, value: &str, options: WriteOptions);

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> bool;

    /// Check whether a live (non-expired) entry exists for the key.
    async fn contains(&self, key: &str) -> bool;

    /// Extend an entry's expiry by `extra_ttl` without rewriting its value.
    ///
    /// Returns `false` when the key is absent or already expired.
    async fn touch(&self, key: &str, extra_ttl: Duration) -> bool;

    /// Remove all entries.
    async fn clear(&self);

    /// Remove every entry carrying at least one of the given tags.
    ///
    /// Returns the number of entries removed.
    async fn clear_tags(&self, tags: &[String]) -> u64;

    /// Remove every entry whose key matches the regular expression.
    ///
    /// Returns the number of entries removed, or a validation error for an
    /// unparseable pattern.
    async fn clear_pattern(&self, pattern: &str) -> QuorumResult<u64>;

    /// Remove all expired entries, returning how many were reaped.
    async fn purge_expired(&self) -> usize;

    /// Current number of stored entries (live and not-yet-reaped expired).
    async fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Counters and capacity snapshot.
    fn stats(&self) -> CacheStats;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheStoreExt: CacheStore {
    /// Get a typed value from the cache.
    ///
    /// The returned value is deserialized from the stored copy, so callers
    /// own it outright.
    async fn get<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> QuorumResult<Option<T>> {
        match self.get_raw(key).await {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Store a typed value with the given TTL.
    ///
    /// A value that cannot be serialized is rejected with a cache error;
    /// nothing is stored in that case.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> QuorumResult<()> {
        self.set_opts(key, value, WriteOptions::new(ttl)).await
    }

    /// Store a typed value with explicit write options.
    async fn set_opts<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        options: WriteOptions,
    ) -> QuorumResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| QuorumError::Cache(format!("failed to serialize cache value: {e}")))?;
        self.set_with(key, &json, options).await;
        Ok(())
    }

    /// Get a value or compute and cache it if not present.
    ///
    /// Concurrent misses for the same key may each invoke the factory; this
    /// layer does not de-duplicate in-flight producers. Callers needing
    /// single-flight semantics wrap the miss path themselves.
    async fn get_or_set<T, F, Fut>(&self, key: &str, ttl: Duration, factory: F) -> QuorumResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = QuorumResult<T>> + Send,
    {
        if let Some(cached) = self.get::<T>(key).await? {
            return Ok(cached);
        }

        let value = factory().await?;

        // The produced value is still valid even if it cannot be cached.
        if let Err(e) = self.set(key, &value, ttl).await {
            warn!(key = %key, error = %e, "Failed to cache computed value");
        }

        Ok(value)
    }
}

// Blanket implementation for all CacheStore implementations
impl<T: CacheStore + ?Sized> CacheStoreExt for T {}
