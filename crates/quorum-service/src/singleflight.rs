//! Per-key de-duplication of in-flight cache fills.
//!
//! The cache's `get_or_set` deliberately lets concurrent misses race; the
//! service read path serializes them instead. Callers acquire the key's
//! flight, re-check the cache, and only the first arrival pays for the
//! chain fetch.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-key async mutex map.
#[derive(Default)]
pub struct Singleflight {
    flights: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Holds the flight for a key until dropped.
pub struct FlightGuard {
    _guard: OwnedMutexGuard<()>,
}

impl Singleflight {
    /// Creates an empty flight map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the flight for `key`, waiting behind any current holder.
    pub async fn acquire(&self, key: &str) -> FlightGuard {
        let lock = {
            let mut flights = self.flights.lock().await;
            // Opportunistically drop locks nobody is holding or waiting on.
            flights.retain(|_, l| Arc::strong_count(l) > 1);
            Arc::clone(
                flights
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };

        FlightGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Number of keys currently tracked.
    pub async fn len(&self) -> usize {
        self.flights.lock().await.len()
    }

    /// Whether no keys are tracked.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
