//! Background sweeper that reaps expired cache entries.
//!
//! Lazy deletion only reclaims entries that are looked up again; the
//! sweeper bounds memory growth from abandoned entries by scanning on a
//! fixed period independent of request traffic.

use crate::store::CacheStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Handle to a running sweep task.
pub struct Sweeper {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawns a sweep task over `store`, scanning once per `period`.
    #[must_use]
    pub fn spawn(store: Arc<dyn CacheStore>, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(period_ms = period.as_millis() as u64, "Cache sweeper started");

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    _ = ticker.tick() => {
                        let reaped = store.purge_expired().await;
                        if reaped > 0 {
                            debug!(reaped, "Sweeper reaped expired cache entries");
                        }
                    }
                }
            }

            info!("Cache sweeper stopped");
        });

        Self { shutdown_tx, handle }
    }

    /// Signals the sweep task to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Stops the task and waits for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCache;
    use crate::store::CacheStoreExt;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_sweeper_reaps_expired_entries() {
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(10));
        cache
            .set("short", &1u64, Duration::from_millis(30))
            .await
            .unwrap();
        cache.set("long", &2u64, Duration::from_secs(60)).await.unwrap();

        let sweeper = Sweeper::spawn(Arc::clone(&cache), Duration::from_millis(25));

        sleep(Duration::from_millis(120)).await;

        // The expired entry is gone without anyone accessing it.
        assert_eq!(cache.len().await, 1);
        assert!(cache.contains("long").await);

        sweeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_shutdown() {
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(10));
        let sweeper = Sweeper::spawn(Arc::clone(&cache), Duration::from_millis(10));

        sweeper.shutdown().await;

        // Entries expiring after shutdown stay until accessed.
        cache
            .set("short", &1u64, Duration::from_millis(20))
            .await
            .unwrap();
        sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.len().await, 1);
    }
}
