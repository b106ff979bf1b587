//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! that are written once and never read again do not accumulate.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedStore;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task alternates between sleeping for `interval` and running one
/// `cleanup()` pass under the write lock. Passes never overlap.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store: SharedStore = Arc::new(RwLock::new(CacheStore::new()));
/// let cleanup_handle = spawn_cleanup_task(store.clone(), Duration::from_secs(600));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: SharedStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = store.write().await;
                guard.cleanup()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
