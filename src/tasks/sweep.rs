//! Expired-Entry Sweep Task
//!
//! Background task that periodically removes expired entries from every
//! registered cache, bounding memory held by keys that are never read again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::CacheRegistry;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The first sweep happens one full interval after spawning. The returned
/// handle must be aborted during shutdown; the task never ends on its own.
///
/// # Example
/// ```ignore
/// let registry = CacheRegistry::new();
/// let sweep_handle = spawn_sweep_task(registry.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(registry: CacheRegistry, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs_f64()
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = registry.sweep_expired();
            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}
