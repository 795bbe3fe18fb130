//! TTL Sweep Task
//!
//! Background task that periodically removes stale cache entries.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::SharedState;

/// Spawns the task that sweeps a cache's map once per `interval`.
///
/// The first sweep runs one full interval after the task starts. Each sweep
/// takes the cache lock, drops every entry older than `interval`, and releases
/// it. The shutdown signal is checked between ticks; the task also exits when
/// the sender side is dropped along with its cache.
///
/// # Arguments
/// * `runtime` - Runtime the task is spawned on
/// * `state` - Shared map and counters of the owning cache
/// * `interval` - Sweep period and maximum entry age
/// * `shutdown_rx` - Becomes `true` when the cache is closed
pub(crate) fn spawn_sweep_task<V>(
    runtime: &Handle,
    state: SharedState<V>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    runtime.spawn(async move {
        debug!("Starting TTL sweep task with interval of {:?}", interval);

        let Some(start) = Instant::now().checked_add(interval) else {
            // Nothing can ever get old enough to sweep.
            debug!("Sweep interval {:?} exceeds the clock range, sweeper idle", interval);
            let _ = shutdown_rx.wait_for(|closed| *closed).await;
            return;
        };

        let mut ticker = time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = state.lock().await.sweep(interval, Instant::now());

                    if removed > 0 {
                        info!("TTL sweep: removed {} stale entries", removed);
                    } else {
                        debug!("TTL sweep: no stale entries found");
                    }
                }
            }
        }

        debug!("TTL sweep task stopped");
    })
}
