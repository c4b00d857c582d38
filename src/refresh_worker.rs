// Background refresh worker.
//
// The first refresh tick fires immediately (the startup aggregation); later
// ticks follow the configured period whether or not the previous cycle
// succeeded. The aggregator serializes cycles, so a tick landing mid-cycle
// queues behind it rather than racing it. The same task runs the cache
// eviction sweep.

use std::sync::Arc;

use tokio::time::{Duration, interval};
use tracing::{debug, info};

use crate::aggregator::Aggregator;
use crate::cache_store::CacheStore;

pub struct WorkerDeps {
    pub aggregator: Arc<Aggregator>,
    pub cache: Arc<CacheStore>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub refresh_interval_secs: u64,
    pub sweep_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        aggregator,
        cache,
        mut shutdown_rx,
    } = deps;

    tokio::spawn(async move {
        let mut refresh_tick = interval(Duration::from_secs(config.refresh_interval_secs));
        refresh_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut sweep_tick = interval(Duration::from_secs(config.sweep_interval_secs));
        sweep_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = refresh_tick.tick() => {
                    let snapshot = aggregator.run().await;
                    debug!(
                        operation = "refresh",
                        total_records = snapshot.total_records(),
                        "refresh cycle complete"
                    );
                }
                _ = sweep_tick.tick() => {
                    let evicted = cache.sweep_expired().await;
                    if evicted > 0 {
                        info!(
                            operation = "sweep",
                            evicted,
                            "evicted expired snapshots"
                        );
                    }
                }
                _ = &mut shutdown_rx => {
                    debug!("Refresh worker shutting down");
                    break;
                }
            }
        }
    })
}
