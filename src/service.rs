//! Periodic refresh loop

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::aggregator::Aggregator;
use crate::store::SnapshotStore;

/// Drive aggregation cycles: once immediately at startup, then on the
/// fixed interval until `shutdown` flips.
///
/// Every cycle runs as its own task with an id reserved at start time; a
/// cycle still in flight when a newer one publishes loses the race at the
/// store and its result is discarded. A failed cycle leaves the previous
/// snapshot in place.
pub async fn run_refresh_loop(
    aggregator: Arc<Aggregator>,
    store: Arc<SnapshotStore>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let cycle = store.begin_cycle();
                let aggregator = aggregator.clone();
                let store = store.clone();
                tokio::spawn(async move {
                    match aggregator.build_snapshot().await {
                        Ok(snapshot) => {
                            if store.publish(cycle, snapshot) {
                                info!(cycle, "snapshot replaced");
                            } else {
                                debug!(cycle, "cycle superseded; result discarded");
                            }
                        }
                        Err(err) => {
                            warn!(cycle, error = %err, "aggregation cycle failed; previous snapshot stays live");
                        }
                    }
                });
            }
            _ = shutdown.changed() => {
                info!("refresh loop shutting down");
                break;
            }
        }
    }
}
