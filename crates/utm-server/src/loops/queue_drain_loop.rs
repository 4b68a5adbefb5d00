//! Periodic queue-drain loop.
//!
//! Missions submitted while no aircraft was idle sit in the orchestrator's
//! queue; this loop re-attempts assignment on a fixed cadence so that an
//! aircraft going idle without a fresh telemetry update (e.g. after landing)
//! doesn't strand a queued mission indefinitely.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::interval;

use crate::state::AppState;

pub async fn run_queue_drain_loop(
    state: Arc<AppState>,
    interval_secs: u64,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Queue-drain loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let assigned = state.drain_queue().await;
                if !assigned.is_empty() {
                    tracing::info!("Queue drain assigned {} queued mission(s)", assigned.len());
                }
            }
        }
    }
}
