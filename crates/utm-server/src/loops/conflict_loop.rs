//! Periodic conflict rescan loop.
//!
//! Conflicts are detected eagerly whenever a mission is assigned, but this
//! loop rescans all committed trajectories on a fixed cadence as a backstop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::interval;

use crate::state::AppState;

pub async fn run_conflict_loop(
    state: Arc<AppState>,
    interval_secs: u64,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Conflict rescan loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let fresh = state.rescan_conflicts().await;
                if !fresh.is_empty() {
                    tracing::warn!("Conflict rescan found {} new conflict(s)", fresh.len());
                }
            }
        }
    }
}
