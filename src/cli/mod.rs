pub mod gdp;
pub mod setup;
pub mod snapshot;
pub mod ui;

use crate::core::{Aggregator, MarketSnapshot};
use anyhow::{Context, Result};
use tracing::debug;

/// Runs the aggregator while a spinner tracks its load state.
pub async fn load_snapshot(aggregator: Aggregator, show_progress: bool) -> Result<MarketSnapshot> {
    let mut state = aggregator.subscribe();
    let spinner = show_progress.then(|| ui::new_spinner("Fetching indicators..."));

    let handle = tokio::spawn(aggregator.load());
    let published = state.wait_for(|s| !s.is_loading()).await.is_ok();
    debug!(published, "Load state settled");

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    handle.await.context("Indicator load task failed")
}
