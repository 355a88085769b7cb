mod pass;
mod snapshot;

use anyhow::{ensure, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use wx_config::{MatchingConfig, ServiceConfig, WorkerConfig};
use wx_dispatch::LoggingSink;
use wx_observability::{init, log_startup, ObservabilityConfig};
use wx_storage::MemoryStore;

use crate::pass::{match_options, run_pass, select_hazards};
use crate::snapshot::Snapshot;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from_env("wx-worker");
    let obs_config = ObservabilityConfig::from(&config);
    let handle = init(&obs_config);
    log_startup(&handle, &obs_config);
    wx_match::describe_metrics();

    let matching = MatchingConfig::from_env();
    let worker = WorkerConfig::from_env();
    let fixture_path = worker
        .fixture_path
        .as_deref()
        .context("WX_FIXTURE_PATH must point at a hazard/location snapshot")?;

    let (hazards, locations) = Snapshot::load(Path::new(fixture_path)).await?.into_parts();
    info!(
        path = %fixture_path,
        hazards = hazards.len(),
        locations = locations.len(),
        "Snapshot loaded"
    );
    let store = Arc::new(MemoryStore::with_data(hazards, locations));

    let selected = select_hazards(store.as_ref(), &worker.hazard_ids).await?;
    let summary = run_pass(
        store,
        Arc::new(LoggingSink),
        selected,
        match_options(&matching),
        &config.service_name,
    )
    .await;

    ensure!(
        summary.failed == 0,
        "{} of {} hazards failed during the matching pass",
        summary.failed,
        summary.hazards
    );
    Ok(())
}
