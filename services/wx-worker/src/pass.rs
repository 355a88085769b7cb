use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};
use wx_config::MatchingConfig;
use wx_core::{now_epoch_millis, ErrorCode, Hazard, HazardId};
use wx_dispatch::{NotificationEnvelope, NotificationSink};
use wx_match::{notify, HazardNotification, MatchOptions};
use wx_storage::{HazardRepository, LocationRepository};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub hazards: usize,
    pub dispatched: usize,
    pub targets: usize,
    /// Hazards whose lookup, matching or delivery failed.
    pub failed: usize,
}

pub fn match_options(config: &MatchingConfig) -> MatchOptions {
    MatchOptions {
        mode: config.mode,
        parallel: config.parallel,
        min_parallel_candidates: config.min_parallel_candidates,
        deadline: config.deadline_ms.map(Duration::from_millis),
    }
}

/// Requested hazards, or every currently active one when none are named.
pub async fn select_hazards<R>(store: &R, hazard_ids: &[String]) -> Result<Vec<Hazard>>
where
    R: HazardRepository + ?Sized,
{
    if hazard_ids.is_empty() {
        return store
            .list_active(now_epoch_millis())
            .await
            .context("Failed to list active hazards");
    }

    let mut hazards = Vec::with_capacity(hazard_ids.len());
    for raw in hazard_ids {
        let id = HazardId::new(raw.as_str());
        match store.require_hazard(&id).await {
            Ok(hazard) => hazards.push(hazard),
            Err(err) if err.code == ErrorCode::NotFound => {
                warn!(hazard_id = %id, "Requested hazard not found");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to load hazard {id}"));
            }
        }
    }
    Ok(hazards)
}

/// Matches each hazard on the blocking pool and hands non-empty results to
/// `sink`. Hazards run concurrently; each works on its own candidate snapshot.
/// A failure is logged and counted against its own hazard only.
pub async fn run_pass<S, D>(
    store: Arc<S>,
    sink: Arc<D>,
    hazards: Vec<Hazard>,
    options: MatchOptions,
    source_service: &str,
) -> PassSummary
where
    S: LocationRepository + ?Sized,
    D: NotificationSink + ?Sized,
{
    let mut summary = PassSummary {
        hazards: hazards.len(),
        ..PassSummary::default()
    };
    let mut tasks: JoinSet<HazardNotification> = JoinSet::new();

    for hazard in hazards {
        let candidates = match store.find_candidates(&hazard).await {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(hazard_id = %hazard.id, %error, "Candidate lookup failed");
                summary.failed += 1;
                continue;
            }
        };
        let options = options.clone();
        tasks.spawn_blocking(move || notify(&hazard, &candidates, &options));
    }

    while let Some(joined) = tasks.join_next().await {
        let notification = match joined {
            Ok(notification) => notification,
            Err(error) => {
                warn!(%error, "Matching task failed");
                summary.failed += 1;
                continue;
            }
        };
        if notification.is_empty() {
            continue;
        }

        let hazard_id = notification.hazard_id.clone();
        let targets = notification.targets.len();
        let envelope = NotificationEnvelope::new(notification, now_epoch_millis(), source_service);
        match sink.dispatch(envelope).await {
            Ok(()) => {
                summary.dispatched += 1;
                summary.targets += targets;
            }
            Err(error) => {
                warn!(hazard_id = %hazard_id, %error, "Notification dispatch failed");
                summary.failed += 1;
            }
        }
    }

    info!(
        hazards = summary.hazards,
        dispatched = summary.dispatched,
        targets = summary.targets,
        failed = summary.failed,
        "Matching pass complete"
    );
    summary
}
