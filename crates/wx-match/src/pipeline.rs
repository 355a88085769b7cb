use crate::fanout::{fan_out, NotificationTarget};
use crate::matcher::{
    match_locations_parallel, match_locations_until, MatchOptions, MatchPass, MatchedBy,
};
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};
use wx_core::{Hazard, HazardCategory, HazardId, Location};

pub const METRIC_CANDIDATES: &str = "wx_match_candidates_total";
pub const METRIC_MATCHED: &str = "wx_match_matched_total";
pub const METRIC_TARGETS: &str = "wx_fanout_targets_total";
pub const METRIC_PASS_SECONDS: &str = "wx_match_pass_seconds";

/// Registers help text for the matching metrics with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(METRIC_CANDIDATES, "Candidate locations evaluated against a hazard");
    describe_counter!(METRIC_MATCHED, "Locations matched, labelled by matching strategy");
    describe_counter!(METRIC_TARGETS, "Notification targets produced by fan-out");
    describe_histogram!(
        METRIC_PASS_SECONDS,
        Unit::Seconds,
        "Wall time of one hazard matching pass"
    );
}

/// Everything the dispatcher needs for one hazard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardNotification {
    pub hazard_id: HazardId,
    pub category: HazardCategory,
    #[serde(default)]
    pub label: Option<String>,
    pub targets: Vec<NotificationTarget>,
    #[serde(default)]
    pub truncated: bool,
}

impl HazardNotification {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Matches one hazard against a candidate snapshot and fans the result out
/// per owner.
pub fn notify(hazard: &Hazard, candidates: &[Location], options: &MatchOptions) -> HazardNotification {
    let started = Instant::now();
    let pass = run_pass(hazard, candidates, options);

    if pass.truncated {
        warn!(
            hazard_id = %hazard.id,
            evaluated = pass.evaluated,
            candidates = candidates.len(),
            "Matching pass hit its deadline"
        );
    }

    let targets = fan_out(&pass.matches);
    let elapsed = started.elapsed();

    let by_geometry = pass
        .matches
        .iter()
        .filter(|result| result.matched_by == MatchedBy::Geometry)
        .count();
    let by_code = pass.matches.len() - by_geometry;

    counter!(METRIC_CANDIDATES).increment(pass.evaluated as u64);
    counter!(METRIC_MATCHED, "matched_by" => MatchedBy::Geometry.as_str())
        .increment(by_geometry as u64);
    counter!(METRIC_MATCHED, "matched_by" => MatchedBy::Code.as_str()).increment(by_code as u64);
    counter!(METRIC_TARGETS, "family" => hazard.category.family()).increment(targets.len() as u64);
    histogram!(METRIC_PASS_SECONDS).record(elapsed.as_secs_f64());

    info!(
        hazard_id = %hazard.id,
        category = %hazard.category,
        candidates = candidates.len(),
        matched = pass.matches.len(),
        targets = targets.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Hazard matched"
    );

    HazardNotification {
        hazard_id: hazard.id.clone(),
        category: hazard.category,
        label: hazard.label.clone(),
        targets,
        truncated: pass.truncated,
    }
}

fn run_pass(hazard: &Hazard, candidates: &[Location], options: &MatchOptions) -> MatchPass {
    match options.deadline {
        Some(budget) => {
            debug!(hazard_id = %hazard.id, budget_ms = budget.as_millis() as u64, "Bounded matching pass");
            match_locations_until(hazard, candidates, options.mode, Instant::now() + budget)
        }
        None => {
            let matches = match_locations_parallel(hazard, candidates, options);
            MatchPass {
                matches,
                evaluated: candidates.len(),
                truncated: false,
            }
        }
    }
}
