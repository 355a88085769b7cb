//! Hazard-to-location matching and per-owner fan-out.
//!
//! Every entry point is a pure function over borrowed data; callers can run
//! independent hazards concurrently as long as the location snapshot is not
//! mutated during a pass.

pub mod fanout;
pub mod ingest;
pub mod matcher;
pub mod pipeline;

#[cfg(test)]
mod fixtures;

pub use fanout::{fan_out, NotificationTarget};
pub use ingest::HazardDraft;
pub use matcher::{
    match_locations, match_locations_parallel, match_locations_until, match_locations_with,
    MatchOptions, MatchPass, MatchResult, MatchedBy,
};
pub use pipeline::{describe_metrics, notify, HazardNotification};
