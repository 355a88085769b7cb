use crate::matcher::MatchResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wx_core::{OwnerKind, OwnerRef};

/// One device or user to notify, with the names of its affected locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTarget {
    pub owner_ref: OwnerRef,
    pub owner_kind: OwnerKind,
    pub location_names: Vec<String>,
}

/// Groups matches by owner. Owners and names keep first-seen order; repeated
/// names for the same owner are dropped.
pub fn fan_out(matches: &[MatchResult]) -> Vec<NotificationTarget> {
    let mut slots: HashMap<(OwnerKind, &OwnerRef), usize> = HashMap::new();
    let mut targets: Vec<NotificationTarget> = Vec::new();

    for result in matches {
        let location = &result.location;
        let slot = *slots
            .entry((location.owner_kind, &location.owner_ref))
            .or_insert_with(|| {
                targets.push(NotificationTarget {
                    owner_ref: location.owner_ref.clone(),
                    owner_kind: location.owner_kind,
                    location_names: Vec::new(),
                });
                targets.len() - 1
            });

        let names = &mut targets[slot].location_names;
        if !names.iter().any(|name| *name == location.name) {
            names.push(location.name.clone());
        }
    }

    targets
}
