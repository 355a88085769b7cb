use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::warn;
use wx_core::{Hazard, Location};
use wx_match::HazardDraft;

/// Hazards and locations captured from upstream storage.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub hazards: Vec<HazardDraft>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl Snapshot {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse snapshot JSON")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::parse(&raw)
    }

    /// Decodes every hazard draft. Drafts whose geometry cannot be decoded
    /// and that carry no codes are dropped.
    pub fn into_parts(self) -> (Vec<Hazard>, Vec<Location>) {
        let hazards = self
            .hazards
            .into_iter()
            .filter_map(|draft| {
                let id = draft.id.clone();
                match draft.into_hazard_lenient() {
                    Ok(hazard) => Some(hazard),
                    Err(err) => {
                        warn!(hazard_id = %id, error = %err, "Rejecting hazard with malformed geometry");
                        None
                    }
                }
            })
            .collect();
        (hazards, self.locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"{
        "hazards": [
            {
                "id": "good",
                "category": { "alert": "Tornado Warning" },
                "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]] }
            },
            {
                "id": "fallback",
                "category": { "alert": "Flood Warning" },
                "geometry": { "type": "Polygon", "coordinates": [] },
                "codes": { "UGC": ["OKC027"] }
            },
            {
                "id": "rejected",
                "category": "mesoscale_discussion",
                "geometry": { "type": "Polygon", "coordinates": [] }
            }
        ],
        "locations": [
            {
                "id": "loc-1",
                "owner_kind": "device",
                "owner_ref": "device-1",
                "zone_code": "OKZ025",
                "county_code": "OKC027",
                "latitude": 2.0,
                "longitude": 2.0,
                "name": "Home",
                "option_set": [{ "alert": "Tornado Warning" }]
            }
        ]
    }"#;

    #[test]
    fn drops_only_unrecoverable_hazards() {
        let (hazards, locations) = Snapshot::parse(RAW).unwrap().into_parts();
        let ids: Vec<_> = hazards.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["good", "fallback"]);
        assert!(hazards[0].has_geometry());
        assert!(!hazards[1].has_geometry());
        assert_eq!(locations.len(), 1);
    }

    #[test]
    fn empty_document_is_an_empty_snapshot() {
        let (hazards, locations) = Snapshot::parse("{}").unwrap().into_parts();
        assert!(hazards.is_empty());
        assert!(locations.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Snapshot::parse("[").is_err());
    }
}
