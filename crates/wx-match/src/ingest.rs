use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use wx_core::{EffectiveWindow, Hazard, HazardCategory, HazardCodes, HazardId};
use wx_geo::{decode_value, GeometryError};

/// A hazard as it arrives from feed parsing, before its geometry is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardDraft {
    pub id: HazardId,
    pub category: HazardCategory,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub codes: Option<HazardCodes>,
    #[serde(default)]
    pub effective_window: Option<EffectiveWindow>,
}

impl HazardDraft {
    /// Decode errors block the hazard.
    pub fn into_hazard(self) -> Result<Hazard, GeometryError> {
        let geometry = decode_value(&self.geometry)?;
        Ok(self.build(Some(geometry)))
    }

    /// Like [`into_hazard`](Self::into_hazard), but a hazard that also carries
    /// codes falls back to code matching when its geometry is unusable.
    pub fn into_hazard_lenient(self) -> Result<Hazard, GeometryError> {
        match decode_value(&self.geometry) {
            Ok(geometry) => Ok(self.build(Some(geometry))),
            Err(err) if self.codes.as_ref().is_some_and(|codes| !codes.is_empty()) => {
                warn!(
                    hazard_id = %self.id,
                    error = %err,
                    "Dropping undecodable geometry, falling back to codes"
                );
                Ok(self.build(None))
            }
            Err(err) => Err(err),
        }
    }

    fn build(self, geometry: Option<wx_geo::Geometry>) -> Hazard {
        Hazard {
            id: self.id,
            category: self.category,
            label: self.label,
            geometry: geometry.filter(|geometry| !geometry.is_none()),
            codes: self.codes,
            effective_window: self.effective_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(geometry: Value, codes: Option<HazardCodes>) -> HazardDraft {
        serde_json::from_value(json!({
            "id": "urn:oid:2.49.0.1.840.0.abc",
            "category": { "alert": "Severe Thunderstorm Warning" },
            "geometry": geometry,
            "codes": codes,
        }))
        .unwrap()
    }

    #[test]
    fn strict_decode_propagates_errors() {
        let bad = json!({ "type": "Polygon", "coordinates": [] });
        let err = draft(bad, Some(crate::fixtures::ugc(&["OKC027"])))
            .into_hazard()
            .unwrap_err();
        assert_eq!(err, GeometryError::EmptyRing("Polygon"));
    }

    #[test]
    fn lenient_decode_falls_back_to_codes() {
        let bad = json!({ "type": "Polygon", "coordinates": [[[0.0, 0.0]]] });
        let hazard = draft(bad, Some(crate::fixtures::ugc(&["OKC027"])))
            .into_hazard_lenient()
            .unwrap();
        assert!(!hazard.has_geometry());
        assert!(hazard.affected_codes().contains("OKC027"));
    }

    #[test]
    fn lenient_decode_without_codes_still_fails() {
        let bad = json!({ "type": "Circle", "coordinates": [] });
        assert!(draft(bad, None).into_hazard_lenient().is_err());
    }

    #[test]
    fn valid_geometry_is_kept() {
        let raw = json!({ "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]] });
        let hazard = draft(raw, None).into_hazard().unwrap();
        assert!(hazard.has_geometry());
    }

    #[test]
    fn null_geometry_is_absent() {
        let hazard = draft(Value::Null, None).into_hazard().unwrap();
        assert!(hazard.geometry.is_none());
    }
}
