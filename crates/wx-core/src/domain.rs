use crate::category::HazardCategory;
use crate::ids::{HazardId, LocationId, OwnerRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use wx_geo::{Geometry, Point};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = u64;

pub fn now_epoch_millis() -> EpochMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as EpochMillis)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Device,
    User,
}

/// How a geometry-bearing hazard treats its codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Geometry wins outright; codes are ignored when a geometry is present.
    #[default]
    Exclusive,
    /// Geometry matches plus code matches for locations outside the geometry.
    Union,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMatchMode(pub String);

impl fmt::Display for UnknownMatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown match mode: {} (expected exclusive or union)", self.0)
    }
}

impl std::error::Error for UnknownMatchMode {}

impl FromStr for MatchMode {
    type Err = UnknownMatchMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exclusive" | "geometry" => Ok(Self::Exclusive),
            "union" => Ok(Self::Union),
            _ => Err(UnknownMatchMode(value.trim().to_string())),
        }
    }
}

/// Administrative codes an alert was issued for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardCodes {
    #[serde(default, alias = "SAME")]
    pub same: BTreeSet<String>,
    #[serde(default, alias = "UGC")]
    pub ugc: BTreeSet<String>,
}

impl HazardCodes {
    pub fn is_empty(&self) -> bool {
        self.same.is_empty() && self.ugc.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        !code.is_empty() && (self.ugc.contains(code) || self.same.contains(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ugc.iter().chain(self.same.iter()).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveWindow {
    #[serde(default)]
    pub start_ms: Option<EpochMillis>,
    #[serde(default)]
    pub end_ms: Option<EpochMillis>,
}

impl EffectiveWindow {
    pub fn new(start_ms: Option<EpochMillis>, end_ms: Option<EpochMillis>) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn contains(&self, at_ms: EpochMillis) -> bool {
        let started = self.start_ms.is_none_or(|start| at_ms >= start);
        let not_ended = self.end_ms.is_none_or(|end| at_ms < end);
        started && not_ended
    }
}

/// An alert, convective outlook, or mesoscale discussion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: HazardId,
    pub category: HazardCategory,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub codes: Option<HazardCodes>,
    #[serde(default)]
    pub effective_window: Option<EffectiveWindow>,
}

impl Hazard {
    pub fn new(id: impl Into<HazardId>, category: HazardCategory) -> Self {
        Self {
            id: id.into(),
            category,
            label: None,
            geometry: None,
            codes: None,
            effective_window: None,
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_codes(mut self, codes: HazardCodes) -> Self {
        self.codes = Some(codes);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_window(mut self, window: EffectiveWindow) -> Self {
        self.effective_window = Some(window);
        self
    }

    /// The usable geometry, if any. `Geometry::None` counts as absent.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref().filter(|geometry| !geometry.is_none())
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry().is_some()
    }

    /// UGC and SAME codes, merged.
    pub fn affected_codes(&self) -> BTreeSet<&str> {
        self.codes
            .as_ref()
            .map(|codes| codes.iter().collect())
            .unwrap_or_default()
    }

    pub fn has_codes(&self) -> bool {
        self.codes.as_ref().is_some_and(|codes| !codes.is_empty())
    }

    pub fn is_active(&self, at_ms: EpochMillis) -> bool {
        self.effective_window
            .is_none_or(|window| window.contains(at_ms))
    }
}

/// A subscriber's saved place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub owner_kind: OwnerKind,
    pub owner_ref: OwnerRef,
    #[serde(default)]
    pub zone_code: String,
    #[serde(default)]
    pub county_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[serde(default)]
    pub option_set: BTreeSet<HazardCategory>,
}

impl Location {
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    pub fn subscribes_to(&self, category: HazardCategory) -> bool {
        self.option_set.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::AlertType;
    use rstest::rstest;

    fn warning() -> Hazard {
        Hazard::new("urn:oid:2.49.0.1.840.0.1", AlertType::TornadoWarning.into())
    }

    #[rstest]
    #[case(None, None, 5, true)]
    #[case(Some(10), None, 5, false)]
    #[case(Some(10), None, 10, true)]
    #[case(None, Some(10), 9, true)]
    #[case(None, Some(10), 10, false)]
    #[case(Some(10), Some(20), 15, true)]
    #[case(Some(10), Some(20), 25, false)]
    fn window_bounds(
        #[case] start: Option<EpochMillis>,
        #[case] end: Option<EpochMillis>,
        #[case] at: EpochMillis,
        #[case] expected: bool,
    ) {
        let hazard = warning().with_window(EffectiveWindow::new(start, end));
        assert_eq!(hazard.is_active(at), expected);
    }

    #[rstest]
    #[case("exclusive", Ok(MatchMode::Exclusive))]
    #[case(" Union ", Ok(MatchMode::Union))]
    #[case(" both ", Err(UnknownMatchMode("both".to_string())))]
    fn match_mode_parses(
        #[case] input: &str,
        #[case] expected: Result<MatchMode, UnknownMatchMode>,
    ) {
        assert_eq!(input.parse::<MatchMode>(), expected);
    }

    #[test]
    fn unknown_match_mode_names_the_input() {
        let err = "geometry+codes".parse::<MatchMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown match mode: geometry+codes (expected exclusive or union)"
        );
    }

    #[test]
    fn missing_window_is_always_active() {
        assert!(warning().is_active(0));
        assert!(warning().is_active(EpochMillis::MAX));
    }

    #[test]
    fn affected_codes_merge_ugc_and_same() {
        let codes = HazardCodes {
            same: ["030111".to_string()].into(),
            ugc: ["MTC083".to_string(), "MTZ028".to_string()].into(),
        };
        let hazard = warning().with_codes(codes);
        let affected = hazard.affected_codes();
        assert_eq!(affected.len(), 3);
        assert!(affected.contains("MTC083"));
        assert!(affected.contains("030111"));
        assert!(hazard.has_codes());
        assert!(!hazard.has_geometry());
    }

    #[test]
    fn geometry_none_is_not_a_geometry() {
        let hazard = warning().with_geometry(Geometry::None);
        assert!(!hazard.has_geometry());
        assert!(hazard.geometry().is_none());
    }

    #[test]
    fn empty_code_never_matches() {
        let codes = HazardCodes::default();
        assert!(!codes.contains(""));
    }

    #[test]
    fn hazard_decodes_from_feed_json() {
        let raw = serde_json::json!({
            "id": "mcd-2024-0412",
            "category": "mesoscale_discussion",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[-97.0, 35.0], [-96.0, 35.0], [-96.0, 36.0], [-97.0, 36.0]]]
            },
            "codes": { "UGC": ["OKC109"] }
        });
        let hazard: Hazard = serde_json::from_value(raw).unwrap();
        assert!(hazard.has_geometry());
        assert!(hazard.affected_codes().contains("OKC109"));
        assert_eq!(hazard.category, HazardCategory::MesoscaleDiscussion);
    }
}
