use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use wx_core::{Hazard, Location, MatchMode};
use wx_geo::{BoundingBox, Geometry};

/// Candidates evaluated between deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBy {
    Code,
    Geometry,
}

impl MatchedBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Geometry => "geometry",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub location: Location,
    pub matched_by: MatchedBy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    pub mode: MatchMode,
    pub parallel: bool,
    pub min_parallel_candidates: usize,
    pub deadline: Option<Duration>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Exclusive,
            parallel: true,
            min_parallel_candidates: 512,
            deadline: None,
        }
    }
}

/// Outcome of a bounded pass. `evaluated` counts candidates fully tested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchPass {
    pub matches: Vec<MatchResult>,
    pub evaluated: usize,
    pub truncated: bool,
}

/// A hazard prepared for repeated point tests.
struct Matcher<'a> {
    hazard: &'a Hazard,
    geometry: Option<&'a Geometry>,
    bbox: Option<BoundingBox>,
    mode: MatchMode,
}

impl<'a> Matcher<'a> {
    fn new(hazard: &'a Hazard, mode: MatchMode) -> Self {
        let geometry = hazard.geometry();
        Self {
            hazard,
            geometry,
            bbox: geometry.and_then(Geometry::bounding_box),
            mode,
        }
    }

    fn evaluate(&self, location: &Location) -> Option<MatchResult> {
        // Subscription filter commutes with matching; apply it first.
        if !location.subscribes_to(self.hazard.category) {
            return None;
        }

        let matched_by = match self.geometry {
            Some(geometry) => {
                if self.geometry_match(geometry, location) {
                    MatchedBy::Geometry
                } else if self.mode == MatchMode::Union && self.code_match(location) {
                    MatchedBy::Code
                } else {
                    return None;
                }
            }
            None if self.code_match(location) => MatchedBy::Code,
            None => return None,
        };

        Some(MatchResult {
            location: location.clone(),
            matched_by,
        })
    }

    fn geometry_match(&self, geometry: &Geometry, location: &Location) -> bool {
        let point = location.point();
        if self.bbox.is_some_and(|bbox| !bbox.contains(&point)) {
            return false;
        }
        geometry.contains_point(&point)
    }

    fn code_match(&self, location: &Location) -> bool {
        self.hazard.codes.as_ref().is_some_and(|codes| {
            codes.contains(&location.zone_code) || codes.contains(&location.county_code)
        })
    }
}

/// Locations affected by `hazard`, matched by geometry when it has one and by
/// zone/county code otherwise.
pub fn match_locations(hazard: &Hazard, candidates: &[Location]) -> Vec<MatchResult> {
    match_locations_with(hazard, candidates, MatchMode::Exclusive)
}

pub fn match_locations_with(
    hazard: &Hazard,
    candidates: &[Location],
    mode: MatchMode,
) -> Vec<MatchResult> {
    let matcher = Matcher::new(hazard, mode);
    candidates
        .iter()
        .filter_map(|location| matcher.evaluate(location))
        .collect()
}

/// Same result set as [`match_locations_with`]; order may differ.
pub fn match_locations_parallel(
    hazard: &Hazard,
    candidates: &[Location],
    options: &MatchOptions,
) -> Vec<MatchResult> {
    if !options.parallel || candidates.len() < options.min_parallel_candidates {
        return match_locations_with(hazard, candidates, options.mode);
    }
    let matcher = Matcher::new(hazard, options.mode);
    candidates
        .par_iter()
        .filter_map(|location| matcher.evaluate(location))
        .collect()
}

/// Sequential pass that stops at a candidate boundary once `deadline` passes.
pub fn match_locations_until(
    hazard: &Hazard,
    candidates: &[Location],
    mode: MatchMode,
    deadline: Instant,
) -> MatchPass {
    let matcher = Matcher::new(hazard, mode);
    let mut pass = MatchPass::default();

    for (index, location) in candidates.iter().enumerate() {
        if index % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
            pass.truncated = true;
            break;
        }
        if let Some(result) = matcher.evaluate(location) {
            pass.matches.push(result);
        }
        pass.evaluated += 1;
    }

    pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{county_warning, location, polygon_warning, ugc, TORNADO};
    use std::collections::BTreeSet;
    use wx_core::{AlertType, ConvectiveOutlookType, Hazard, HazardCategory, LocationId};
    use wx_geo::{Geometry, MultiPoint, MultiPolygon, Point, Polygon};

    fn ids(matches: &[MatchResult]) -> BTreeSet<LocationId> {
        matches.iter().map(|m| m.location.id.clone()).collect()
    }

    #[test]
    fn geometry_hazard_matches_by_containment() {
        let candidates = vec![
            location("inside", "d1", "Home", (2.5, 2.5)),
            location("hole", "d1", "Cabin", (1.5, 1.5)),
            location("edge", "d2", "Barn", (4.0, 2.0)),
            location("far", "d3", "Office", (40.0, 40.0)),
        ];
        let matches = match_locations(&polygon_warning(), &candidates);
        assert_eq!(ids(&matches), BTreeSet::from(["inside".into(), "edge".into()]));
        assert!(matches.iter().all(|m| m.matched_by == MatchedBy::Geometry));
    }

    #[test]
    fn multipolygon_hazard_matches_any_part() {
        let part = |x: f64| {
            Polygon::new(
                MultiPoint::from_pairs(&[(x, 0.0), (x + 1.0, 0.0), (x + 1.0, 1.0), (x, 1.0)]),
                vec![],
            )
        };
        let hazard = Hazard::new("outlook", TORNADO).with_geometry(Geometry::MultiPolygon(
            MultiPolygon::new(vec![part(0.0), part(10.0)]),
        ));
        let candidates = vec![
            location("a", "d1", "A", (0.5, 0.5)),
            location("b", "d1", "B", (10.5, 0.5)),
            location("c", "d1", "C", (5.0, 0.5)),
        ];
        assert_eq!(
            ids(&match_locations(&hazard, &candidates)),
            BTreeSet::from(["a".into(), "b".into()])
        );
    }

    #[test]
    fn code_hazard_matches_zone_or_county_regardless_of_coordinates() {
        let mut by_county = location("county", "d1", "Ranch", (-108.5, 45.8));
        by_county.county_code = "MTC083".to_string();
        let mut by_zone = location("zone", "d2", "Shop", (10.0, 10.0));
        by_zone.zone_code = "MTZ028".to_string();
        let mut unrelated = location("other", "d3", "Lake", (-108.5, 45.8));
        unrelated.zone_code = "WYZ001".to_string();

        let hazard = county_warning(&["MTC083", "MTZ028"]);
        let matches = match_locations(&hazard, &[by_county, by_zone, unrelated]);
        assert_eq!(ids(&matches), BTreeSet::from(["county".into(), "zone".into()]));
        assert!(matches.iter().all(|m| m.matched_by == MatchedBy::Code));
    }

    #[test]
    fn same_codes_match_too() {
        let mut subscriber = location("same", "d1", "Home", (0.0, 0.0));
        subscriber.county_code = "030111".to_string();
        let mut hazard = county_warning(&[]);
        hazard.codes.as_mut().unwrap().same.insert("030111".to_string());
        assert_eq!(match_locations(&hazard, &[subscriber]).len(), 1);
    }

    #[test]
    fn geometry_takes_precedence_over_codes() {
        let mut outside_but_coded = location("coded", "d1", "Home", (40.0, 40.0));
        outside_but_coded.zone_code = "MTC083".to_string();
        let inside = location("inside", "d2", "Work", (3.0, 3.0));
        let hazard = polygon_warning().with_codes(ugc(&["MTC083"]));

        let matches = match_locations(&hazard, &[outside_but_coded.clone(), inside.clone()]);
        assert_eq!(ids(&matches), BTreeSet::from(["inside".into()]));
        assert_eq!(matches[0].matched_by, MatchedBy::Geometry);

        let union = match_locations_with(&hazard, &[outside_but_coded, inside], MatchMode::Union);
        assert_eq!(union.len(), 2);
        let coded = union.iter().find(|m| m.location.id.as_str() == "coded").unwrap();
        assert_eq!(coded.matched_by, MatchedBy::Code);
    }

    #[test]
    fn unsubscribed_locations_are_filtered_after_matching() {
        let mut other_options = location("inside", "d1", "Home", (2.5, 2.5));
        other_options.option_set = BTreeSet::from([
            HazardCategory::Alert(AlertType::FloodWarning),
            HazardCategory::ConvectiveOutlook(ConvectiveOutlookType::Day1Categorical),
        ]);
        assert!(match_locations(&polygon_warning(), &[other_options]).is_empty());
    }

    #[test]
    fn absent_geometry_and_codes_is_unmatchable() {
        let hazard = Hazard::new("empty", TORNADO).with_geometry(Geometry::None);
        let mut coded = location("x", "d1", "Home", (0.0, 0.0));
        coded.zone_code = "MTC083".to_string();
        assert!(match_locations(&hazard, &[coded.clone()]).is_empty());
        assert!(match_locations(&Hazard::new("bare", TORNADO), &[coded]).is_empty());
    }

    #[test]
    fn empty_location_codes_never_match() {
        let hazard = county_warning(&["MTC083"]);
        let blank = location("blank", "d1", "Home", (0.0, 0.0));
        assert!(match_locations(&hazard, &[blank]).is_empty());
    }

    #[test]
    fn point_geometry_hazard_matches_nothing() {
        let hazard =
            Hazard::new("point", TORNADO).with_geometry(Geometry::Point(Point::new(1.0, 1.0)));
        assert!(match_locations(&hazard, &[location("x", "d1", "Home", (1.0, 1.0))]).is_empty());
    }

    #[test]
    fn matching_is_idempotent() {
        let candidates: Vec<_> = (0..50)
            .map(|n| {
                let x = (n % 10) as f64 * 0.5;
                let y = (n / 10) as f64;
                location(&format!("loc-{n}"), &format!("d{}", n % 7), "Home", (x, y))
            })
            .collect();
        let hazard = polygon_warning();
        let first = ids(&match_locations(&hazard, &candidates));
        let second = ids(&match_locations(&hazard, &candidates));
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn parallel_pass_is_set_equal_to_sequential() {
        let candidates: Vec<_> = (0..2000)
            .map(|n| {
                let x = (n % 50) as f64 * 0.1;
                let y = (n / 50) as f64 * 0.125;
                location(&format!("loc-{n}"), "d1", "Home", (x, y))
            })
            .collect();
        let hazard = polygon_warning();
        let options = MatchOptions {
            min_parallel_candidates: 16,
            ..MatchOptions::default()
        };
        assert_eq!(
            ids(&match_locations_parallel(&hazard, &candidates, &options)),
            ids(&match_locations(&hazard, &candidates))
        );
    }

    #[test]
    fn expired_deadline_evaluates_nothing() {
        let candidates = vec![location("inside", "d1", "Home", (2.5, 2.5))];
        let pass = match_locations_until(
            &polygon_warning(),
            &candidates,
            MatchMode::Exclusive,
            Instant::now(),
        );
        assert!(pass.truncated);
        assert_eq!(pass.evaluated, 0);
        assert!(pass.matches.is_empty());
    }

    #[test]
    fn generous_deadline_evaluates_everything() {
        let candidates = vec![
            location("inside", "d1", "Home", (2.5, 2.5)),
            location("far", "d1", "Work", (40.0, 40.0)),
        ];
        let pass = match_locations_until(
            &polygon_warning(),
            &candidates,
            MatchMode::Exclusive,
            Instant::now() + Duration::from_secs(60),
        );
        assert!(!pass.truncated);
        assert_eq!(pass.evaluated, 2);
        assert_eq!(pass.matches.len(), 1);
    }
}
