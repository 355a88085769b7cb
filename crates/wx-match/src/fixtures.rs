use std::collections::BTreeSet;
use wx_core::{AlertType, Hazard, HazardCategory, HazardCodes, Location, OwnerKind};
use wx_geo::{Geometry, MultiPoint, Polygon};

pub const TORNADO: HazardCategory = HazardCategory::Alert(AlertType::TornadoWarning);

pub fn location(id: &str, owner: &str, name: &str, at: (f64, f64)) -> Location {
    Location {
        id: id.into(),
        owner_kind: OwnerKind::Device,
        owner_ref: owner.into(),
        zone_code: String::new(),
        county_code: String::new(),
        longitude: at.0,
        latitude: at.1,
        name: name.to_string(),
        option_set: BTreeSet::from([TORNADO]),
    }
}

pub fn square_with_hole() -> Geometry {
    Geometry::Polygon(Polygon::new(
        MultiPoint::from_pairs(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
        vec![MultiPoint::from_pairs(&[
            (1.0, 1.0),
            (2.0, 1.0),
            (2.0, 2.0),
            (1.0, 2.0),
        ])],
    ))
}

pub fn ugc(codes: &[&str]) -> HazardCodes {
    HazardCodes {
        same: BTreeSet::new(),
        ugc: codes.iter().map(|code| code.to_string()).collect(),
    }
}

pub fn polygon_warning() -> Hazard {
    Hazard::new("warning-1", TORNADO).with_geometry(square_with_hole())
}

pub fn county_warning(codes: &[&str]) -> Hazard {
    Hazard::new("warning-2", TORNADO).with_codes(ugc(codes))
}
