//! Point-in-polygon tests.
//!
//! Rings are evaluated with the winding-number rule. A point on a ring edge or
//! vertex counts as inside that ring, so points on an outer boundary are part
//! of the polygon and points on a hole boundary are not.

use crate::geometry::{MultiPolygon, Point, Polygon};

/// Smallest ring that encloses any area.
pub const MIN_RING_POINTS: usize = 3;

pub fn contains(polygon: &Polygon, point: &Point) -> bool {
    if polygon.outer.len() < MIN_RING_POINTS || !point.is_finite() {
        return false;
    }
    match polygon.outer.bounding_box() {
        Some(bbox) if bbox.contains(point) => {}
        _ => return false,
    }
    ring_contains(&polygon.outer.points, point)
        && !polygon
            .holes
            .iter()
            .any(|hole| ring_contains(&hole.points, point))
}

pub fn contains_multi(multi: &MultiPolygon, point: &Point) -> bool {
    multi
        .polygons
        .iter()
        .any(|polygon| contains(polygon, point))
}

/// Winding-number test with boundary inclusion. The ring is implicitly closed;
/// a repeated closing vertex adds a zero-length edge and changes nothing.
pub fn ring_contains(ring: &[Point], point: &Point) -> bool {
    if ring.len() < MIN_RING_POINTS {
        return false;
    }

    let mut winding: i64 = 0;
    for (index, start) in ring.iter().enumerate() {
        let end = &ring[(index + 1) % ring.len()];

        if on_segment(start, end, point) {
            return true;
        }

        if start.latitude <= point.latitude {
            if end.latitude > point.latitude && side(start, end, point) > 0.0 {
                winding += 1;
            }
        } else if end.latitude <= point.latitude && side(start, end, point) < 0.0 {
            winding -= 1;
        }
    }

    winding != 0
}

/// Positive when `point` is left of the directed edge `start -> end`.
fn side(start: &Point, end: &Point, point: &Point) -> f64 {
    (end.longitude - start.longitude) * (point.latitude - start.latitude)
        - (point.longitude - start.longitude) * (end.latitude - start.latitude)
}

fn on_segment(start: &Point, end: &Point, point: &Point) -> bool {
    if side(start, end, point) != 0.0 {
        return false;
    }
    point.longitude >= start.longitude.min(end.longitude)
        && point.longitude <= start.longitude.max(end.longitude)
        && point.latitude >= start.latitude.min(end.latitude)
        && point.latitude <= start.latitude.max(end.latitude)
}
