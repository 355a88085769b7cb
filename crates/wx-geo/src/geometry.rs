use crate::contains::{contains, contains_multi};

/// A single position. Wire order is `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

/// An ordered run of points. As a polygon ring it is implicitly closed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPoint {
    pub points: Vec<Point>,
}

impl MultiPoint {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().copied().map(Point::from).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub outer: MultiPoint,
    pub holes: Vec<MultiPoint>,
}

impl Polygon {
    pub fn new(outer: MultiPoint, holes: Vec<MultiPoint>) -> Self {
        Self { outer, holes }
    }

    pub fn contains(&self, point: &Point) -> bool {
        contains(self, point)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn contains(&self, point: &Point) -> bool {
        contains_multi(self, point)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.polygons
            .iter()
            .filter_map(|polygon| polygon.outer.bounding_box())
            .reduce(|acc, next| acc.union(&next))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Geometry {
    Point(Point),
    MultiPoint(MultiPoint),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    #[default]
    None,
}

impl Geometry {
    /// GeoJSON `type` name, or `None` for an absent geometry.
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Self::Point(_) => Some("Point"),
            Self::MultiPoint(_) => Some("MultiPoint"),
            Self::Polygon(_) => Some("Polygon"),
            Self::MultiPolygon(_) => Some("MultiPolygon"),
            Self::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Only areal variants can contain anything.
    pub fn contains_point(&self, point: &Point) -> bool {
        match self {
            Self::Polygon(polygon) => contains(polygon, point),
            Self::MultiPolygon(multi) => contains_multi(multi, point),
            Self::Point(_) | Self::MultiPoint(_) | Self::None => false,
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Self::Point(point) => BoundingBox::from_points(std::slice::from_ref(point)),
            Self::MultiPoint(points) => points.bounding_box(),
            Self::Polygon(polygon) => polygon.outer.bounding_box(),
            Self::MultiPolygon(multi) => multi.bounding_box(),
            Self::None => None,
        }
    }
}

impl From<Polygon> for Geometry {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(value: MultiPolygon) -> Self {
        Self::MultiPolygon(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let seed = Self {
            north: first.latitude,
            south: first.latitude,
            east: first.longitude,
            west: first.longitude,
        };
        Some(rest.iter().fold(seed, |bbox, point| Self {
            north: bbox.north.max(point.latitude),
            south: bbox.south.min(point.latitude),
            east: bbox.east.max(point.longitude),
            west: bbox.west.min(point.longitude),
        }))
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: &Point) -> bool {
        point.latitude <= self.north
            && point.latitude >= self.south
            && point.longitude <= self.east
            && point.longitude >= self.west
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }
}
