pub mod codec;
pub mod contains;
pub mod error;
pub mod geometry;

pub use codec::{decode_str, decode_value, encode_string, encode_value};
pub use contains::{contains, contains_multi, ring_contains};
pub use error::GeometryError;
pub use geometry::{BoundingBox, Geometry, MultiPoint, MultiPolygon, Point, Polygon};
