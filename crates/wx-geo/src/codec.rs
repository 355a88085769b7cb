//! GeoJSON geometry codec.
//!
//! `null`, `{}` and `GeometryCollection` decode to [`Geometry::None`].

use crate::contains::MIN_RING_POINTS;
use crate::error::GeometryError;
use crate::geometry::{Geometry, MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

pub fn decode_value(raw: &Value) -> Result<Geometry, GeometryError> {
    let object = match raw {
        Value::Null => return Ok(Geometry::None),
        Value::Object(object) if object.is_empty() => return Ok(Geometry::None),
        Value::Object(object) => object,
        other => {
            return Err(GeometryError::Malformed(format!(
                "expected an object, got {}",
                value_kind(other)
            )));
        }
    };

    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeometryError::Malformed("missing geometry type".to_string()))?;

    if kind == "GeometryCollection" {
        return Ok(Geometry::None);
    }

    match kind {
        "Point" => decode_point(coordinates(object, kind)?).map(Geometry::Point),
        "MultiPoint" => {
            let points = decode_points(coordinates(object, kind)?)?;
            if points.is_empty() {
                return Err(GeometryError::EmptyRing("MultiPoint"));
            }
            Ok(Geometry::MultiPoint(points))
        }
        "Polygon" => decode_polygon(coordinates(object, kind)?).map(Geometry::Polygon),
        "MultiPolygon" => {
            decode_multi_polygon(coordinates(object, kind)?).map(Geometry::MultiPolygon)
        }
        other => Err(GeometryError::UnsupportedType(other.to_string())),
    }
}

pub fn decode_str(raw: &str) -> Result<Geometry, GeometryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Geometry::None);
    }
    let value: Value = serde_json::from_str(trimmed)
        .map_err(|err| GeometryError::Malformed(err.to_string()))?;
    decode_value(&value)
}

pub fn encode_value(geometry: &Geometry) -> Value {
    let coordinates = match geometry {
        Geometry::Point(point) => encode_point(point),
        Geometry::MultiPoint(points) => encode_points(points),
        Geometry::Polygon(polygon) => encode_polygon(polygon),
        Geometry::MultiPolygon(multi) => {
            Value::Array(multi.polygons.iter().map(encode_polygon).collect())
        }
        Geometry::None => return Value::Null,
    };
    json!({
        "type": geometry.kind(),
        "coordinates": coordinates,
    })
}

pub fn encode_string(geometry: &Geometry) -> String {
    encode_value(geometry).to_string()
}

fn coordinates<'a>(
    object: &'a Map<String, Value>,
    kind: &str,
) -> Result<&'a Value, GeometryError> {
    object
        .get("coordinates")
        .ok_or_else(|| GeometryError::Malformed(format!("missing coordinates for {kind}")))
}

fn decode_point(raw: &Value) -> Result<Point, GeometryError> {
    let pair = as_array(raw, "position")?;
    if pair.len() != 2 {
        return Err(GeometryError::InvalidArity {
            kind: "Point",
            expected: 2,
            found: pair.len(),
        });
    }
    let longitude = decode_ordinate(&pair[0])?;
    let latitude = decode_ordinate(&pair[1])?;
    Ok(Point::new(longitude, latitude))
}

fn decode_ordinate(raw: &Value) -> Result<f64, GeometryError> {
    let value = raw
        .as_f64()
        .ok_or_else(|| GeometryError::MalformedCoordinate(raw.to_string()))?;
    if !value.is_finite() {
        return Err(GeometryError::MalformedCoordinate(value.to_string()));
    }
    Ok(value)
}

fn decode_points(raw: &Value) -> Result<MultiPoint, GeometryError> {
    as_array(raw, "point list")?
        .iter()
        .map(decode_point)
        .collect::<Result<Vec<_>, _>>()
        .map(MultiPoint::new)
}

fn decode_ring(raw: &Value) -> Result<MultiPoint, GeometryError> {
    let ring = decode_points(raw)?;
    if ring.len() < MIN_RING_POINTS {
        return Err(GeometryError::DegenerateRing { found: ring.len() });
    }
    Ok(ring)
}

fn decode_polygon(raw: &Value) -> Result<Polygon, GeometryError> {
    let mut rings = as_array(raw, "ring list")?
        .iter()
        .map(decode_ring)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let outer = rings.next().ok_or(GeometryError::EmptyRing("Polygon"))?;
    Ok(Polygon::new(outer, rings.collect()))
}

fn decode_multi_polygon(raw: &Value) -> Result<MultiPolygon, GeometryError> {
    let polygons = as_array(raw, "polygon list")?
        .iter()
        .map(decode_polygon)
        .collect::<Result<Vec<_>, _>>()?;
    if polygons.is_empty() {
        return Err(GeometryError::EmptyRing("MultiPolygon"));
    }
    Ok(MultiPolygon::new(polygons))
}

fn as_array<'a>(raw: &'a Value, what: &str) -> Result<&'a Vec<Value>, GeometryError> {
    raw.as_array().ok_or_else(|| {
        GeometryError::MalformedCoordinate(format!("expected {what}, got {}", value_kind(raw)))
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn encode_point(point: &Point) -> Value {
    json!([point.longitude, point.latitude])
}

fn encode_points(points: &MultiPoint) -> Value {
    Value::Array(points.points.iter().map(encode_point).collect())
}

fn encode_polygon(polygon: &Polygon) -> Value {
    Value::Array(
        std::iter::once(&polygon.outer)
            .chain(polygon.holes.iter())
            .map(encode_points)
            .collect(),
    )
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_value(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        decode_value(&raw).map_err(serde::de::Error::custom)
    }
}
