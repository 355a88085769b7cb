use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("unsupported geometry type: {0}")]
    UnsupportedType(String),
    #[error("invalid number of coordinates for {kind}: expected {expected}, found {found}")]
    InvalidArity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{0} has no rings or points")]
    EmptyRing(&'static str),
    #[error("ring has {found} points, at least 3 are required")]
    DegenerateRing { found: usize },
    #[error("malformed coordinate: {0}")]
    MalformedCoordinate(String),
    #[error("malformed geometry: {0}")]
    Malformed(String),
}
