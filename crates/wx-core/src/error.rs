use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    InvalidGeometry,
    NotFound,
    Unavailable,
    Upstream,
    Internal,
}

/// Coarse error carried across service boundaries.
#[derive(Debug, Clone)]
pub struct WxError {
    pub code: ErrorCode,
    pub message: String,
}

impl WxError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }
}

impl fmt::Display for WxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for WxError {}

pub type WxResult<T> = Result<T, WxError>;

impl From<wx_geo::GeometryError> for WxError {
    fn from(value: wx_geo::GeometryError) -> Self {
        Self::new(ErrorCode::InvalidGeometry, value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wx_geo::GeometryError;

    #[test]
    fn geometry_errors_map_to_invalid_geometry() {
        let err: WxError = GeometryError::DegenerateRing { found: 2 }.into();
        assert_eq!(err.code, ErrorCode::InvalidGeometry);
        assert_eq!(
            err.to_string(),
            "InvalidGeometry: ring has 2 points, at least 3 are required"
        );
    }

    #[test]
    fn not_found_code() {
        assert_eq!(WxError::not_found("hazard x").code, ErrorCode::NotFound);
    }
}
