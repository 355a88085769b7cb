use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use wx_core::{EpochMillis, Hazard, HazardId, Location, LocationId, WxError, WxResult};
use wx_geo::{BoundingBox, Point};

mod memory;
pub use memory::MemoryStore;

#[derive(Debug, Clone)]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for wx_core::WxError {
    fn from(value: StorageError) -> Self {
        Self::new(wx_core::ErrorCode::Unavailable, value.message)
    }
}

/// Source of candidate locations. Lookups may over-approximate; the matching
/// engine re-evaluates every candidate in full.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Locations whose zone or county code is in `codes`.
    async fn find_locations_by_codes(
        &self,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<Location>, StorageError>;

    /// Locations that may lie inside an area containing `point`.
    async fn find_locations_by_point(&self, point: Point) -> Result<Vec<Location>, StorageError>;

    /// Locations whose coordinates fall inside `bbox`.
    async fn find_locations_in_box(&self, bbox: BoundingBox)
    -> Result<Vec<Location>, StorageError>;

    async fn upsert_location(&self, location: Location) -> Result<(), StorageError>;

    async fn delete_location(&self, id: &LocationId) -> Result<(), StorageError>;

    /// Candidate snapshot for one hazard, deduplicated by location id.
    async fn find_candidates(&self, hazard: &Hazard) -> Result<Vec<Location>, StorageError> {
        let mut candidates = Vec::new();
        if let Some(bbox) = hazard.geometry().and_then(|geometry| geometry.bounding_box()) {
            candidates.extend(self.find_locations_in_box(bbox).await?);
        }
        if hazard.has_codes() {
            let codes = hazard
                .affected_codes()
                .into_iter()
                .map(str::to_string)
                .collect();
            candidates.extend(self.find_locations_by_codes(&codes).await?);
        }

        let mut seen = BTreeSet::new();
        candidates.retain(|location| seen.insert(location.id.clone()));
        Ok(candidates)
    }
}

#[async_trait]
pub trait HazardRepository: Send + Sync {
    async fn find_hazard(&self, id: &HazardId) -> Result<Option<Hazard>, StorageError>;

    /// Like `find_hazard`, with a missing hazard reported as `NotFound`.
    async fn require_hazard(&self, id: &HazardId) -> WxResult<Hazard> {
        self.find_hazard(id)
            .await?
            .ok_or_else(|| WxError::not_found(format!("hazard {id} not found")))
    }

    /// Hazards whose effective window covers `at_ms`.
    async fn list_active(&self, at_ms: EpochMillis) -> Result<Vec<Hazard>, StorageError>;

    async fn upsert_hazard(&self, hazard: Hazard) -> Result<(), StorageError>;
}
