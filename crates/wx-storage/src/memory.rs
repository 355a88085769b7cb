use crate::{HazardRepository, LocationRepository, StorageError};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;
use tracing::debug;
use wx_core::{EpochMillis, Hazard, HazardId, Location, LocationId};
use wx_geo::{BoundingBox, Point};

/// In-process store used by the worker's fixture mode and by tests.
///
/// It has no spatial index, so `find_locations_by_point` returns every
/// location and leaves containment to the matching engine.
#[derive(Debug, Default)]
pub struct MemoryStore {
    locations: RwLock<BTreeMap<LocationId, Location>>,
    hazards: RwLock<BTreeMap<HazardId, Hazard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(
        hazards: impl IntoIterator<Item = Hazard>,
        locations: impl IntoIterator<Item = Location>,
    ) -> Self {
        Self {
            locations: RwLock::new(
                locations
                    .into_iter()
                    .map(|location| (location.id.clone(), location))
                    .collect(),
            ),
            hazards: RwLock::new(
                hazards
                    .into_iter()
                    .map(|hazard| (hazard.id.clone(), hazard))
                    .collect(),
            ),
        }
    }

    pub async fn location_count(&self) -> usize {
        self.locations.read().await.len()
    }
}

#[async_trait]
impl LocationRepository for MemoryStore {
    async fn find_locations_by_codes(
        &self,
        codes: &BTreeSet<String>,
    ) -> Result<Vec<Location>, StorageError> {
        let locations = self.locations.read().await;
        Ok(locations
            .values()
            .filter(|location| {
                codes.contains(&location.zone_code) || codes.contains(&location.county_code)
            })
            .cloned()
            .collect())
    }

    async fn find_locations_by_point(&self, point: Point) -> Result<Vec<Location>, StorageError> {
        let locations = self.locations.read().await;
        debug!(
            longitude = point.longitude,
            latitude = point.latitude,
            candidates = locations.len(),
            "Returning unfiltered location snapshot"
        );
        Ok(locations.values().cloned().collect())
    }

    async fn find_locations_in_box(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<Location>, StorageError> {
        let locations = self.locations.read().await;
        Ok(locations
            .values()
            .filter(|location| bbox.contains(&location.point()))
            .cloned()
            .collect())
    }

    async fn upsert_location(&self, location: Location) -> Result<(), StorageError> {
        self.locations
            .write()
            .await
            .insert(location.id.clone(), location);
        Ok(())
    }

    async fn delete_location(&self, id: &LocationId) -> Result<(), StorageError> {
        self.locations
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::new(format!("location {id} not found")))
    }
}

#[async_trait]
impl HazardRepository for MemoryStore {
    async fn find_hazard(&self, id: &HazardId) -> Result<Option<Hazard>, StorageError> {
        Ok(self.hazards.read().await.get(id).cloned())
    }

    async fn list_active(&self, at_ms: EpochMillis) -> Result<Vec<Hazard>, StorageError> {
        let hazards = self.hazards.read().await;
        Ok(hazards
            .values()
            .filter(|hazard| hazard.is_active(at_ms))
            .cloned()
            .collect())
    }

    async fn upsert_hazard(&self, hazard: Hazard) -> Result<(), StorageError> {
        self.hazards.write().await.insert(hazard.id.clone(), hazard);
        Ok(())
    }
}
