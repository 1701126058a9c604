use async_trait::async_trait;

use super::hospitals_model::HospitalsResponse;
use crate::errors::Result;

/// Trait for hospital lookup operations
#[async_trait]
pub trait HospitalServiceTrait: Send + Sync {
    /// Hospitals inside the bounding box of `wilaya`, at most `limit` of them.
    ///
    /// `wilaya` is validated before any network activity; `limit` is clamped
    /// to `1..=MAX_LIMIT`.
    async fn get_hospitals(&self, wilaya: &str, limit: u32) -> Result<HospitalsResponse>;

    /// Drop expired cache entries. Returns how many were removed.
    fn purge_expired_cache(&self) -> usize;
}
