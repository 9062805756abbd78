//! Request-scoped batch loaders over the reference repositories.
//!
//! One [`RequestLoaders`] set is constructed per inbound request, so the
//! loader caches never outlive the request or cross user boundaries.
//! Rendering a timeline page resolves every event's tag and schedule
//! references through these; loads issued while the page renders
//! concurrently coalesce into one query per repository.

use std::collections::HashMap;

use async_trait::async_trait;
use nestling_core::error::CoreError;
use nestling_core::loader::{BatchFetch, Loader};
use nestling_core::types::DbId;
use nestling_db::models::child_medication::ChildMedication;
use nestling_db::models::medication::Medication;
use nestling_db::models::tag::Tag;
use nestling_db::repositories::{ChildMedicationRepo, MedicationRepo, TagRepo};
use nestling_db::DbPool;

fn internal(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("batch fetch failed: {err}"))
}

/// Batched tag lookup by id. No enablement filter: stored references
/// render as written.
pub struct TagFetcher {
    pool: DbPool,
}

#[async_trait]
impl BatchFetch for TagFetcher {
    type Key = DbId;
    type Value = Tag;

    async fn fetch(&self, keys: &[DbId]) -> Result<HashMap<DbId, Tag>, CoreError> {
        let tags = TagRepo::find_by_ids(&self.pool, keys).await.map_err(internal)?;
        Ok(tags.into_iter().map(|t| (t.id, t)).collect())
    }
}

/// Batched medication schedule lookup by id.
pub struct ChildMedicationFetcher {
    pool: DbPool,
}

#[async_trait]
impl BatchFetch for ChildMedicationFetcher {
    type Key = DbId;
    type Value = ChildMedication;

    async fn fetch(&self, keys: &[DbId]) -> Result<HashMap<DbId, ChildMedication>, CoreError> {
        let rows = ChildMedicationRepo::find_by_ids(&self.pool, keys)
            .await
            .map_err(internal)?;
        Ok(rows.into_iter().map(|r| (r.id, r)).collect())
    }
}

/// Batched medication catalog lookup by id.
pub struct MedicationFetcher {
    pool: DbPool,
}

#[async_trait]
impl BatchFetch for MedicationFetcher {
    type Key = DbId;
    type Value = Medication;

    async fn fetch(&self, keys: &[DbId]) -> Result<HashMap<DbId, Medication>, CoreError> {
        let rows = MedicationRepo::find_by_ids(&self.pool, keys).await.map_err(internal)?;
        Ok(rows.into_iter().map(|r| (r.id, r)).collect())
    }
}

/// The loader set for one request.
#[derive(Clone)]
pub struct RequestLoaders {
    pub tags: Loader<TagFetcher>,
    pub schedules: Loader<ChildMedicationFetcher>,
    pub medications: Loader<MedicationFetcher>,
}

impl RequestLoaders {
    pub fn new(pool: &DbPool) -> Self {
        Self {
            tags: Loader::new(TagFetcher { pool: pool.clone() }),
            schedules: Loader::new(ChildMedicationFetcher { pool: pool.clone() }),
            medications: Loader::new(MedicationFetcher { pool: pool.clone() }),
        }
    }
}
