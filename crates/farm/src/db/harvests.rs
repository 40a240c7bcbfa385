//! Harvest log repository.

use sqlx::PgPool;
use tracing::{debug, instrument};

use bsf_core::{BatchId, HarvestId};

use super::RepositoryError;
use crate::models::batch_log::{Harvest, HarvestTotals, RecordHarvestInput};

const HARVEST_COLUMNS: &str =
    "id, batch_id, harvest_date, larvae_weight_kg, frass_weight_kg, created_at";

/// Repository for harvest database operations.
pub struct HarvestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HarvestRepository<'a> {
    /// Create a new harvest repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Log a harvest against a batch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the batch doesn't exist or a
    /// weight is negative.
    #[instrument(skip(self, input), fields(batch_id = %input.batch_id))]
    pub async fn record(&self, input: &RecordHarvestInput) -> Result<Harvest, RepositoryError> {
        let harvest = sqlx::query_as::<_, Harvest>(&format!(
            r"
            INSERT INTO harvests (batch_id, harvest_date, larvae_weight_kg, frass_weight_kg)
            VALUES ($1, $2, $3, $4)
            RETURNING {HARVEST_COLUMNS}
            "
        ))
        .bind(input.batch_id)
        .bind(input.harvest_date)
        .bind(input.larvae_weight_kg)
        .bind(input.frass_weight_kg)
        .fetch_one(self.pool)
        .await?;

        debug!(
            id = %harvest.id,
            larvae_kg = %harvest.larvae_weight_kg,
            frass_kg = %harvest.frass_weight_kg,
            "Recorded harvest"
        );
        Ok(harvest)
    }

    /// Get a harvest by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: HarvestId) -> Result<Option<Harvest>, RepositoryError> {
        let harvest = sqlx::query_as::<_, Harvest>(&format!(
            "SELECT {HARVEST_COLUMNS} FROM harvests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(harvest)
    }

    /// List a batch's harvests in date order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_batch(&self, batch_id: BatchId) -> Result<Vec<Harvest>, RepositoryError> {
        let harvests = sqlx::query_as::<_, Harvest>(&format!(
            r"
            SELECT {HARVEST_COLUMNS}
            FROM harvests
            WHERE batch_id = $1
            ORDER BY harvest_date, id
            "
        ))
        .bind(batch_id)
        .fetch_all(self.pool)
        .await?;

        Ok(harvests)
    }

    /// Sum a batch's harvests. A batch with no harvests yields zeros.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn totals_for_batch(&self, batch_id: BatchId) -> Result<HarvestTotals, RepositoryError> {
        let totals = sqlx::query_as::<_, HarvestTotals>(
            r"
            SELECT
                COUNT(*) AS harvest_count,
                COALESCE(SUM(larvae_weight_kg), 0) AS larvae_weight_kg,
                COALESCE(SUM(frass_weight_kg), 0) AS frass_weight_kg
            FROM harvests
            WHERE batch_id = $1
            ",
        )
        .bind(batch_id)
        .fetch_one(self.pool)
        .await?;

        Ok(totals)
    }

    /// Delete a harvest. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: HarvestId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM harvests WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
