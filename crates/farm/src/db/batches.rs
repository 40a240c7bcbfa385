//! Batch repository.
//!
//! Deleting a batch cascades to its feedings, harvests and mortality
//! observations.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use bsf_core::{ActivityStatus, BatchId, BatchStage, Percent};

use super::RepositoryError;
use crate::models::batch::{Batch, BatchFilter, BatchSummary, CreateBatchInput, UpdateBatchInput};

const BATCH_COLUMNS: &str =
    "id, start_date, stage, current_weight_kg, current_mortality, status, notes, created_at";

const DEFAULT_LIMIT: i64 = 100;

/// Internal row type for the log aggregates of one batch.
#[derive(Debug, sqlx::FromRow)]
struct BatchAggregateRow {
    feeding_count: i64,
    total_feed_kg: Decimal,
    harvest_count: i64,
    total_larvae_kg: Decimal,
    total_frass_kg: Decimal,
    mortality_observations: i64,
    latest_mortality_rate: Option<Percent>,
}

/// Repository for batch database operations.
pub struct BatchRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BatchRepository<'a> {
    /// Create a new batch repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Start a batch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the weight is negative.
    #[instrument(skip(self, input), fields(stage = %input.stage))]
    pub async fn create(&self, input: &CreateBatchInput) -> Result<Batch, RepositoryError> {
        let batch = sqlx::query_as::<_, Batch>(&format!(
            r"
            INSERT INTO batches (start_date, stage, current_weight_kg, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING {BATCH_COLUMNS}
            "
        ))
        .bind(input.start_date)
        .bind(input.stage)
        .bind(input.current_weight_kg)
        .bind(&input.notes)
        .fetch_one(self.pool)
        .await?;

        debug!(id = %batch.id, "Created batch");
        Ok(batch)
    }

    /// Get a batch by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BatchId) -> Result<Option<Batch>, RepositoryError> {
        let batch = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(batch)
    }

    /// List batches, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &BatchFilter) -> Result<Vec<Batch>, RepositoryError> {
        let batches = sqlx::query_as::<_, Batch>(&format!(
            r"
            SELECT {BATCH_COLUMNS}
            FROM batches
            WHERE ($1::text IS NULL OR stage = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY start_date DESC, id DESC
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(filter.stage)
        .bind(filter.status)
        .bind(filter.limit.unwrap_or(DEFAULT_LIMIT))
        .bind(filter.offset.unwrap_or(0))
        .fetch_all(self.pool)
        .await?;

        Ok(batches)
    }

    /// Update a batch. `None` fields are left unchanged.
    ///
    /// A new stage may skip ahead but never go back to an earlier one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the batch doesn't exist.
    /// Returns `RepositoryError::InvalidTransition` if the new stage is
    /// earlier than the current one.
    /// Returns `RepositoryError::Constraint` if the weight is negative.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: BatchId,
        input: &UpdateBatchInput,
    ) -> Result<Batch, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: BatchStage =
            sqlx::query_scalar("SELECT stage FROM batches WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        if let Some(stage) = input.stage.filter(|s| !current.can_move_to(*s)) {
            return Err(RepositoryError::InvalidTransition(format!(
                "batch {id} is at {current} and cannot go back to {stage}"
            )));
        }

        let batch = sqlx::query_as::<_, Batch>(&format!(
            r"
            UPDATE batches
            SET
                stage = COALESCE($2, stage),
                current_weight_kg = COALESCE($3, current_weight_kg),
                current_mortality = COALESCE($4, current_mortality),
                status = COALESCE($5, status),
                notes = COALESCE($6, notes)
            WHERE id = $1
            RETURNING {BATCH_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.stage)
        .bind(input.current_weight_kg)
        .bind(input.current_mortality)
        .bind(input.status)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(stage = %batch.stage, "Updated batch");
        Ok(batch)
    }

    /// Move a batch to the next life stage.
    ///
    /// The row is locked while the next stage is computed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the batch doesn't exist.
    /// Returns `RepositoryError::InvalidTransition` if the batch is already
    /// at `Adult`.
    #[instrument(skip(self))]
    pub async fn advance_stage(&self, id: BatchId) -> Result<Batch, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let next = current.stage.next().ok_or_else(|| {
            RepositoryError::InvalidTransition(format!(
                "batch {id} is at {} and cannot advance",
                current.stage
            ))
        })?;

        let batch = sqlx::query_as::<_, Batch>(&format!(
            "UPDATE batches SET stage = $2 WHERE id = $1 RETURNING {BATCH_COLUMNS}"
        ))
        .bind(id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(from = %current.stage, to = %batch.stage, "Advanced batch stage");
        Ok(batch)
    }

    /// Mark a batch as ended. Its logs are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the batch doesn't exist.
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: BatchId) -> Result<Batch, RepositoryError> {
        sqlx::query_as::<_, Batch>(&format!(
            "UPDATE batches SET status = $2 WHERE id = $1 RETURNING {BATCH_COLUMNS}"
        ))
        .bind(id)
        .bind(ActivityStatus::Inactive)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a batch together with all of its logs.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: BatchId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM batches WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(deleted, "Deleted batch");
        Ok(deleted)
    }

    /// Get a batch together with aggregates over its feedings, harvests and
    /// mortality observations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn summary(&self, id: BatchId) -> Result<Option<BatchSummary>, RepositoryError> {
        let Some(batch) = self.get(id).await? else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, BatchAggregateRow>(
            r"
            SELECT
                (SELECT COUNT(*) FROM feedings WHERE batch_id = $1) AS feeding_count,
                (SELECT COALESCE(SUM(feed_quantity_kg), 0)
                   FROM feedings WHERE batch_id = $1) AS total_feed_kg,
                (SELECT COUNT(*) FROM harvests WHERE batch_id = $1) AS harvest_count,
                (SELECT COALESCE(SUM(larvae_weight_kg), 0)
                   FROM harvests WHERE batch_id = $1) AS total_larvae_kg,
                (SELECT COALESCE(SUM(frass_weight_kg), 0)
                   FROM harvests WHERE batch_id = $1) AS total_frass_kg,
                (SELECT COUNT(*) FROM mortality WHERE batch_id = $1) AS mortality_observations,
                (SELECT mortality_rate FROM mortality WHERE batch_id = $1
                   ORDER BY mortality_date DESC, id DESC LIMIT 1) AS latest_mortality_rate
            ",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(Some(BatchSummary {
            batch,
            feeding_count: row.feeding_count,
            total_feed_kg: row.total_feed_kg,
            harvest_count: row.harvest_count,
            total_larvae_kg: row.total_larvae_kg,
            total_frass_kg: row.total_frass_kg,
            mortality_observations: row.mortality_observations,
            latest_mortality_rate: row.latest_mortality_rate,
        }))
    }
}
