//! Mortality observation repository.
//!
//! An observation can optionally be copied into `batches.current_mortality`.
//! Both writes then share one database transaction.

use sqlx::PgPool;
use tracing::{debug, instrument};

use bsf_core::{BatchId, MortalityId};

use super::RepositoryError;
use crate::models::batch_log::{MortalityRecord, RecordMortalityInput};

const MORTALITY_COLUMNS: &str = "id, batch_id, mortality_date, mortality_rate, created_at";

/// Repository for mortality database operations.
pub struct MortalityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MortalityRepository<'a> {
    /// Create a new mortality repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Log a mortality observation.
    ///
    /// When `input.update_batch` is set the batch's `current_mortality` is
    /// set to the observed rate in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the batch doesn't exist.
    /// Nothing is written in that case.
    #[instrument(skip(self, input), fields(batch_id = %input.batch_id, rate = %input.mortality_rate))]
    pub async fn record(
        &self,
        input: &RecordMortalityInput,
    ) -> Result<MortalityRecord, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, MortalityRecord>(&format!(
            r"
            INSERT INTO mortality (batch_id, mortality_date, mortality_rate)
            VALUES ($1, $2, $3)
            RETURNING {MORTALITY_COLUMNS}
            "
        ))
        .bind(input.batch_id)
        .bind(input.mortality_date)
        .bind(input.mortality_rate)
        .fetch_one(&mut *tx)
        .await?;

        if input.update_batch {
            sqlx::query("UPDATE batches SET current_mortality = $2 WHERE id = $1")
                .bind(input.batch_id)
                .bind(input.mortality_rate)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        debug!(id = %record.id, updated_batch = input.update_batch, "Recorded mortality");
        Ok(record)
    }

    /// Get an observation by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: MortalityId) -> Result<Option<MortalityRecord>, RepositoryError> {
        let record = sqlx::query_as::<_, MortalityRecord>(&format!(
            "SELECT {MORTALITY_COLUMNS} FROM mortality WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// List a batch's observations in date order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_batch(
        &self,
        batch_id: BatchId,
    ) -> Result<Vec<MortalityRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, MortalityRecord>(&format!(
            r"
            SELECT {MORTALITY_COLUMNS}
            FROM mortality
            WHERE batch_id = $1
            ORDER BY mortality_date, id
            "
        ))
        .bind(batch_id)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    /// Delete an observation. The batch's `current_mortality` is left as is.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: MortalityId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM mortality WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
