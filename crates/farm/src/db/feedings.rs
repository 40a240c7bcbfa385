//! Feeding log repository.

use sqlx::PgPool;
use tracing::{debug, instrument};

use bsf_core::{BatchId, FeedingId};

use super::RepositoryError;
use crate::models::batch_log::{Feeding, RecordFeedingInput};

const FEEDING_COLUMNS: &str = "id, batch_id, feed_date, feed_type, feed_quantity_kg, created_at";

/// Repository for feeding database operations.
pub struct FeedingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FeedingRepository<'a> {
    /// Create a new feeding repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Log a feeding against a batch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the batch doesn't exist or
    /// the quantity is not positive.
    #[instrument(skip(self, input), fields(batch_id = %input.batch_id))]
    pub async fn record(&self, input: &RecordFeedingInput) -> Result<Feeding, RepositoryError> {
        let feeding = sqlx::query_as::<_, Feeding>(&format!(
            r"
            INSERT INTO feedings (batch_id, feed_date, feed_type, feed_quantity_kg)
            VALUES ($1, $2, $3, $4)
            RETURNING {FEEDING_COLUMNS}
            "
        ))
        .bind(input.batch_id)
        .bind(input.feed_date)
        .bind(&input.feed_type)
        .bind(input.feed_quantity_kg)
        .fetch_one(self.pool)
        .await?;

        debug!(id = %feeding.id, kg = %feeding.feed_quantity_kg, "Recorded feeding");
        Ok(feeding)
    }

    /// Get a feeding by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: FeedingId) -> Result<Option<Feeding>, RepositoryError> {
        let feeding = sqlx::query_as::<_, Feeding>(&format!(
            "SELECT {FEEDING_COLUMNS} FROM feedings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(feeding)
    }

    /// List a batch's feedings in date order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_batch(&self, batch_id: BatchId) -> Result<Vec<Feeding>, RepositoryError> {
        let feedings = sqlx::query_as::<_, Feeding>(&format!(
            r"
            SELECT {FEEDING_COLUMNS}
            FROM feedings
            WHERE batch_id = $1
            ORDER BY feed_date, id
            "
        ))
        .bind(batch_id)
        .fetch_all(self.pool)
        .await?;

        Ok(feedings)
    }

    /// Delete a feeding. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: FeedingId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM feedings WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
