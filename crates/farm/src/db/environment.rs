//! Environment reading repository.

use sqlx::PgPool;
use tracing::{debug, instrument};

use bsf_core::EnvironmentLogId;

use super::RepositoryError;
use crate::models::environment::{EnvironmentFilter, EnvironmentLog, RecordEnvironmentInput};

const ENVIRONMENT_COLUMNS: &str =
    "id, log_time, temperature_c, humidity_percent, location, created_at";

const DEFAULT_LIMIT: i64 = 500;

/// Repository for environment reading database operations.
pub struct EnvironmentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EnvironmentRepository<'a> {
    /// Create a new environment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a reading. `log_time` defaults to now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, input), fields(location = ?input.location))]
    pub async fn record(
        &self,
        input: &RecordEnvironmentInput,
    ) -> Result<EnvironmentLog, RepositoryError> {
        let log = sqlx::query_as::<_, EnvironmentLog>(&format!(
            r"
            INSERT INTO environment (log_time, temperature_c, humidity_percent, location)
            VALUES (COALESCE($1, now()), $2, $3, $4)
            RETURNING {ENVIRONMENT_COLUMNS}
            "
        ))
        .bind(input.log_time)
        .bind(input.temperature_c)
        .bind(input.humidity_percent)
        .bind(&input.location)
        .fetch_one(self.pool)
        .await?;

        debug!(
            id = %log.id,
            temperature_c = %log.temperature_c,
            humidity = %log.humidity_percent,
            "Recorded environment reading"
        );
        Ok(log)
    }

    /// Get a reading by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: EnvironmentLogId) -> Result<Option<EnvironmentLog>, RepositoryError> {
        let log = sqlx::query_as::<_, EnvironmentLog>(&format!(
            "SELECT {ENVIRONMENT_COLUMNS} FROM environment WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(log)
    }

    /// List readings matching `filter`, newest first. `since` is inclusive
    /// and `until` exclusive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &EnvironmentFilter,
    ) -> Result<Vec<EnvironmentLog>, RepositoryError> {
        let logs = sqlx::query_as::<_, EnvironmentLog>(&format!(
            r"
            SELECT {ENVIRONMENT_COLUMNS}
            FROM environment
            WHERE ($1::text IS NULL OR location = $1)
              AND ($2::timestamptz IS NULL OR log_time >= $2)
              AND ($3::timestamptz IS NULL OR log_time < $3)
            ORDER BY log_time DESC, id DESC
            LIMIT $4
            "
        ))
        .bind(&filter.location)
        .bind(filter.since)
        .bind(filter.until)
        .bind(filter.limit.unwrap_or(DEFAULT_LIMIT))
        .fetch_all(self.pool)
        .await?;

        Ok(logs)
    }

    /// The most recent reading, optionally for one location.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest(
        &self,
        location: Option<&str>,
    ) -> Result<Option<EnvironmentLog>, RepositoryError> {
        let log = sqlx::query_as::<_, EnvironmentLog>(&format!(
            r"
            SELECT {ENVIRONMENT_COLUMNS}
            FROM environment
            WHERE ($1::text IS NULL OR location = $1)
            ORDER BY log_time DESC, id DESC
            LIMIT 1
            "
        ))
        .bind(location)
        .fetch_optional(self.pool)
        .await?;

        Ok(log)
    }

    /// Delete a reading. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: EnvironmentLogId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM environment WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
