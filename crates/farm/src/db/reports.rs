//! Report repository.
//!
//! Reports are write-once snapshots: there is no update. `report_data` is
//! stored as `JSONB`.

use sqlx::PgPool;
use tracing::{debug, instrument};

use bsf_core::ReportId;

use super::RepositoryError;
use crate::models::report::{CreateReportInput, Report, ReportFilter};

const REPORT_COLUMNS: &str = "id, report_date, report_type, report_data, generated_by, created_at";

const DEFAULT_LIMIT: i64 = 100;

/// Repository for report database operations.
pub struct ReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a report.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if `generated_by` names a staff
    /// member that doesn't exist.
    #[instrument(skip(self, input), fields(report_type = %input.report_type))]
    pub async fn create(&self, input: &CreateReportInput) -> Result<Report, RepositoryError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            r"
            INSERT INTO reports (report_date, report_type, report_data, generated_by)
            VALUES (COALESCE($1, CURRENT_DATE), $2, $3, $4)
            RETURNING {REPORT_COLUMNS}
            "
        ))
        .bind(input.report_date)
        .bind(input.report_type)
        .bind(&input.report_data)
        .bind(input.generated_by)
        .fetch_one(self.pool)
        .await?;

        debug!(id = %report.id, "Created report");
        Ok(report)
    }

    /// Get a report by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ReportId) -> Result<Option<Report>, RepositoryError> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(report)
    }

    /// List reports matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ReportFilter) -> Result<Vec<Report>, RepositoryError> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            r"
            SELECT {REPORT_COLUMNS}
            FROM reports
            WHERE ($1::text IS NULL OR report_type = $1)
              AND ($2::int4 IS NULL OR generated_by = $2)
            ORDER BY report_date DESC, id DESC
            LIMIT $3
            "
        ))
        .bind(filter.report_type)
        .bind(filter.generated_by)
        .bind(filter.limit.unwrap_or(DEFAULT_LIMIT))
        .fetch_all(self.pool)
        .await?;

        Ok(reports)
    }

    /// Delete a report. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ReportId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
