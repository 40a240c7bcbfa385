//! Staff repository.
//!
//! Staff are referenced by reports with `ON DELETE RESTRICT`, so a staff
//! member who authored a report cannot be deleted; mark them `Inactive`
//! with [`StaffRepository::set_status`] instead.

use sqlx::PgPool;
use tracing::{debug, instrument};

use bsf_core::{ActivityStatus, StaffId};

use super::RepositoryError;
use crate::models::staff::{CreateStaffInput, Staff, UpdateStaffInput};

const STAFF_COLUMNS: &str = "id, name, role, contact, hire_date, status, created_at";

/// Repository for staff database operations.
pub struct StaffRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StaffRepository<'a> {
    /// Create a new staff repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a staff member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, input), fields(name = %input.name, role = %input.role))]
    pub async fn create(&self, input: &CreateStaffInput) -> Result<Staff, RepositoryError> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            r"
            INSERT INTO staff (name, role, contact, hire_date)
            VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE))
            RETURNING {STAFF_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(&input.role)
        .bind(&input.contact)
        .bind(input.hire_date)
        .fetch_one(self.pool)
        .await?;

        debug!(id = %staff.id, "Created staff member");
        Ok(staff)
    }

    /// Get a staff member by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StaffId) -> Result<Option<Staff>, RepositoryError> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(staff)
    }

    /// List staff, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, status: Option<ActivityStatus>) -> Result<Vec<Staff>, RepositoryError> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            r"
            SELECT {STAFF_COLUMNS}
            FROM staff
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY name, id
            "
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(staff)
    }

    /// Update a staff member's details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the staff member doesn't exist.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: StaffId,
        input: &UpdateStaffInput,
    ) -> Result<Staff, RepositoryError> {
        sqlx::query_as::<_, Staff>(&format!(
            r"
            UPDATE staff
            SET
                name = COALESCE($2, name),
                role = COALESCE($3, role),
                contact = COALESCE($4, contact)
            WHERE id = $1
            RETURNING {STAFF_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.role)
        .bind(&input.contact)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Move a staff member between `Active` and `Inactive`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the staff member doesn't exist.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: StaffId,
        status: ActivityStatus,
    ) -> Result<Staff, RepositoryError> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            r"
            UPDATE staff
            SET status = $2
            WHERE id = $1
            RETURNING {STAFF_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        debug!(status = %staff.status, "Updated staff status");
        Ok(staff)
    }

    /// Delete a staff member.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the staff member authored a
    /// report.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: StaffId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM staff WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
