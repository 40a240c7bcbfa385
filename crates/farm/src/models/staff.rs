//! Staff models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bsf_core::{ActivityStatus, StaffId};

/// A farm employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Staff {
    /// Unique staff ID.
    pub id: StaffId,
    /// Full name.
    pub name: String,
    /// Job role (free text, e.g. "Technician").
    pub role: String,
    /// Phone or email.
    pub contact: Option<String>,
    /// Date of hire.
    pub hire_date: NaiveDate,
    /// Employment status.
    pub status: ActivityStatus,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for adding a staff member. New staff start `Active`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaffInput {
    /// Full name.
    pub name: String,
    /// Job role.
    pub role: String,
    /// Phone or email.
    pub contact: Option<String>,
    /// Date of hire (defaults to today in the database).
    pub hire_date: Option<NaiveDate>,
}

/// Input for editing a staff member. Status changes go through
/// `StaffRepository::set_status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStaffInput {
    /// Full name.
    pub name: Option<String>,
    /// Job role.
    pub role: Option<String>,
    /// Phone or email.
    pub contact: Option<String>,
}
