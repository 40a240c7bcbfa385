//! Report models.
//!
//! `report_data` is stored as `JSONB` and has no fixed shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bsf_core::{ReportId, ReportType, StaffId};

/// A write-once analytics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Report {
    /// Unique report ID.
    pub id: ReportId,
    /// Date the report covers.
    pub report_date: NaiveDate,
    /// Kind of report.
    pub report_type: ReportType,
    /// Payload.
    pub report_data: serde_json::Value,
    /// Author.
    pub generated_by: Option<StaffId>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for storing a report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReportInput {
    /// Date the report covers (defaults to today in the database).
    pub report_date: Option<NaiveDate>,
    /// Kind of report.
    pub report_type: ReportType,
    /// Payload.
    pub report_data: serde_json::Value,
    /// Author.
    pub generated_by: Option<StaffId>,
}

/// Filter criteria for listing reports.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Only reports of this kind.
    pub report_type: Option<ReportType>,
    /// Only reports by this author.
    pub generated_by: Option<StaffId>,
    /// Maximum number of results.
    pub limit: Option<i64>,
}
