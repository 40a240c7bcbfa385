//! Environmental reading models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bsf_core::{EnvironmentLogId, Percent};

/// A temperature/humidity reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct EnvironmentLog {
    /// Unique reading ID.
    pub id: EnvironmentLogId,
    /// When the reading was taken.
    pub log_time: DateTime<Utc>,
    /// Temperature in degrees Celsius.
    pub temperature_c: Decimal,
    /// Relative humidity.
    pub humidity_percent: Percent,
    /// Where it was taken (room, rack, ...).
    pub location: Option<String>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for logging a reading.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordEnvironmentInput {
    /// When the reading was taken (defaults to now in the database).
    pub log_time: Option<DateTime<Utc>>,
    /// Temperature in degrees Celsius.
    pub temperature_c: Decimal,
    /// Relative humidity.
    pub humidity_percent: Percent,
    /// Where it was taken.
    pub location: Option<String>,
}

/// Filter criteria for listing readings.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentFilter {
    /// Only readings from this location.
    pub location: Option<String>,
    /// Readings at or after this time.
    pub since: Option<DateTime<Utc>>,
    /// Readings before this time.
    pub until: Option<DateTime<Utc>>,
    /// Maximum number of results.
    pub limit: Option<i64>,
}
