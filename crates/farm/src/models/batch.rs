//! Batch models.
//!
//! A batch is one cohort of larvae raised together. Its stage, weight and
//! mortality are updated over its life; feedings, harvests and mortality
//! observations are logged against it (see [`super::batch_log`]).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bsf_core::{ActivityStatus, BatchId, BatchStage, Percent};

/// An insect cohort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Batch {
    /// Unique batch ID.
    pub id: BatchId,
    /// Date the batch was started.
    pub start_date: NaiveDate,
    /// Current life stage.
    pub stage: BatchStage,
    /// Latest measured live weight.
    pub current_weight_kg: Decimal,
    /// Latest mortality percentage.
    pub current_mortality: Percent,
    /// `Inactive` once the batch has ended.
    pub status: ActivityStatus,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for starting a batch. New batches are `Active` with zero mortality.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBatchInput {
    /// Date the batch was started.
    pub start_date: NaiveDate,
    /// Initial stage, usually `Egg`.
    #[serde(default)]
    pub stage: BatchStage,
    /// Initial weight.
    #[serde(default)]
    pub current_weight_kg: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a batch. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBatchInput {
    /// New life stage.
    pub stage: Option<BatchStage>,
    /// New weight.
    pub current_weight_kg: Option<Decimal>,
    /// New mortality percentage.
    pub current_mortality: Option<Percent>,
    /// New status.
    pub status: Option<ActivityStatus>,
    /// Replacement notes.
    pub notes: Option<String>,
}

/// Filter criteria for listing batches.
#[derive(Debug, Clone, Default)]
pub struct BatchFilter {
    /// Only batches at this stage.
    pub stage: Option<BatchStage>,
    /// Only batches with this status.
    pub status: Option<ActivityStatus>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

/// A batch with aggregates over its logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchSummary {
    /// The batch itself.
    pub batch: Batch,
    /// Number of feeding events.
    pub feeding_count: i64,
    /// Total feed given.
    pub total_feed_kg: Decimal,
    /// Number of harvests.
    pub harvest_count: i64,
    /// Total larvae harvested.
    pub total_larvae_kg: Decimal,
    /// Total frass harvested.
    pub total_frass_kg: Decimal,
    /// Number of mortality observations.
    pub mortality_observations: i64,
    /// Rate from the most recent observation.
    pub latest_mortality_rate: Option<Percent>,
}

impl BatchSummary {
    /// Larvae harvested per kilogram of feed, if any feed was given.
    #[must_use]
    pub fn feed_conversion(&self) -> Option<Decimal> {
        if self.total_feed_kg.is_zero() {
            return None;
        }
        self.total_larvae_kg.checked_div(self.total_feed_kg)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn summary(total_feed_kg: Decimal, total_larvae_kg: Decimal) -> BatchSummary {
        BatchSummary {
            batch: Batch {
                id: BatchId::new(1),
                start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                stage: BatchStage::Larvae,
                current_weight_kg: Decimal::new(12, 0),
                current_mortality: Percent::ZERO,
                status: ActivityStatus::Active,
                notes: None,
                created_at: DateTime::<Utc>::default(),
            },
            feeding_count: 2,
            total_feed_kg,
            harvest_count: 1,
            total_larvae_kg,
            total_frass_kg: Decimal::ZERO,
            mortality_observations: 0,
            latest_mortality_rate: None,
        }
    }

    #[test]
    fn test_feed_conversion() {
        let s = summary(Decimal::new(40, 0), Decimal::new(10, 0));
        assert_eq!(s.feed_conversion(), Some(Decimal::new(25, 2)));
    }

    #[test]
    fn test_feed_conversion_without_feed() {
        let s = summary(Decimal::ZERO, Decimal::new(10, 0));
        assert_eq!(s.feed_conversion(), None);
    }

    #[test]
    fn test_create_input_defaults_from_json() {
        let input: CreateBatchInput =
            serde_json::from_str(r#"{"start_date":"2026-03-01","notes":null}"#).unwrap();
        assert_eq!(input.stage, BatchStage::Egg);
        assert_eq!(input.current_weight_kg, Decimal::ZERO);
    }
}
