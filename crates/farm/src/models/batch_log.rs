//! Append-only logs recorded against a batch.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bsf_core::{BatchId, FeedingId, HarvestId, MortalityId, Percent};

/// One feeding event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Feeding {
    /// Unique feeding ID.
    pub id: FeedingId,
    /// Batch that was fed.
    pub batch_id: BatchId,
    /// Date of the feeding.
    pub feed_date: NaiveDate,
    /// Feed substrate (e.g. "Brewery grain").
    pub feed_type: String,
    /// Amount of feed given.
    pub feed_quantity_kg: Decimal,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for logging a feeding.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordFeedingInput {
    /// Batch that was fed.
    pub batch_id: BatchId,
    /// Date of the feeding.
    pub feed_date: NaiveDate,
    /// Feed substrate.
    pub feed_type: String,
    /// Amount of feed given; must be positive.
    pub feed_quantity_kg: Decimal,
}

/// One harvest event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Harvest {
    /// Unique harvest ID.
    pub id: HarvestId,
    /// Batch harvested from.
    pub batch_id: BatchId,
    /// Date of the harvest.
    pub harvest_date: NaiveDate,
    /// Larvae removed.
    pub larvae_weight_kg: Decimal,
    /// Frass removed.
    pub frass_weight_kg: Decimal,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for logging a harvest.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordHarvestInput {
    /// Batch harvested from.
    pub batch_id: BatchId,
    /// Date of the harvest.
    pub harvest_date: NaiveDate,
    /// Larvae removed.
    #[serde(default)]
    pub larvae_weight_kg: Decimal,
    /// Frass removed.
    #[serde(default)]
    pub frass_weight_kg: Decimal,
}

/// Harvest aggregates for one batch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct HarvestTotals {
    /// Number of harvests.
    pub harvest_count: i64,
    /// Sum of larvae weights.
    pub larvae_weight_kg: Decimal,
    /// Sum of frass weights.
    pub frass_weight_kg: Decimal,
}

/// A dated mortality observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct MortalityRecord {
    /// Unique observation ID.
    pub id: MortalityId,
    /// Batch observed.
    pub batch_id: BatchId,
    /// Date of the observation.
    pub mortality_date: NaiveDate,
    /// Observed mortality.
    pub mortality_rate: Percent,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for logging a mortality observation.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordMortalityInput {
    /// Batch observed.
    pub batch_id: BatchId,
    /// Date of the observation.
    pub mortality_date: NaiveDate,
    /// Observed mortality.
    pub mortality_rate: Percent,
    /// Also copy the rate into `batches.current_mortality`, in the same
    /// database transaction.
    #[serde(default)]
    pub update_batch: bool,
}
