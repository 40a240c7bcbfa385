//! Inventory (feed and supplies) models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bsf_core::{InventoryItemId, InventoryStatus};

/// A stock item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct InventoryItem {
    /// Unique item ID.
    pub id: InventoryItemId,
    /// Item name.
    pub item_name: String,
    /// Quantity on hand.
    pub quantity_available: Decimal,
    /// Cost per unit.
    pub unit_price: Decimal,
    /// Next or last restock date.
    pub restock_date: Option<NaiveDate>,
    /// Stock status. Set by callers; not derived from the quantity.
    pub status: InventoryStatus,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for adding a stock item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInventoryItemInput {
    /// Item name.
    pub item_name: String,
    /// Quantity on hand.
    #[serde(default)]
    pub quantity_available: Decimal,
    /// Cost per unit.
    pub unit_price: Decimal,
    /// Restock date.
    pub restock_date: Option<NaiveDate>,
    /// Stock status.
    #[serde(default)]
    pub status: InventoryStatus,
}

/// Input for editing a stock item. `None` leaves a field unchanged.
/// Quantity changes go through `InventoryRepository::adjust_quantity`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInventoryItemInput {
    /// Item name.
    pub item_name: Option<String>,
    /// Cost per unit.
    pub unit_price: Option<Decimal>,
    /// Restock date.
    pub restock_date: Option<NaiveDate>,
    /// Stock status.
    pub status: Option<InventoryStatus>,
}
