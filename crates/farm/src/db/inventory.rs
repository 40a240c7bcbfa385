//! Inventory repository.
//!
//! Quantities change through [`InventoryRepository::adjust_quantity`] so a
//! stock movement is a single relative update; the `CHECK` constraint
//! rejects any movement that would leave the quantity negative.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use bsf_core::{InventoryItemId, InventoryStatus};

use super::RepositoryError;
use crate::models::inventory::{
    CreateInventoryItemInput, InventoryItem, UpdateInventoryItemInput,
};

const INVENTORY_COLUMNS: &str =
    "id, item_name, quantity_available, unit_price, restock_date, status, created_at";

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add an inventory item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the quantity or unit price is
    /// negative.
    #[instrument(skip(self, input), fields(item = %input.item_name))]
    pub async fn create(
        &self,
        input: &CreateInventoryItemInput,
    ) -> Result<InventoryItem, RepositoryError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r"
            INSERT INTO inventory (item_name, quantity_available, unit_price, restock_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INVENTORY_COLUMNS}
            "
        ))
        .bind(&input.item_name)
        .bind(input.quantity_available)
        .bind(input.unit_price)
        .bind(input.restock_date)
        .bind(input.status)
        .fetch_one(self.pool)
        .await?;

        debug!(id = %item.id, "Created inventory item");
        Ok(item)
    }

    /// Get an inventory item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// List inventory items by name, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<InventoryStatus>,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r"
            SELECT {INVENTORY_COLUMNS}
            FROM inventory
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY item_name, id
            "
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Update an item's descriptive fields. `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Constraint` if the unit price is negative.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: InventoryItemId,
        input: &UpdateInventoryItemInput,
    ) -> Result<InventoryItem, RepositoryError> {
        sqlx::query_as::<_, InventoryItem>(&format!(
            r"
            UPDATE inventory
            SET
                item_name = COALESCE($2, item_name),
                unit_price = COALESCE($3, unit_price),
                restock_date = COALESCE($4, restock_date),
                status = COALESCE($5, status)
            WHERE id = $1
            RETURNING {INVENTORY_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.item_name)
        .bind(input.unit_price)
        .bind(input.restock_date)
        .bind(input.status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Add `delta` (negative to withdraw) to an item's quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Constraint` on
    /// `inventory.quantity_available` if the result would be negative; the
    /// stored quantity is unchanged.
    #[instrument(skip(self))]
    pub async fn adjust_quantity(
        &self,
        id: InventoryItemId,
        delta: Decimal,
    ) -> Result<InventoryItem, RepositoryError> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r"
            UPDATE inventory
            SET quantity_available = quantity_available + $2
            WHERE id = $1
            RETURNING {INVENTORY_COLUMNS}
            "
        ))
        .bind(id)
        .bind(delta)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        debug!(quantity = %item.quantity_available, "Adjusted inventory quantity");
        Ok(item)
    }

    /// Delete an inventory item. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: InventoryItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
