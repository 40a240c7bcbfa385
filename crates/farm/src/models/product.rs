//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bsf_core::{ProductCategory, ProductId};

/// A sellable catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Longer description.
    pub description: Option<String>,
    /// List price per kilogram.
    pub price: Decimal,
    /// Catalog category.
    pub category: ProductCategory,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for adding a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Product name.
    pub name: String,
    /// Longer description.
    pub description: Option<String>,
    /// List price per kilogram.
    pub price: Decimal,
    /// Catalog category.
    pub category: ProductCategory,
}
