//! Sale and payment transaction models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bsf_core::{CustomerId, PaymentMethod, PaymentStatus, ProductId, SaleId, TransactionId};

/// A sale line.
///
/// `total_amount` is generated by the database from
/// `quantity_kg * price_per_kg`; it is read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Sale {
    /// Unique sale ID.
    pub id: SaleId,
    /// Date of the sale.
    pub sale_date: NaiveDate,
    /// Product sold.
    pub product_id: ProductId,
    /// Kilograms sold.
    pub quantity_kg: Decimal,
    /// Agreed price per kilogram.
    pub price_per_kg: Decimal,
    /// Generated line total.
    pub total_amount: Decimal,
    /// Buyer.
    pub customer_id: CustomerId,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Whether the stored total agrees with its factors.
    #[must_use]
    pub fn total_is_consistent(&self) -> bool {
        bsf_core::sale_total(self.quantity_kg, self.price_per_kg) == Some(self.total_amount)
    }
}

/// Input for recording a sale. There is deliberately no total field.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleInput {
    /// Date of the sale (defaults to today in the database).
    pub sale_date: Option<NaiveDate>,
    /// Product sold.
    pub product_id: ProductId,
    /// Buyer.
    pub customer_id: CustomerId,
    /// Kilograms sold; must be positive.
    pub quantity_kg: Decimal,
    /// Agreed price per kilogram.
    pub price_per_kg: Decimal,
}

/// Input for correcting a sale. Changing either factor regenerates the total.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSaleInput {
    /// New sale date.
    pub sale_date: Option<NaiveDate>,
    /// New quantity.
    pub quantity_kg: Option<Decimal>,
    /// New price per kilogram.
    pub price_per_kg: Option<Decimal>,
}

/// Filter criteria for listing sales.
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    /// Only sales to this customer.
    pub customer_id: Option<CustomerId>,
    /// Only sales of this product.
    pub product_id: Option<ProductId>,
    /// Sales on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Sales on or before this date.
    pub end_date: Option<NaiveDate>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

/// A payment attempt for a sale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Transaction {
    /// Unique transaction ID.
    pub id: TransactionId,
    /// Sale being paid.
    pub sale_id: SaleId,
    /// When the payment was attempted.
    pub transaction_date: DateTime<Utc>,
    /// How it was paid.
    pub payment_method: PaymentMethod,
    /// Outcome.
    pub payment_status: PaymentStatus,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for recording a payment attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionInput {
    /// Sale being paid.
    pub sale_id: SaleId,
    /// How it was paid.
    pub payment_method: PaymentMethod,
    /// Outcome, `Pending` unless known.
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Attempt time (defaults to now in the database).
    pub transaction_date: Option<DateTime<Utc>>,
}

impl CreateTransactionInput {
    /// A pending payment by `method` for `sale_id`.
    #[must_use]
    pub fn pending(sale_id: SaleId, payment_method: PaymentMethod) -> Self {
        Self {
            sale_id,
            payment_method,
            payment_status: PaymentStatus::Pending,
            transaction_date: None,
        }
    }
}

/// A sale written together with its first payment attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaleWithPayment {
    /// The sale.
    pub sale: Sale,
    /// Its payment record.
    pub transaction: Transaction,
}
