//! Sale repository.
//!
//! `total_amount` is a generated column. It is never bound in an insert or
//! update; every write returns the row so the caller sees the recomputed
//! total.

use sqlx::{PgExecutor, PgPool};
use tracing::{debug, instrument};

use bsf_core::{PaymentMethod, PaymentStatus, SaleId};

use super::RepositoryError;
use super::transactions::insert_transaction;
use crate::models::sale::{
    CreateSaleInput, CreateTransactionInput, Sale, SaleFilter, SaleWithPayment, UpdateSaleInput,
};

const SALE_COLUMNS: &str = "id, sale_date, product_id, quantity_kg, price_per_kg, total_amount, \
                            customer_id, created_at";

const DEFAULT_LIMIT: i64 = 100;

/// Insert a sale using any executor, so it can join a caller's transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Constraint` if the product or customer doesn't
/// exist, or a factor is out of range.
pub async fn insert_sale<'e, E>(executor: E, input: &CreateSaleInput) -> Result<Sale, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let sale = sqlx::query_as::<_, Sale>(&format!(
        r"
        INSERT INTO sales (sale_date, product_id, quantity_kg, price_per_kg, customer_id)
        VALUES (COALESCE($1, CURRENT_DATE), $2, $3, $4, $5)
        RETURNING {SALE_COLUMNS}
        "
    ))
    .bind(input.sale_date)
    .bind(input.product_id)
    .bind(input.quantity_kg)
    .bind(input.price_per_kg)
    .bind(input.customer_id)
    .fetch_one(executor)
    .await?;

    Ok(sale)
}

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the product or customer
    /// doesn't exist, the quantity is not positive, or the price is negative.
    #[instrument(
        skip(self, input),
        fields(product_id = %input.product_id, customer_id = %input.customer_id)
    )]
    pub async fn create(&self, input: &CreateSaleInput) -> Result<Sale, RepositoryError> {
        let sale = insert_sale(self.pool, input).await?;

        debug!(id = %sale.id, total = %sale.total_amount, "Created sale");
        Ok(sale)
    }

    /// Record a sale and its first payment transaction together.
    ///
    /// If either insert fails neither row is kept.
    ///
    /// # Errors
    ///
    /// Same as [`SaleRepository::create`].
    #[instrument(
        skip(self, input),
        fields(product_id = %input.product_id, customer_id = %input.customer_id)
    )]
    pub async fn create_with_payment(
        &self,
        input: &CreateSaleInput,
        payment_method: PaymentMethod,
        payment_status: PaymentStatus,
    ) -> Result<SaleWithPayment, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sale = insert_sale(&mut *tx, input).await?;
        let transaction = insert_transaction(
            &mut *tx,
            &CreateTransactionInput {
                sale_id: sale.id,
                payment_method,
                payment_status,
                transaction_date: None,
            },
        )
        .await?;

        tx.commit().await?;

        debug!(
            sale_id = %sale.id,
            transaction_id = %transaction.id,
            total = %sale.total_amount,
            "Created sale with payment"
        );
        Ok(SaleWithPayment { sale, transaction })
    }

    /// Get a sale by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SaleId) -> Result<Option<Sale>, RepositoryError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(sale)
    }

    /// List sales matching `filter`, newest first. Date bounds are inclusive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &SaleFilter) -> Result<Vec<Sale>, RepositoryError> {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            r"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE ($1::int4 IS NULL OR customer_id = $1)
              AND ($2::int4 IS NULL OR product_id = $2)
              AND ($3::date IS NULL OR sale_date >= $3)
              AND ($4::date IS NULL OR sale_date <= $4)
            ORDER BY sale_date DESC, id DESC
            LIMIT $5 OFFSET $6
            "
        ))
        .bind(filter.customer_id)
        .bind(filter.product_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.limit.unwrap_or(DEFAULT_LIMIT))
        .bind(filter.offset.unwrap_or(0))
        .fetch_all(self.pool)
        .await?;

        Ok(sales)
    }

    /// Correct a sale's date, quantity or price. The total follows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the sale doesn't exist.
    /// Returns `RepositoryError::Constraint` if a new value is out of range.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: SaleId, input: &UpdateSaleInput) -> Result<Sale, RepositoryError> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r"
            UPDATE sales
            SET
                sale_date = COALESCE($2, sale_date),
                quantity_kg = COALESCE($3, quantity_kg),
                price_per_kg = COALESCE($4, price_per_kg)
            WHERE id = $1
            RETURNING {SALE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.sale_date)
        .bind(input.quantity_kg)
        .bind(input.price_per_kg)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        debug!(total = %sale.total_amount, "Updated sale");
        Ok(sale)
    }

    /// Delete a sale and, by cascade, its transactions.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: SaleId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(deleted, "Deleted sale");
        Ok(deleted)
    }
}
