//! Payment transaction repository.
//!
//! A sale may have several transactions (a failed card payment followed by a
//! cash one, say). Transactions are removed with their sale.

use sqlx::{PgExecutor, PgPool};
use tracing::{debug, instrument};

use bsf_core::{PaymentStatus, SaleId, TransactionId};

use super::RepositoryError;
use crate::models::sale::{CreateTransactionInput, Transaction};

const TRANSACTION_COLUMNS: &str =
    "id, sale_id, transaction_date, payment_method, payment_status, created_at";

/// Insert a transaction using any executor, so a caller that already holds a
/// database transaction can include it.
///
/// # Errors
///
/// Returns `RepositoryError::Constraint` if the sale doesn't exist.
pub async fn insert_transaction<'e, E>(
    executor: E,
    input: &CreateTransactionInput,
) -> Result<Transaction, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let transaction = sqlx::query_as::<_, Transaction>(&format!(
        r"
        INSERT INTO transactions (sale_id, transaction_date, payment_method, payment_status)
        VALUES ($1, COALESCE($2, now()), $3, $4)
        RETURNING {TRANSACTION_COLUMNS}
        "
    ))
    .bind(input.sale_id)
    .bind(input.transaction_date)
    .bind(input.payment_method)
    .bind(input.payment_status)
    .fetch_one(executor)
    .await?;

    Ok(transaction)
}

/// Repository for payment transaction database operations.
pub struct TransactionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TransactionRepository<'a> {
    /// Create a new transaction repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a payment attempt for a sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Constraint` if the sale doesn't exist.
    #[instrument(skip(self, input), fields(sale_id = %input.sale_id, method = %input.payment_method))]
    pub async fn create(
        &self,
        input: &CreateTransactionInput,
    ) -> Result<Transaction, RepositoryError> {
        let transaction = insert_transaction(self.pool, input).await?;

        debug!(id = %transaction.id, status = %transaction.payment_status, "Created transaction");
        Ok(transaction)
    }

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, RepositoryError> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(transaction)
    }

    /// List a sale's transactions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_sale(&self, sale_id: SaleId) -> Result<Vec<Transaction>, RepositoryError> {
        let transactions = sqlx::query_as::<_, Transaction>(&format!(
            r"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE sale_id = $1
            ORDER BY transaction_date, id
            "
        ))
        .bind(sale_id)
        .fetch_all(self.pool)
        .await?;

        Ok(transactions)
    }

    /// Set a transaction's payment status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the transaction doesn't exist.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: TransactionId,
        status: PaymentStatus,
    ) -> Result<Transaction, RepositoryError> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r"
            UPDATE transactions
            SET payment_status = $2
            WHERE id = $1
            RETURNING {TRANSACTION_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        debug!(status = %transaction.payment_status, "Updated payment status");
        Ok(transaction)
    }

    /// Delete a transaction. Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: TransactionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
