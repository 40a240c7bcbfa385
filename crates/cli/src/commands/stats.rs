//! Row counts for every farm table.

use sqlx::PgPool;

use super::{CommandError, connect};

const TABLES: &[&str] = &[
    "customers",
    "staff",
    "products",
    "batches",
    "feedings",
    "harvests",
    "mortality",
    "sales",
    "transactions",
    "inventory",
    "environment",
    "reports",
];

async fn count_rows(pool: &PgPool, table: &str) -> Result<i64, sqlx::Error> {
    // Table names come from the fixed list above, never from input.
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
}

/// Log the number of rows in each table.
///
/// # Errors
///
/// Returns `CommandError::Database` if a count fails, e.g. before
/// `bsf-cli migrate` has been run.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let mut total = 0_i64;
    for table in TABLES {
        let rows = count_rows(&pool, table).await?;
        total += rows;
        tracing::info!(table, rows, "Row count");
    }

    tracing::info!(tables = TABLES.len(), rows = total, "Totals");
    Ok(())
}
