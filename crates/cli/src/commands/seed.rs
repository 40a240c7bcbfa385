//! Seed the database with a small demo data set.
//!
//! Inserts a product, a customer, a sale paid in cash, one batch with a
//! feeding, a harvest and a mortality observation, plus an environment
//! reading and a batch report. Everything is written in one transaction, so
//! a failed run leaves nothing behind. Running it again is a no-op once the
//! demo customer exists.

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use bsf_core::{
    BatchId, BatchStage, CustomerId, Email, PaymentMethod, PaymentStatus, Percent, ProductCategory,
    ProductId, ReportType,
};
use bsf_farm::db::sales::insert_sale;
use bsf_farm::db::transactions::insert_transaction;
use bsf_farm::models::{CreateSaleInput, CreateTransactionInput};

use super::{CommandError, connect};

const DEMO_CUSTOMER_EMAIL: &str = "a@acme.test";

/// Insert the demo data set.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a write is
/// rejected.
pub async fn demo() -> Result<(), CommandError> {
    let pool = connect().await?;
    seed_demo(&pool).await?;
    Ok(())
}

/// Write the demo rows. Returns `false` if they were already present.
///
/// # Errors
///
/// Returns `CommandError` if any write is rejected; nothing is committed in
/// that case.
pub async fn seed_demo(pool: &PgPool) -> Result<bool, CommandError> {
    let email = Email::parse(DEMO_CUSTOMER_EMAIL)
        .map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    let mortality_rate = Percent::new(Decimal::new(35, 1))
        .map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    let humidity = Percent::new(Decimal::new(65, 0))
        .map_err(|e| CommandError::InvalidInput(e.to_string()))?;

    let mut tx = pool.begin().await?;

    let existing: Option<CustomerId> =
        sqlx::query_scalar("SELECT id FROM customers WHERE email = $1")
            .bind(&email)
            .fetch_optional(&mut *tx)
            .await?;
    if let Some(customer_id) = existing {
        info!(%customer_id, "Demo data already present, nothing to do");
        return Ok(false);
    }

    let product_price = Decimal::new(500, 2);
    let product_id: ProductId = sqlx::query_scalar(
        r"
        INSERT INTO products (name, description, price, category)
        VALUES ('Dried Larvae', 'Whole dried BSF larvae', $1, $2)
        RETURNING id
        ",
    )
    .bind(product_price)
    .bind(ProductCategory::Larvae)
    .fetch_one(&mut *tx)
    .await?;

    let customer_id: CustomerId = sqlx::query_scalar(
        r"
        INSERT INTO customers (name, email, registration_date)
        VALUES ('Acme Feeds', $1, CURRENT_DATE)
        RETURNING id
        ",
    )
    .bind(&email)
    .fetch_one(&mut *tx)
    .await?;

    let sale = insert_sale(
        &mut *tx,
        &CreateSaleInput {
            sale_date: None,
            product_id,
            customer_id,
            quantity_kg: Decimal::new(10, 0),
            price_per_kg: product_price,
        },
    )
    .await?;
    insert_transaction(
        &mut *tx,
        &CreateTransactionInput {
            payment_status: PaymentStatus::Completed,
            ..CreateTransactionInput::pending(sale.id, PaymentMethod::Cash)
        },
    )
    .await?;
    info!(sale_id = %sale.id, total = %sale.total_amount, "Seeded sale");

    let today = Utc::now().date_naive();
    let start_date = today.checked_sub_days(Days::new(14)).unwrap_or(today);
    let feed_kg = Decimal::new(40, 0);
    let larvae_kg = Decimal::new(100, 1);

    let batch_id: BatchId = sqlx::query_scalar(
        r"
        INSERT INTO batches (start_date, stage, current_weight_kg, current_mortality, notes)
        VALUES ($1, $2, $3, $4, 'Demo batch')
        RETURNING id
        ",
    )
    .bind(start_date)
    .bind(BatchStage::Larvae)
    .bind(Decimal::new(25, 1))
    .bind(mortality_rate)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r"
        INSERT INTO feedings (batch_id, feed_date, feed_type, feed_quantity_kg)
        VALUES ($1, $2, 'Brewery grain', $3)
        ",
    )
    .bind(batch_id)
    .bind(today)
    .bind(feed_kg)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
        INSERT INTO harvests (batch_id, harvest_date, larvae_weight_kg, frass_weight_kg)
        VALUES ($1, $2, $3, $4)
        ",
    )
    .bind(batch_id)
    .bind(today)
    .bind(larvae_kg)
    .bind(Decimal::new(155, 1))
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO mortality (batch_id, mortality_date, mortality_rate) VALUES ($1, $2, $3)",
    )
    .bind(batch_id)
    .bind(today)
    .bind(mortality_rate)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
        INSERT INTO environment (temperature_c, humidity_percent, location)
        VALUES ($1, $2, 'Greenhouse A')
        ",
    )
    .bind(Decimal::new(285, 1))
    .bind(humidity)
    .execute(&mut *tx)
    .await?;

    let report_data = serde_json::json!({
        "batch_id": batch_id,
        "total_feed_kg": feed_kg,
        "total_larvae_kg": larvae_kg,
        "feed_conversion": larvae_kg.checked_div(feed_kg),
    });
    sqlx::query("INSERT INTO reports (report_type, report_data) VALUES ($1, $2)")
        .bind(ReportType::BatchPerformance)
        .bind(report_data)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(%product_id, %customer_id, %batch_id, "Demo data seeded");
    Ok(true)
}
