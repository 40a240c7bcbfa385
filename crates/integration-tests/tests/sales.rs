//! Integration tests for sales, their generated totals and payment
//! transactions.
//!
//! These tests require a running `PostgreSQL` server reachable through
//! `DATABASE_URL`. Run with: `cargo test -p bsf-integration-tests -- --ignored`

use rust_decimal::Decimal;
use sqlx::PgPool;

use bsf_core::{CustomerId, PaymentMethod, PaymentStatus, ProductId, SaleId};
use bsf_farm::ViolationKind;
use bsf_farm::db::{CustomerRepository, ProductRepository, SaleRepository, TransactionRepository};
use bsf_farm::models::{CreateSaleInput, CreateTransactionInput, SaleFilter, UpdateSaleInput};
use bsf_integration_tests::{acme_feeds, count_where, customer, date, dried_larvae};

fn sale_input(
    product_id: ProductId,
    customer_id: CustomerId,
    quantity_kg: Decimal,
    price_per_kg: Decimal,
) -> CreateSaleInput {
    CreateSaleInput {
        sale_date: Some(date(2026, 3, 14)),
        product_id,
        customer_id,
        quantity_kg,
        price_per_kg,
    }
}

// =============================================================================
// Example Scenario
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_dried_larvae_scenario(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");

    let sale = SaleRepository::new(&pool)
        .create(&sale_input(
            product.id,
            acme.id,
            Decimal::new(10, 0),
            Decimal::new(500, 2),
        ))
        .await
        .expect("create sale");
    assert_eq!(sale.total_amount, Decimal::new(5000, 2));

    let transaction = TransactionRepository::new(&pool)
        .create(&CreateTransactionInput::pending(sale.id, PaymentMethod::Cash))
        .await
        .expect("create transaction");
    assert_eq!(transaction.sale_id, sale.id);
    assert_eq!(transaction.payment_method, PaymentMethod::Cash);
    assert_eq!(transaction.payment_status, PaymentStatus::Pending);

    let deleted = CustomerRepository::new(&pool)
        .delete(acme.id)
        .await
        .expect("delete customer");
    assert!(deleted);

    let sales = SaleRepository::new(&pool);
    assert!(sales.get(sale.id).await.expect("get sale").is_none());
    assert!(
        TransactionRepository::new(&pool)
            .get(transaction.id)
            .await
            .expect("get transaction")
            .is_none()
    );

    // The product survives the customer.
    assert!(
        ProductRepository::new(&pool)
            .get(product.id)
            .await
            .expect("get product")
            .is_some()
    );
}

// =============================================================================
// Generated Total
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_total_follows_updates(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");
    let sales = SaleRepository::new(&pool);

    let sale = sales
        .create(&sale_input(
            product.id,
            acme.id,
            Decimal::new(1250, 2),
            Decimal::new(375, 2),
        ))
        .await
        .expect("create sale");
    assert_eq!(sale.total_amount, Decimal::new(468_750, 4));
    assert!(sale.total_is_consistent());

    let sale = sales
        .update(
            sale.id,
            &UpdateSaleInput {
                quantity_kg: Some(Decimal::new(3, 0)),
                ..UpdateSaleInput::default()
            },
        )
        .await
        .expect("update quantity");
    assert_eq!(sale.total_amount, Decimal::new(1125, 2));

    let sale = sales
        .update(
            sale.id,
            &UpdateSaleInput {
                price_per_kg: Some(Decimal::new(4, 0)),
                ..UpdateSaleInput::default()
            },
        )
        .await
        .expect("update price");
    assert_eq!(sale.total_amount, Decimal::new(12, 0));

    let fetched = sales.get(sale.id).await.expect("get sale").expect("sale exists");
    assert_eq!(fetched.total_amount, Decimal::new(12, 0));
    assert!(fetched.total_is_consistent());
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_total_cannot_be_written(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");
    let sale = SaleRepository::new(&pool)
        .create(&sale_input(product.id, acme.id, Decimal::new(2, 0), Decimal::new(5, 0)))
        .await
        .expect("create sale");

    let result = sqlx::query("UPDATE sales SET total_amount = 1 WHERE id = $1")
        .bind(sale.id)
        .execute(&pool)
        .await;
    assert!(result.is_err());
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_sale_quantity_must_be_positive(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");

    let err = SaleRepository::new(&pool)
        .create(&sale_input(product.id, acme.id, Decimal::ZERO, Decimal::new(5, 0)))
        .await
        .expect_err("zero quantity rejected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::Check);
    assert!(violation.is_on("sales", "quantity_kg"));
}

// =============================================================================
// Foreign Keys and Cascades
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_sale_requires_existing_product_and_customer(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");
    let sales = SaleRepository::new(&pool);

    let err = sales
        .create(&sale_input(
            ProductId::new(9999),
            acme.id,
            Decimal::ONE,
            Decimal::ONE,
        ))
        .await
        .expect_err("missing product rejected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::ForeignKey);
    assert!(violation.is_on("sales", "product_id"));

    let err = sales
        .create(&sale_input(
            product.id,
            CustomerId::new(9999),
            Decimal::ONE,
            Decimal::ONE,
        ))
        .await
        .expect_err("missing customer rejected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::ForeignKey);
    assert!(violation.is_on("sales", "customer_id"));
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_transaction_requires_existing_sale(pool: PgPool) {
    let err = TransactionRepository::new(&pool)
        .create(&CreateTransactionInput::pending(SaleId::new(424_242), PaymentMethod::Card))
        .await
        .expect_err("missing sale rejected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::ForeignKey);
    assert!(violation.is_on("transactions", "sale_id"));
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_product_with_sales_cannot_be_deleted(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");
    SaleRepository::new(&pool)
        .create(&sale_input(product.id, acme.id, Decimal::ONE, Decimal::ONE))
        .await
        .expect("create sale");

    let products = ProductRepository::new(&pool);
    let err = products
        .delete(product.id)
        .await
        .expect_err("referenced product is protected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::ForeignKey);
    assert_eq!(violation.table.as_deref(), Some("sales"));
    assert_eq!(violation.constraint.as_deref(), Some("sales_product_id_fkey"));

    assert!(products.get(product.id).await.expect("get product").is_some());
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_customer_delete_only_removes_their_sales(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");
    let other = customer(&pool, "Bugfarm Co", "buy@bugfarm.test")
        .await
        .expect("create other customer");
    let sales = SaleRepository::new(&pool);

    for _ in 0..3 {
        sales
            .create_with_payment(
                &sale_input(product.id, acme.id, Decimal::ONE, Decimal::ONE),
                PaymentMethod::Transfer,
                PaymentStatus::Completed,
            )
            .await
            .expect("create acme sale");
    }
    let kept = sales
        .create_with_payment(
            &sale_input(product.id, other.id, Decimal::ONE, Decimal::ONE),
            PaymentMethod::Cash,
            PaymentStatus::Completed,
        )
        .await
        .expect("create other sale");

    CustomerRepository::new(&pool)
        .delete(acme.id)
        .await
        .expect("delete customer");

    assert_eq!(
        count_where(&pool, "sales", "customer_id", acme.id.as_i32())
            .await
            .expect("count sales"),
        0
    );
    let orphans: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions t LEFT JOIN sales s ON s.id = t.sale_id WHERE s.id IS NULL",
    )
    .fetch_one(&pool)
    .await
    .expect("count orphans");
    assert_eq!(orphans, 0);

    assert!(sales.get(kept.sale.id).await.expect("get sale").is_some());
    assert_eq!(
        TransactionRepository::new(&pool)
            .list_for_sale(kept.sale.id)
            .await
            .expect("list transactions"),
        vec![kept.transaction]
    );
}

// =============================================================================
// Sale With Payment
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_create_with_payment(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");

    let paid = SaleRepository::new(&pool)
        .create_with_payment(
            &sale_input(product.id, acme.id, Decimal::new(10, 0), Decimal::new(500, 2)),
            PaymentMethod::Card,
            PaymentStatus::Completed,
        )
        .await
        .expect("create sale with payment");

    assert_eq!(paid.sale.total_amount, Decimal::new(50, 0));
    assert_eq!(paid.transaction.sale_id, paid.sale.id);
    assert_eq!(paid.transaction.payment_status, PaymentStatus::Completed);
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_create_with_payment_rolls_back(pool: PgPool) {
    let acme = acme_feeds(&pool).await.expect("create customer");

    let err = SaleRepository::new(&pool)
        .create_with_payment(
            &sale_input(ProductId::new(9999), acme.id, Decimal::ONE, Decimal::ONE),
            PaymentMethod::Cash,
            PaymentStatus::Completed,
        )
        .await
        .expect_err("missing product rejected");
    assert!(err.violation().is_some());

    let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(&pool)
        .await
        .expect("count sales");
    let transactions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(&pool)
        .await
        .expect("count transactions");
    assert_eq!((sales, transactions), (0, 0));
}

// =============================================================================
// Listing and Transactions
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_list_filters_by_customer_and_date(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");
    let other = customer(&pool, "Bugfarm Co", "buy@bugfarm.test")
        .await
        .expect("create other customer");
    let sales = SaleRepository::new(&pool);

    for (customer_id, day) in [(acme.id, 1), (acme.id, 10), (other.id, 10), (acme.id, 20)] {
        sales
            .create(&CreateSaleInput {
                sale_date: Some(date(2026, 3, day)),
                ..sale_input(product.id, customer_id, Decimal::ONE, Decimal::ONE)
            })
            .await
            .expect("create sale");
    }

    let found = sales
        .list(&SaleFilter {
            customer_id: Some(acme.id),
            start_date: Some(date(2026, 3, 5)),
            end_date: Some(date(2026, 3, 20)),
            ..SaleFilter::default()
        })
        .await
        .expect("list sales");

    let dates: Vec<_> = found.iter().map(|s| s.sale_date).collect();
    assert_eq!(dates, vec![date(2026, 3, 20), date(2026, 3, 10)]);
    assert!(found.iter().all(|s| s.customer_id == acme.id));
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_transaction_status_update_and_delete(pool: PgPool) {
    let product = dried_larvae(&pool).await.expect("create product");
    let acme = acme_feeds(&pool).await.expect("create customer");
    let sale = SaleRepository::new(&pool)
        .create(&sale_input(product.id, acme.id, Decimal::ONE, Decimal::ONE))
        .await
        .expect("create sale");
    let transactions = TransactionRepository::new(&pool);

    let failed = transactions
        .create(&CreateTransactionInput {
            payment_status: PaymentStatus::Failed,
            ..CreateTransactionInput::pending(sale.id, PaymentMethod::Card)
        })
        .await
        .expect("create failed card payment");
    let cash = transactions
        .create(&CreateTransactionInput::pending(sale.id, PaymentMethod::Cash))
        .await
        .expect("create cash payment");

    let cash = transactions
        .update_status(cash.id, PaymentStatus::Completed)
        .await
        .expect("complete payment");
    assert_eq!(cash.payment_status, PaymentStatus::Completed);

    assert_eq!(
        transactions.list_for_sale(sale.id).await.expect("list").len(),
        2
    );

    assert!(transactions.delete(failed.id).await.expect("delete"));
    assert!(!transactions.delete(failed.id).await.expect("delete again"));
    assert!(transactions.get(failed.id).await.expect("get").is_none());
}
