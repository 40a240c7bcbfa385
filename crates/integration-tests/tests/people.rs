//! Integration tests for customers and staff.
//!
//! These tests require a running `PostgreSQL` server reachable through
//! `DATABASE_URL`. Run with: `cargo test -p bsf-integration-tests -- --ignored`

use sqlx::PgPool;

use bsf_core::{ActivityStatus, CustomerId, Email, ReportType};
use bsf_farm::ViolationKind;
use bsf_farm::db::{CustomerRepository, ReportRepository, StaffRepository};
use bsf_farm::models::{CreateReportInput, UpdateCustomerInput, UpdateStaffInput};
use bsf_integration_tests::{acme_feeds, customer, technician};

// =============================================================================
// Customers
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_customer_round_trip_by_email(pool: PgPool) {
    let acme = acme_feeds(&pool).await.expect("create customer");
    let customers = CustomerRepository::new(&pool);

    let email = Email::parse("A@ACME.test").expect("valid email");
    let found = customers
        .get_by_email(&email)
        .await
        .expect("get by email")
        .expect("customer exists");
    assert_eq!(found, acme);
    assert_eq!(found.email.as_str(), "a@acme.test");
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_duplicate_email_rejected(pool: PgPool) {
    acme_feeds(&pool).await.expect("create customer");

    let err = customer(&pool, "Acme Again", "a@acme.test")
        .await
        .expect_err("duplicate email rejected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::Unique);
    assert!(violation.is_on("customers", "email"));
    assert_eq!(violation.constraint.as_deref(), Some("customers_email_key"));
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_update_to_taken_email_rejected(pool: PgPool) {
    acme_feeds(&pool).await.expect("create customer");
    let other = customer(&pool, "Bugfarm Co", "buy@bugfarm.test")
        .await
        .expect("create other customer");
    let customers = CustomerRepository::new(&pool);

    let err = customers
        .update(
            other.id,
            &UpdateCustomerInput {
                email: Some(Email::parse("a@acme.test").expect("valid email")),
                ..UpdateCustomerInput::default()
            },
        )
        .await
        .expect_err("taken email rejected");
    assert!(err.violation().is_some_and(|v| v.kind == ViolationKind::Unique));

    let renamed = customers
        .update(
            other.id,
            &UpdateCustomerInput {
                address: Some("Dock 7, Rotterdam".to_owned()),
                ..UpdateCustomerInput::default()
            },
        )
        .await
        .expect("update address");
    assert_eq!(renamed.address.as_deref(), Some("Dock 7, Rotterdam"));
    assert_eq!(renamed.email, other.email);
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_update_missing_customer(pool: PgPool) {
    let err = CustomerRepository::new(&pool)
        .update(CustomerId::new(404), &UpdateCustomerInput::default())
        .await
        .expect_err("missing customer");
    assert!(matches!(err, bsf_farm::RepositoryError::NotFound));
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_customer_list_paginates(pool: PgPool) {
    for n in 0..5 {
        customer(&pool, &format!("Buyer {n}"), &format!("buyer{n}@farm.test"))
            .await
            .expect("create customer");
    }
    let customers = CustomerRepository::new(&pool);

    let first = customers.list(2, 0).await.expect("first page");
    let rest = customers.list(10, 2).await.expect("rest");
    assert_eq!(first.len(), 2);
    assert_eq!(rest.len(), 3);
    assert!(first.iter().all(|c| rest.iter().all(|r| r.id != c.id)));
}

// =============================================================================
// Staff
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_staff_status_transitions(pool: PgPool) {
    let staff = StaffRepository::new(&pool);
    let ada = technician(&pool, "Ada Keeper").await.expect("create staff");
    technician(&pool, "Ben Sorter").await.expect("create staff");
    assert_eq!(ada.status, ActivityStatus::Active);

    let ada = staff
        .set_status(ada.id, ActivityStatus::Inactive)
        .await
        .expect("deactivate");
    assert_eq!(ada.status, ActivityStatus::Inactive);

    let active = staff
        .list(Some(ActivityStatus::Active))
        .await
        .expect("list active");
    assert_eq!(active.len(), 1);
    assert!(active.iter().all(|s| s.name == "Ben Sorter"));

    let ada = staff
        .set_status(ada.id, ActivityStatus::Active)
        .await
        .expect("reactivate");
    assert!(ada.status.is_active());
    assert_eq!(staff.list(None).await.expect("list all").len(), 2);
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_staff_update_keeps_unset_fields(pool: PgPool) {
    let ada = technician(&pool, "Ada Keeper").await.expect("create staff");

    let promoted = StaffRepository::new(&pool)
        .update(
            ada.id,
            &UpdateStaffInput {
                role: Some("Farm Manager".to_owned()),
                ..UpdateStaffInput::default()
            },
        )
        .await
        .expect("update staff");
    assert_eq!(promoted.role, "Farm Manager");
    assert_eq!(promoted.name, ada.name);
    assert_eq!(promoted.hire_date, ada.hire_date);
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_report_author_cannot_be_deleted(pool: PgPool) {
    let ada = technician(&pool, "Ada Keeper").await.expect("create staff");
    let ben = technician(&pool, "Ben Sorter").await.expect("create staff");
    ReportRepository::new(&pool)
        .create(&CreateReportInput {
            report_date: None,
            report_type: ReportType::Mortality,
            report_data: serde_json::json!({ "batches": [] }),
            generated_by: Some(ada.id),
        })
        .await
        .expect("create report");

    let staff = StaffRepository::new(&pool);
    let err = staff.delete(ada.id).await.expect_err("author is protected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::ForeignKey);
    assert_eq!(violation.constraint.as_deref(), Some("reports_generated_by_fkey"));

    assert!(staff.delete(ben.id).await.expect("delete non-author"));
    assert!(staff.get(ben.id).await.expect("get").is_none());
}
