//! Database operations for the farm `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `customers` - Buyers, unique by email
//! - `staff` - Farm employees, authors of reports
//! - `products` - Catalog entries referenced by sales
//! - `batches` - Insect cohorts
//! - `feedings`, `harvests`, `mortality` - Per-batch logs (cascade with batch)
//! - `sales` - Sale lines with a generated `total_amount`
//! - `transactions` - Payment attempts for a sale (cascade with sale)
//! - `inventory` - Feed and supplies on hand
//! - `environment` - Temperature/humidity readings
//! - `reports` - Write-once analytics snapshots (JSONB payload)
//!
//! # Migrations
//!
//! Migrations live in `crates/farm/migrations/`, are embedded in
//! [`MIGRATOR`], and are applied with:
//! ```bash
//! cargo run -p bsf-cli -- migrate
//! ```

pub mod batches;
pub mod customers;
pub mod environment;
pub mod feedings;
pub mod harvests;
pub mod inventory;
pub mod mortality;
pub mod products;
pub mod reports;
pub mod sales;
pub mod staff;
pub mod transactions;

use core::fmt;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgDatabaseError, PgPoolOptions};
use thiserror::Error;

use crate::config::FarmConfig;

pub use batches::BatchRepository;
pub use customers::CustomerRepository;
pub use environment::EnvironmentRepository;
pub use feedings::FeedingRepository;
pub use harvests::HarvestRepository;
pub use inventory::InventoryRepository;
pub use mortality::MortalityRepository;
pub use products::ProductRepository;
pub use reports::ReportRepository;
pub use sales::SaleRepository;
pub use staff::StaffRepository;
pub use transactions::TransactionRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx that is not a constraint violation.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Applying migrations failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The write was rejected by a schema constraint.
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A stage or status change that the domain does not allow.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// The constraint violation behind this error, if any.
    #[must_use]
    pub const fn violation(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::Constraint(v) => Some(v),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && let Some(violation) = ConstraintViolation::from_database_error(&**db_err)
        {
            return Self::Constraint(violation);
        }
        Self::Database(err)
    }
}

/// Which kind of constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Duplicate value in a `UNIQUE` column.
    Unique,
    /// Missing parent row, or a delete blocked by child rows.
    ForeignKey,
    /// `NULL` in a `NOT NULL` column.
    NotNull,
    /// A `CHECK` constraint, including enumerated domains.
    Check,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::NotNull => "not-null",
            Self::Check => "check",
        })
    }
}

/// A write rejected by the schema, identifying the offending table and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Kind of constraint.
    pub kind: ViolationKind,
    /// Table that owns the constraint. For foreign keys this is the
    /// referencing (child) table.
    pub table: Option<String>,
    /// Offending column, when it can be determined.
    pub column: Option<String>,
    /// Constraint name as declared in the migrations.
    pub constraint: Option<String>,
    /// Message reported by `PostgreSQL`.
    pub message: String,
}

impl ConstraintViolation {
    /// Classify a driver error. Returns `None` for anything that is not one
    /// of the four integrity constraint kinds.
    #[must_use]
    pub fn from_database_error(err: &dyn DatabaseError) -> Option<Self> {
        let kind = match err.kind() {
            ErrorKind::UniqueViolation => ViolationKind::Unique,
            ErrorKind::ForeignKeyViolation => ViolationKind::ForeignKey,
            ErrorKind::NotNullViolation => ViolationKind::NotNull,
            ErrorKind::CheckViolation => ViolationKind::Check,
            _ => return None,
        };

        let table = err.table().map(str::to_owned);
        let constraint = err.constraint().map(str::to_owned);
        let reported_column = err
            .try_downcast_ref::<PgDatabaseError>()
            .and_then(PgDatabaseError::column)
            .map(str::to_owned);

        let column = reported_column.or_else(|| {
            let table = table.as_deref()?;
            column_from_constraint(table, constraint.as_deref()?)
        });

        Some(Self {
            kind,
            table,
            column,
            constraint,
            message: err.message().to_owned(),
        })
    }

    /// Returns `true` if this violation was raised on `table.column`.
    #[must_use]
    pub fn is_on(&self, table: &str, column: &str) -> bool {
        self.table.as_deref() == Some(table) && self.column.as_deref() == Some(column)
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} constraint violated", self.kind)?;
        match (&self.table, &self.column) {
            (Some(table), Some(column)) => write!(f, " on {table}.{column}")?,
            (Some(table), None) => write!(f, " on {table}")?,
            _ => {}
        }
        if let Some(constraint) = &self.constraint {
            write!(f, " ({constraint})")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ConstraintViolation {}

/// Recover the column from a constraint named `<table>_<column>_<suffix>`.
///
/// Every constraint in the migrations follows that convention, which is
/// also what `PostgreSQL` generates for unnamed column constraints.
fn column_from_constraint(table: &str, constraint: &str) -> Option<String> {
    let rest = constraint.strip_prefix(table)?.strip_prefix('_')?;
    ["_check", "_fkey", "_key"]
        .iter()
        .find_map(|suffix| rest.strip_suffix(suffix))
        .filter(|column| !column.is_empty())
        .map(str::to_owned)
}

/// Create a `PostgreSQL` connection pool from the farm configuration.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &FarmConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.database_url.expose_secret())
        .await
}

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `RepositoryError::Migration` if a migration fails or the applied
/// history no longer matches the embedded files.
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
