//! Database migration command.
//!
//! Migrations are embedded in the `bsf-farm` library from
//! `crates/farm/migrations/`, so the binary carries them and needs no
//! checkout to run.

use super::{CommandError, connect};

/// Apply every pending migration.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running farm migrations...");
    bsf_farm::db::run_migrations(&pool).await?;

    tracing::info!(
        migrations = bsf_farm::db::MIGRATOR.iter().count(),
        "Farm migrations complete"
    );
    Ok(())
}
