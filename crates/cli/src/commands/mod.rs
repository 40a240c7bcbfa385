//! Subcommand implementations.

pub mod migrate;
pub mod seed;
pub mod staff;
pub mod stats;

use sqlx::PgPool;
use thiserror::Error;

use bsf_farm::{ConfigError, FarmConfig, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A repository call failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Bad command-line input that clap could not catch.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Load configuration and open a pool.
pub async fn connect() -> Result<PgPool, CommandError> {
    let config = FarmConfig::from_env()?;

    tracing::info!("Connecting to farm database...");
    let pool = bsf_farm::db::create_pool(&config).await?;
    Ok(pool)
}
