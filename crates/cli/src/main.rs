//! BSF farm CLI - Database migrations, demo data and staff management.
//!
//! # Usage
//!
//! ```bash
//! # Apply the embedded migrations
//! bsf-cli migrate
//!
//! # Insert a small demo data set
//! bsf-cli seed demo
//!
//! # Add a staff member
//! bsf-cli staff create -n "Ada Keeper" -r "Technician" --hire-date 2026-03-01
//!
//! # Retire a staff member
//! bsf-cli staff set-status --id 3 --status Inactive
//!
//! # Row counts per table
//! bsf-cli stats
//! ```
//!
//! The database is configured through `FARM_DATABASE_URL` (see
//! `bsf_farm::config`). Log verbosity follows `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bsf_core::{ActivityStatus, StaffId};

mod commands;

#[derive(Parser)]
#[command(name = "bsf-cli")]
#[command(author, version, about = "BSF farm database tools")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Insert sample data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage staff
    Staff {
        #[command(subcommand)]
        action: StaffAction,
    },
    /// Print row counts for every table
    Stats,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// A product, customer, sale with payment, and one batch with logs
    Demo,
}

#[derive(Subcommand)]
enum StaffAction {
    /// Add a staff member
    Create {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Job title
        #[arg(short, long)]
        role: String,

        /// Phone or email
        #[arg(short, long)]
        contact: Option<String>,

        /// Hire date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        hire_date: Option<NaiveDate>,
    },
    /// Set a staff member `Active` or `Inactive`
    SetStatus {
        /// Staff ID
        #[arg(long)]
        id: i32,

        /// New status
        #[arg(long)]
        status: ActivityStatus,
    },
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bsf_cli=info,bsf_farm=info".into());

    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Demo => commands::seed::demo().await?,
        },
        Commands::Staff { action } => match action {
            StaffAction::Create {
                name,
                role,
                contact,
                hire_date,
            } => {
                commands::staff::create(name, role, contact, hire_date).await?;
            }
            StaffAction::SetStatus { id, status } => {
                commands::staff::set_status(StaffId::new(id), status).await?;
            }
        },
        Commands::Stats => commands::stats::run().await?,
    }
    Ok(())
}
