//! BSF Farm - `PostgreSQL` schema and repositories for a Black Soldier Fly farm.
//!
//! The schema is the system: tables, column types, foreign keys with their
//! cascade/restrict rules, `CHECK`-guarded enumerated domains, and the
//! generated `sales.total_amount` column. Everything is enforced by
//! `PostgreSQL`; this crate embeds the migrations and gives each table a
//! typed repository.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven pool settings
//! - [`db`] - Pool creation, migrations, repositories, constraint errors
//! - [`models`] - Row types and write inputs for every table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;

pub use config::{ConfigError, FarmConfig};
pub use db::{ConstraintViolation, RepositoryError, ViolationKind};
