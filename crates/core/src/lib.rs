//! BSF Core - Shared domain types for the Black Soldier Fly farm schema.
//!
//! This crate provides the vocabulary shared by every other crate in the
//! workspace:
//! - `farm` - Connection pool, migrations, and one repository per table
//! - `cli` - Command-line tools for migrations, seeding, and staff management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no
//! database access. The optional `postgres` feature adds `sqlx` encode/decode
//! support so the same types can be bound directly into queries.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, enumerated domains, emails, percentages and the
//!   sale total rule

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
