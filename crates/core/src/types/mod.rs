//! Core types for the farm schema.
//!
//! This module provides type-safe wrappers for the domain concepts stored in
//! the database.

pub mod email;
pub mod enums;
pub mod id;
pub mod measure;

pub use email::{Email, EmailError};
pub use enums::*;
pub use id::*;
pub use measure::{Percent, PercentError, sale_total};
