//! Customer models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use bsf_core::{CustomerId, Email};

/// A registered buyer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub contact_number: Option<String>,
    /// Email address, unique across customers.
    pub email: Email,
    /// Postal address.
    pub address: Option<String>,
    /// Date the customer registered.
    pub registration_date: NaiveDate,
    /// When the row was inserted.
    pub created_at: DateTime<Utc>,
}

/// Input for registering a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerInput {
    /// Display name.
    pub name: String,
    /// Phone number.
    pub contact_number: Option<String>,
    /// Email address.
    pub email: Email,
    /// Postal address.
    pub address: Option<String>,
    /// Registration date (defaults to today in the database).
    pub registration_date: Option<NaiveDate>,
}

impl CreateCustomerInput {
    /// Input with just the required fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, email: Email) -> Self {
        Self {
            name: name.into(),
            contact_number: None,
            email,
            address: None,
            registration_date: None,
        }
    }
}

/// Input for editing a customer. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomerInput {
    /// Display name.
    pub name: Option<String>,
    /// Phone number.
    pub contact_number: Option<String>,
    /// Email address.
    pub email: Option<Email>,
    /// Postal address.
    pub address: Option<String>,
}
