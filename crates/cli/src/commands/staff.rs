//! Staff management commands.
//!
//! # Usage
//!
//! ```bash
//! bsf-cli staff create -n "Ada Keeper" -r "Technician" -c "+31 6 1234 5678"
//! bsf-cli staff set-status --id 3 --status Inactive
//! ```

use chrono::NaiveDate;

use bsf_core::{ActivityStatus, StaffId};
use bsf_farm::RepositoryError;
use bsf_farm::db::StaffRepository;
use bsf_farm::models::CreateStaffInput;

use super::{CommandError, connect};

/// Add a staff member.
///
/// # Returns
///
/// The ID of the new staff member.
///
/// # Errors
///
/// Returns `CommandError::InvalidInput` if the name or role is blank.
pub async fn create(
    name: String,
    role: String,
    contact: Option<String>,
    hire_date: Option<NaiveDate>,
) -> Result<StaffId, CommandError> {
    if name.trim().is_empty() {
        return Err(CommandError::InvalidInput("name must not be blank".to_owned()));
    }
    if role.trim().is_empty() {
        return Err(CommandError::InvalidInput("role must not be blank".to_owned()));
    }

    let pool = connect().await?;

    tracing::info!("Creating staff member: {} ({})", name, role);
    let staff = StaffRepository::new(&pool)
        .create(&CreateStaffInput {
            name,
            role,
            contact,
            hire_date,
        })
        .await?;

    tracing::info!(
        "Staff member created! ID: {}, Hired: {}, Status: {}",
        staff.id,
        staff.hire_date,
        staff.status
    );
    Ok(staff.id)
}

/// Move a staff member between `Active` and `Inactive`.
///
/// # Errors
///
/// Returns `CommandError::InvalidInput` if no staff member has `id`.
pub async fn set_status(id: StaffId, status: ActivityStatus) -> Result<(), CommandError> {
    let pool = connect().await?;

    let staff = StaffRepository::new(&pool)
        .set_status(id, status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CommandError::InvalidInput(format!("no staff with id {id}")),
            other => other.into(),
        })?;

    tracing::info!("{} ({}) is now {}", staff.name, staff.id, staff.status);
    Ok(())
}
