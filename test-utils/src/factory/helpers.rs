//! Shared helper utilities for factory methods.
//!
//! Provides ID generation for unique test values and convenience methods for creating
//! entities together with their dependencies.

use sea_orm::{DatabaseConnection, DbErr};

use crate::factory::{account::AccountFactory, patient::PatientFactory};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a patient-role account together with its linked patient profile.
///
/// This is the shape a self-booking patient has: the account is the authenticated
/// identity and the patient record is the profile bookings are made for.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok((account, patient))` - Created account and its linked patient profile
/// - `Err(DbErr)` - Database error during insert
pub async fn create_patient_account(
    db: &DatabaseConnection,
) -> Result<(entity::account::Model, entity::patient::Model), DbErr> {
    let account = AccountFactory::new(db).build().await?;
    let patient = PatientFactory::new(db)
        .account_id(Some(account.id))
        .name(account.name.clone())
        .email(Some(account.email.clone()))
        .build()
        .await?;

    Ok((account, patient))
}
