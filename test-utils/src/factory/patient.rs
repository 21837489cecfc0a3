//! Patient factory for creating test patient profiles.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test patient profiles with customizable fields.
///
/// Patients created without an `account_id` model admin-registered walk-in patients.
pub struct PatientFactory<'a> {
    db: &'a DatabaseConnection,
    account_id: Option<i32>,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
}

impl<'a> PatientFactory<'a> {
    /// Creates a new PatientFactory with default values.
    ///
    /// Defaults:
    /// - account_id: `None`
    /// - name: `"Patient {id}"`
    /// - email: `Some("patient{id}@example.com")`
    /// - phone: `Some("+91 98765 43210")`
    /// - age: `Some(30)`
    /// - gender: `Some("Other")`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            account_id: None,
            name: format!("Patient {}", id),
            email: Some(format!("patient{}@example.com", id)),
            phone: Some("+91 98765 43210".to_string()),
            age: Some(30),
            gender: Some("Other".to_string()),
        }
    }

    /// Links the patient profile to an account.
    pub fn account_id(mut self, account_id: Option<i32>) -> Self {
        self.account_id = account_id;
        self
    }

    /// Sets the patient name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the patient email.
    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Builds and inserts the patient entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::patient::Model)` - Created patient entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::patient::Model, DbErr> {
        entity::patient::ActiveModel {
            id: ActiveValue::NotSet,
            account_id: ActiveValue::Set(self.account_id),
            name: ActiveValue::Set(self.name),
            email: ActiveValue::Set(self.email),
            phone: ActiveValue::Set(self.phone),
            age: ActiveValue::Set(self.age),
            gender: ActiveValue::Set(self.gender),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a patient profile not linked to any account.
pub async fn create_patient(db: &DatabaseConnection) -> Result<entity::patient::Model, DbErr> {
    PatientFactory::new(db).build().await
}
