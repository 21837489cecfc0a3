//! Booking factory for creating test booking entities.
//!
//! Inserting a booking through the factory does not touch the slot's seat counter; tests
//! that need a consistent ledger should set `booked_seats` on the slot factory to match.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::BookingStatus;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test bookings with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::booking::BookingFactory;
///
/// let booking = BookingFactory::new(&db, account.id, patient.id, &slot)
///     .token_number(3)
///     .status(BookingStatus::Cancelled)
///     .build()
///     .await?;
/// ```
pub struct BookingFactory<'a> {
    db: &'a DatabaseConnection,
    account_id: i32,
    patient_id: i32,
    slot_id: i32,
    booking_date: chrono::NaiveDate,
    status: BookingStatus,
    token_number: i32,
    appointment_time: String,
    appointment_end_time: String,
    payment_id: Option<i32>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl<'a> BookingFactory<'a> {
    /// Creates a new BookingFactory for the given account, patient and slot.
    ///
    /// Defaults:
    /// - booking_date: the slot's date
    /// - status: `BookingStatus::Confirmed`
    /// - token_number: `1`
    /// - appointment window: the slot's start and end time
    pub fn new(
        db: &'a DatabaseConnection,
        account_id: i32,
        patient_id: i32,
        slot: &entity::slot::Model,
    ) -> Self {
        Self {
            db,
            account_id,
            patient_id,
            slot_id: slot.id,
            booking_date: slot.date,
            status: BookingStatus::Confirmed,
            token_number: 1,
            appointment_time: slot.start_time.clone(),
            appointment_end_time: slot.end_time.clone(),
            payment_id: None,
            cancelled_at: None,
        }
    }

    /// Sets the booking status. Cancelled bookings get a cancellation timestamp.
    pub fn status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self.cancelled_at = match status {
            BookingStatus::Cancelled => Some(Utc::now()),
            _ => None,
        };
        self
    }

    /// Sets the booking date.
    pub fn booking_date(mut self, booking_date: chrono::NaiveDate) -> Self {
        self.booking_date = booking_date;
        self
    }

    /// Sets the token number; the token id is derived from it.
    pub fn token_number(mut self, token_number: i32) -> Self {
        self.token_number = token_number;
        self
    }

    /// Links the booking to a payment.
    pub fn payment_id(mut self, payment_id: Option<i32>) -> Self {
        self.payment_id = payment_id;
        self
    }

    /// Builds and inserts the booking entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::booking::Model)` - Created booking entity
    /// - `Err(DbErr)` - Database error during insert, including the active booking
    ///   uniqueness constraint
    pub async fn build(self) -> Result<entity::booking::Model, DbErr> {
        entity::booking::ActiveModel {
            id: ActiveValue::NotSet,
            account_id: ActiveValue::Set(self.account_id),
            patient_id: ActiveValue::Set(self.patient_id),
            slot_id: ActiveValue::Set(self.slot_id),
            booking_date: ActiveValue::Set(self.booking_date),
            status: ActiveValue::Set(self.status),
            token_number: ActiveValue::Set(self.token_number),
            token_id: ActiveValue::Set(format!("T-{:02}", self.token_number)),
            appointment_time: ActiveValue::Set(self.appointment_time),
            appointment_end_time: ActiveValue::Set(self.appointment_end_time),
            payment_id: ActiveValue::Set(self.payment_id),
            cancelled_at: ActiveValue::Set(self.cancelled_at),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a confirmed booking with token 1 for the account's patient on the slot.
pub async fn create_booking(
    db: &DatabaseConnection,
    account: &entity::account::Model,
    patient: &entity::patient::Model,
    slot: &entity::slot::Model,
) -> Result<entity::booking::Model, DbErr> {
    BookingFactory::new(db, account.id, patient.id, slot)
        .build()
        .await
}
