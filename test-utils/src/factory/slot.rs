//! Slot factory for creating test slot entities.

use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test slots with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::slot::SlotFactory;
///
/// let slot = SlotFactory::new(&db)
///     .times("07:00", "07:40")
///     .max_seats(20)
///     .build()
///     .await?;
/// ```
pub struct SlotFactory<'a> {
    db: &'a DatabaseConnection,
    date: NaiveDate,
    start_time: String,
    end_time: String,
    max_seats: i32,
    booked_seats: i32,
    price: i64,
    currency: String,
    is_active: bool,
}

impl<'a> SlotFactory<'a> {
    /// Creates a new SlotFactory with default values.
    ///
    /// Defaults:
    /// - date: a unique future date (tomorrow plus an auto-incremented day offset) so
    ///   factory slots never collide on the date/time unique index
    /// - start_time / end_time: `"07:00"` / `"07:40"`
    /// - max_seats: `20`, booked_seats: `0`
    /// - price: `1000`, currency: `"INR"`
    /// - is_active: `true`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let offset = (next_id() % 3000) as i64;
        Self {
            db,
            date: Utc::now().date_naive() + Duration::days(1 + offset),
            start_time: "07:00".to_string(),
            end_time: "07:40".to_string(),
            max_seats: 20,
            booked_seats: 0,
            price: 1000,
            currency: "INR".to_string(),
            is_active: true,
        }
    }

    /// Sets the slot date.
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Sets the slot start and end times ("HH:MM").
    pub fn times(mut self, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self.end_time = end_time.into();
        self
    }

    /// Sets the slot capacity.
    pub fn max_seats(mut self, max_seats: i32) -> Self {
        self.max_seats = max_seats;
        self
    }

    /// Sets the number of seats already booked.
    pub fn booked_seats(mut self, booked_seats: i32) -> Self {
        self.booked_seats = booked_seats;
        self
    }

    /// Sets the slot price in minor currency units.
    pub fn price(mut self, price: i64) -> Self {
        self.price = price;
        self
    }

    /// Sets whether the slot is active.
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Builds and inserts the slot entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::slot::Model)` - Created slot entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::slot::Model, DbErr> {
        entity::slot::ActiveModel {
            id: ActiveValue::NotSet,
            date: ActiveValue::Set(self.date),
            start_time: ActiveValue::Set(self.start_time),
            end_time: ActiveValue::Set(self.end_time),
            max_seats: ActiveValue::Set(self.max_seats),
            booked_seats: ActiveValue::Set(self.booked_seats),
            price: ActiveValue::Set(self.price),
            currency: ActiveValue::Set(self.currency),
            is_active: ActiveValue::Set(self.is_active),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a slot with default values.
pub async fn create_slot(db: &DatabaseConnection) -> Result<entity::slot::Model, DbErr> {
    SlotFactory::new(db).build().await
}
