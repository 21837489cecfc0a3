use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::booking::BookingDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SlotDto {
    pub id: i32,
    pub date: NaiveDate,
    /// Start of the slot, "HH:MM" 24-hour clock.
    pub start_time: String,
    /// End of the slot, "HH:MM" 24-hour clock.
    pub end_time: String,
    pub max_seats: i32,
    pub booked_seats: i32,
    pub available_seats: i32,
    /// Length of each patient's appointment window in minutes.
    pub minutes_per_patient: i32,
    /// Price in minor currency units.
    pub price: i64,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSlotDto {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub max_seats: i32,
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlotBookingsDto {
    pub slot: SlotDto,
    pub bookings: Vec<BookingDto>,
}
