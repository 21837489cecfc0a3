use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatusDto {
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub account_id: i32,
    pub patient_id: i32,
    pub slot_id: i32,
    pub booking_date: NaiveDate,
    pub status: BookingStatusDto,
    pub token_number: i32,
    /// Human readable token, e.g. "T-03".
    pub token_id: String,
    pub appointment_time: String,
    pub appointment_end_time: String,
    pub payment_id: Option<i32>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Booking request.
///
/// Patients book for themselves and leave `patient_id` empty; admins must name the patient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingDto {
    pub slot_id: i32,
    pub patient_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedBookingsDto {
    pub bookings: Vec<BookingDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookingStatsDto {
    pub total: u64,
    pub confirmed: u64,
    pub cancelled: u64,
    pub completed: u64,
    /// Bookings created within the last seven days.
    pub recent: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BulkCancelResultDto {
    pub cancelled_count: u64,
    pub cancelled_booking_ids: Vec<i32>,
}
