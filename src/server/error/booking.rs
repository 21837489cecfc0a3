use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Failures of the booking reservation and cancellation flows.
///
/// Every variant is raised either before any seat is claimed or after the claim has been
/// compensated, so none of them leave the slot ledger holding an orphaned seat.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Slot {0} not found")]
    SlotNotFound(i32),

    #[error("Slot {0} is not active")]
    SlotInactive(i32),

    #[error("Slot {0} is fully booked")]
    SlotFull(i32),

    #[error("Patient {patient_id} already has an active booking for slot {slot_id}")]
    DuplicateBooking { patient_id: i32, slot_id: i32 },

    #[error("Patient {0} not found")]
    PatientNotFound(i32),

    /// Patient-role account has no linked patient profile to book for.
    #[error("Account {0} has no patient profile")]
    PatientProfileMissing(i32),

    /// Admin requested a booking without naming the patient.
    #[error("A patient id is required when booking on behalf of a patient")]
    PatientRequired,

    #[error("Booking {0} not found")]
    BookingNotFound(i32),

    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(i32),

    /// Caller is neither an admin nor the account that made the booking.
    #[error("Account {account_id} may not cancel booking {booking_id}")]
    NotBookingOwner { account_id: i32, booking_id: i32 },
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::SlotNotFound(_)
            | Self::PatientNotFound(_)
            | Self::PatientProfileMissing(_)
            | Self::BookingNotFound(_) => StatusCode::NOT_FOUND,
            Self::SlotInactive(_)
            | Self::SlotFull(_)
            | Self::DuplicateBooking { .. }
            | Self::AlreadyCancelled(_) => StatusCode::CONFLICT,
            Self::PatientRequired => StatusCode::BAD_REQUEST,
            Self::NotBookingOwner { .. } => StatusCode::FORBIDDEN,
        };

        let message = match self {
            Self::SlotNotFound(_) => "Slot not found".to_string(),
            Self::SlotInactive(_) => "Slot is not available for booking".to_string(),
            Self::SlotFull(_) => "Slot is fully booked".to_string(),
            Self::DuplicateBooking { .. } => "You have already booked this slot".to_string(),
            Self::PatientNotFound(_) => "Patient not found".to_string(),
            Self::PatientProfileMissing(_) => "Patient profile not found".to_string(),
            Self::BookingNotFound(_) => "Booking not found".to_string(),
            Self::AlreadyCancelled(_) => "Booking already cancelled".to_string(),
            Self::NotBookingOwner { .. } => "Not authorized to cancel this booking".to_string(),
            err @ Self::PatientRequired => err.to_string(),
        };

        error_response(status, message)
    }
}
