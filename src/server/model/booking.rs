//! Booking domain models and parameters.

use chrono::{DateTime, NaiveDate, Utc};
use entity::sea_orm_active_enums::{AccountRole, BookingStatus};

use crate::{
    model::booking::{
        BookingDto, BookingStatsDto, BookingStatusDto, PaginatedBookingsDto,
    },
    server::{error::booking::BookingError, util::token::TokenAllocation},
};

/// Who is asking for a booking, resolved once at the request boundary.
///
/// Patients always book for their own profile. Admins book on behalf of a named patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Patient { account_id: i32 },
    Admin { account_id: i32, patient_id: i32 },
}

impl Requester {
    /// Builds the requester from the authenticated account and the optional target patient.
    ///
    /// # Returns
    /// - `Ok(Requester)` - Requester resolved from the account role
    /// - `Err(BookingError::PatientRequired)` - Admin did not name a patient
    pub fn from_account(
        account: &entity::account::Model,
        patient_id: Option<i32>,
    ) -> Result<Self, BookingError> {
        match account.role {
            AccountRole::Patient => Ok(Self::Patient {
                account_id: account.id,
            }),
            AccountRole::Admin => patient_id
                .map(|patient_id| Self::Admin {
                    account_id: account.id,
                    patient_id,
                })
                .ok_or(BookingError::PatientRequired),
        }
    }

    /// Account that will be recorded as having made the booking.
    pub fn account_id(&self) -> i32 {
        match self {
            Self::Patient { account_id } | Self::Admin { account_id, .. } => *account_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub account_id: i32,
    pub patient_id: i32,
    pub slot_id: i32,
    pub booking_date: NaiveDate,
    pub status: BookingStatus,
    pub token_number: i32,
    pub token_id: String,
    pub appointment_time: String,
    pub appointment_end_time: String,
    pub payment_id: Option<i32>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn from_entity(entity: entity::booking::Model) -> Self {
        Self {
            id: entity.id,
            account_id: entity.account_id,
            patient_id: entity.patient_id,
            slot_id: entity.slot_id,
            booking_date: entity.booking_date,
            status: entity.status,
            token_number: entity.token_number,
            token_id: entity.token_id,
            appointment_time: entity.appointment_time,
            appointment_end_time: entity.appointment_end_time,
            payment_id: entity.payment_id,
            cancelled_at: entity.cancelled_at,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> BookingDto {
        BookingDto {
            id: self.id,
            account_id: self.account_id,
            patient_id: self.patient_id,
            slot_id: self.slot_id,
            booking_date: self.booking_date,
            status: match self.status {
                BookingStatus::Confirmed => BookingStatusDto::Confirmed,
                BookingStatus::Cancelled => BookingStatusDto::Cancelled,
                BookingStatus::Completed => BookingStatusDto::Completed,
            },
            token_number: self.token_number,
            token_id: self.token_id,
            appointment_time: self.appointment_time,
            appointment_end_time: self.appointment_end_time,
            payment_id: self.payment_id,
            cancelled_at: self.cancelled_at,
            created_at: self.created_at,
        }
    }
}

/// Parameters for persisting a booking after its seat has been claimed.
#[derive(Debug, Clone)]
pub struct NewBookingParams {
    pub account_id: i32,
    pub patient_id: i32,
    pub slot_id: i32,
    pub booking_date: NaiveDate,
    pub allocation: TokenAllocation,
    pub payment_id: Option<i32>,
}

/// Parameters for cancelling a single booking.
#[derive(Debug, Clone, Copy)]
pub struct CancelBookingParams {
    pub booking_id: i32,
    pub account_id: i32,
    pub is_admin: bool,
}

impl CancelBookingParams {
    pub fn from_account(account: &entity::account::Model, booking_id: i32) -> Self {
        Self {
            booking_id,
            account_id: account.id,
            is_admin: account.role == AccountRole::Admin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaginatedBookings {
    pub bookings: Vec<Booking>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl PaginatedBookings {
    pub fn into_dto(self) -> PaginatedBookingsDto {
        PaginatedBookingsDto {
            bookings: self.bookings.into_iter().map(Booking::into_dto).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingStats {
    pub total: u64,
    pub confirmed: u64,
    pub cancelled: u64,
    pub completed: u64,
    pub recent: u64,
}

impl BookingStats {
    pub fn into_dto(self) -> BookingStatsDto {
        BookingStatsDto {
            total: self.total,
            confirmed: self.confirmed,
            cancelled: self.cancelled,
            completed: self.completed,
            recent: self.recent,
        }
    }
}
