use std::collections::BTreeMap;

use chrono::NaiveDate;
use entity::sea_orm_active_enums::BookingStatus;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{booking::BookingRepository, patient::PatientRepository, slot::SlotRepository},
    error::{booking::BookingError, AppError},
    model::booking::{Booking, CancelBookingParams},
};

/// Cancels bookings and returns their seats to the slot ledger.
pub struct CancellationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CancellationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Cancels one booking on behalf of an admin or the account that made it.
    ///
    /// # Returns
    /// - `Ok(Booking)` - The booking, now cancelled
    /// - `Err(BookingError::BookingNotFound)` - No such booking
    /// - `Err(BookingError::NotBookingOwner)` - Caller is not an admin nor the booking's account
    /// - `Err(BookingError::AlreadyCancelled)` - Booking was already cancelled; no seat is released
    pub async fn cancel(&self, params: CancelBookingParams) -> Result<Booking, AppError> {
        let repo = BookingRepository::new(self.db);

        let booking = repo
            .find_by_id(params.booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(params.booking_id))?;

        if !params.is_admin && booking.account_id != params.account_id {
            return Err(BookingError::NotBookingOwner {
                account_id: params.account_id,
                booking_id: booking.id,
            }
            .into());
        }

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled(booking.id).into());
        }

        self.cancel_and_release(booking.id)
            .await?
            .ok_or_else(|| BookingError::AlreadyCancelled(booking.id).into())
    }

    /// Cancels a booking without an ownership check, used when its payment is refunded.
    ///
    /// # Returns
    /// - `Ok(Some(Booking))` - Booking cancelled and seat released
    /// - `Ok(None)` - Booking missing or already cancelled
    pub async fn cancel_for_refund(&self, booking_id: i32) -> Result<Option<Booking>, AppError> {
        self.cancel_and_release(booking_id).await
    }

    /// Transitions a booking to cancelled and, only if this call made the transition,
    /// releases its seat.
    async fn cancel_and_release(&self, booking_id: i32) -> Result<Option<Booking>, AppError> {
        let repo = BookingRepository::new(self.db);

        if !repo.mark_cancelled(booking_id).await? {
            return Ok(None);
        }

        let booking = repo
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        if !SlotRepository::new(self.db)
            .release_seat(booking.slot_id)
            .await?
        {
            tracing::warn!(
                "Cancelled booking {} but slot {} had no seat to release",
                booking.id,
                booking.slot_id
            );
        }

        tracing::info!("Cancelled booking {} on slot {}", booking.id, booking.slot_id);

        Ok(Some(Booking::from_entity(booking)))
    }

    /// Cancels every confirmed booking of a patient dated `from_date` or later.
    ///
    /// Booking status changes are authoritative. Seats are then released in one batch per
    /// affected slot; if that batch fails the error is logged and the bookings stay
    /// cancelled.
    ///
    /// # Returns
    /// - `Ok(Vec<i32>)` - IDs of the bookings that were cancelled
    /// - `Err(BookingError::PatientNotFound)` - No such patient
    pub async fn cancel_future_for_patient(
        &self,
        patient_id: i32,
        from_date: NaiveDate,
    ) -> Result<Vec<i32>, AppError> {
        PatientRepository::new(self.db)
            .find_by_id(patient_id)
            .await?
            .ok_or(BookingError::PatientNotFound(patient_id))?;

        let cancelled = BookingRepository::new(self.db)
            .cancel_future_for_patient(patient_id, from_date)
            .await?;

        if cancelled.is_empty() {
            return Ok(Vec::new());
        }

        let mut per_slot: BTreeMap<i32, i32> = BTreeMap::new();
        for booking in &cancelled {
            *per_slot.entry(booking.slot_id).or_default() += 1;
        }
        let releases: Vec<(i32, i32)> = per_slot.into_iter().collect();

        if let Err(e) = SlotRepository::new(self.db).release_seats(&releases).await {
            tracing::error!(
                "Cancelled {} bookings of patient {} but failed to release their seats: {}",
                cancelled.len(),
                patient_id,
                e
            );
        }

        tracing::info!(
            "Cancelled {} future bookings of patient {}",
            cancelled.len(),
            patient_id
        );

        Ok(cancelled.into_iter().map(|booking| booking.id).collect())
    }
}
