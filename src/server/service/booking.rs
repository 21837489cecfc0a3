use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};

use crate::server::{
    data::{
        booking::BookingRepository, patient::PatientRepository, slot::SlotRepository,
    },
    error::{booking::BookingError, AppError},
    model::{
        booking::{Booking, BookingStats, NewBookingParams, PaginatedBookings, Requester},
        slot::{SeatClaim, Slot},
    },
    util::token,
};

/// Extra insert attempts when a concurrent booking took the chosen token number.
const TOKEN_RETRIES: u32 = 2;

/// Largest page size accepted by `get_paginated`.
pub const MAX_PER_PAGE: u64 = 100;

pub struct BookingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BookingService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Books a seat on a slot for the requester's effective patient.
    ///
    /// # Arguments
    /// - `requester` - Patient booking for themselves, or admin booking for a named patient
    /// - `slot_id` - Slot to book
    ///
    /// # Returns
    /// - `Ok(Booking)` - Confirmed booking with token and appointment window
    /// - `Err(AppError::BookingErr)` - Patient or slot missing, slot inactive or full,
    ///   or the patient already holds a booking on the slot
    pub async fn create(&self, requester: Requester, slot_id: i32) -> Result<Booking, AppError> {
        let patient = self.resolve_patient(requester).await?;

        self.reserve(requester.account_id(), &patient, slot_id, None)
            .await
    }

    /// Resolves the patient profile a requester books for.
    ///
    /// Patients map to the profile linked to their account. Admins name the patient, whose
    /// existence is verified here, before any seat is claimed.
    pub async fn resolve_patient(
        &self,
        requester: Requester,
    ) -> Result<entity::patient::Model, AppError> {
        let repo = PatientRepository::new(self.db);

        let patient = match requester {
            Requester::Patient { account_id } => repo
                .find_by_account_id(account_id)
                .await?
                .ok_or(BookingError::PatientProfileMissing(account_id))?,
            Requester::Admin { patient_id, .. } => repo
                .find_by_id(patient_id)
                .await?
                .ok_or(BookingError::PatientNotFound(patient_id))?,
        };

        Ok(patient)
    }

    /// Claims a seat and persists the booking, releasing the seat if persisting fails.
    ///
    /// The availability and duplicate checks up front only fail fast; capacity is enforced
    /// by the ledger's conditional increment and duplicates by the active-booking unique
    /// index. The token number is the seat count the claim produced, or the lowest number
    /// a cancelled booking freed when a live booking already holds that count.
    ///
    /// # Arguments
    /// - `account_id` - Account recorded as having made the booking
    /// - `patient` - Patient the booking is for
    /// - `slot_id` - Slot to book
    /// - `payment_id` - Payment that paid for the booking, if any
    pub async fn reserve(
        &self,
        account_id: i32,
        patient: &entity::patient::Model,
        slot_id: i32,
        payment_id: Option<i32>,
    ) -> Result<Booking, AppError> {
        let slot_repo = SlotRepository::new(self.db);
        let booking_repo = BookingRepository::new(self.db);

        let slot = slot_repo
            .find_by_id(slot_id)
            .await?
            .ok_or(BookingError::SlotNotFound(slot_id))?;
        let slot = Slot::from_entity(slot)?;
        slot.ensure_bookable()?;

        if booking_repo.find_active(patient.id, slot_id).await?.is_some() {
            return Err(BookingError::DuplicateBooking {
                patient_id: patient.id,
                slot_id,
            }
            .into());
        }

        let claimed = match slot_repo.try_reserve_seat(slot_id).await? {
            SeatClaim::Claimed(claimed) => claimed,
            SeatClaim::Rejected(reason) => return Err(reason.into_error(slot_id).into()),
        };

        let mut token_number = match self.pick_token_number(slot_id, claimed.booked_seats).await {
            Ok(token_number) => token_number,
            Err(err) => {
                self.release_claimed_seat(slot_id).await;
                return Err(err.into());
            }
        };
        let mut retries = 0;

        loop {
            let params = NewBookingParams {
                account_id,
                patient_id: patient.id,
                slot_id,
                booking_date: claimed.date,
                allocation: token::allocate(
                    slot.start_time,
                    slot.end_time,
                    claimed.max_seats,
                    token_number,
                ),
                payment_id,
            };

            let err = match booking_repo.create(params).await {
                Ok(booking) => {
                    tracing::info!(
                        "Booked {} on slot {} for patient {}",
                        booking.token_id,
                        slot_id,
                        patient.id
                    );

                    return Ok(Booking::from_entity(booking));
                }
                Err(err) => err,
            };

            if is_token_collision(&err) && retries < TOKEN_RETRIES {
                retries += 1;
                tracing::warn!(
                    "Token {} on slot {} taken concurrently, picking another",
                    token_number,
                    slot_id
                );

                match self.pick_token_number(slot_id, claimed.booked_seats).await {
                    Ok(next) => {
                        token_number = next;
                        continue;
                    }
                    Err(pick_err) => {
                        self.release_claimed_seat(slot_id).await;
                        return Err(pick_err.into());
                    }
                }
            }

            self.release_claimed_seat(slot_id).await;

            return match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) if !is_token_collision(&err) => {
                    Err(BookingError::DuplicateBooking {
                        patient_id: patient.id,
                        slot_id,
                    }
                    .into())
                }
                _ => Err(err.into()),
            };
        }
    }

    /// Chooses a token number no live booking on the slot holds.
    async fn pick_token_number(&self, slot_id: i32, booked_seats: i32) -> Result<i32, DbErr> {
        let taken = BookingRepository::new(self.db)
            .live_token_numbers(slot_id)
            .await?;

        Ok(token::next_token_number(booked_seats, &taken))
    }

    /// Compensates a seat claim whose booking could not be persisted.
    ///
    /// Failure here is logged and not propagated; the seat stays counted with no booking.
    async fn release_claimed_seat(&self, slot_id: i32) {
        tracing::warn!("Releasing seat on slot {} after failed booking insert", slot_id);

        match SlotRepository::new(self.db).release_seat(slot_id).await {
            Ok(true) => {}
            Ok(false) => tracing::error!(
                "Seat release on slot {} matched no seat, counter may be inconsistent",
                slot_id
            ),
            Err(e) => tracing::error!("Failed to release seat on slot {}: {}", slot_id, e),
        }
    }

    /// Gets bookings made by an account, newest first
    pub async fn get_by_account(&self, account_id: i32) -> Result<Vec<Booking>, AppError> {
        let bookings = BookingRepository::new(self.db)
            .get_by_account(account_id)
            .await?;

        Ok(bookings.into_iter().map(Booking::from_entity).collect())
    }

    /// Gets bookings of a patient, latest booking date first
    pub async fn get_by_patient(&self, patient_id: i32) -> Result<Vec<Booking>, AppError> {
        PatientRepository::new(self.db)
            .find_by_id(patient_id)
            .await?
            .ok_or(BookingError::PatientNotFound(patient_id))?;

        let bookings = BookingRepository::new(self.db)
            .get_by_patient(patient_id)
            .await?;

        Ok(bookings.into_iter().map(Booking::from_entity).collect())
    }

    /// Gets a page of all bookings, newest first
    pub async fn get_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedBookings, AppError> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);

        let (bookings, total) = BookingRepository::new(self.db)
            .get_paginated(page, per_page)
            .await?;

        Ok(PaginatedBookings {
            bookings: bookings.into_iter().map(Booking::from_entity).collect(),
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        })
    }

    /// Counts bookings by status plus those created in the last seven days
    pub async fn stats(&self) -> Result<BookingStats, AppError> {
        let since = Utc::now() - Duration::days(7);

        Ok(BookingRepository::new(self.db).stats(since).await?)
    }
}

/// Whether an insert failed on the live token uniqueness index rather than the
/// one-booking-per-patient index.
fn is_token_collision(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("token")
    )
}
