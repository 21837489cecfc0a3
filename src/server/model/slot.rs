//! Slot domain models and parameters.
//!
//! A slot is a dated time window with a fixed number of seats. Its `booked_seats` counter
//! is the only shared mutable state in the booking core and is changed exclusively through
//! the conditional updates in `SlotRepository`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DbErr;

use crate::{
    model::slot::{CreateSlotDto, SlotDto},
    server::{
        error::booking::BookingError,
        util::token::{self, TimeOfDay},
    },
};

/// Default price in minor currency units when an admin does not set one.
pub const DEFAULT_SLOT_PRICE: i64 = 1000;
pub const DEFAULT_CURRENCY: &str = "INR";
pub const MAX_SEATS_LIMIT: i32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: i32,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub max_seats: i32,
    pub booked_seats: i32,
    pub price: i64,
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Slot {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(Slot)` - Successfully converted domain model
    /// - `Err(DbErr::Custom)` - Stored start or end time is not "HH:MM"
    pub fn from_entity(entity: entity::slot::Model) -> Result<Self, DbErr> {
        let parse = |value: &str| {
            TimeOfDay::parse(value)
                .map_err(|e| DbErr::Custom(format!("Slot {} has {}", entity.id, e)))
        };

        Ok(Self {
            id: entity.id,
            date: entity.date,
            start_time: parse(&entity.start_time)?,
            end_time: parse(&entity.end_time)?,
            max_seats: entity.max_seats,
            booked_seats: entity.booked_seats,
            price: entity.price,
            currency: entity.currency,
            is_active: entity.is_active,
            created_at: entity.created_at,
        })
    }

    pub fn available_seats(&self) -> i32 {
        (self.max_seats - self.booked_seats).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.booked_seats >= self.max_seats
    }

    pub fn minutes_per_patient(&self) -> i32 {
        token::minutes_per_patient(self.start_time, self.end_time, self.max_seats)
    }

    /// Non-atomic availability check used to fail fast before claiming a seat.
    ///
    /// Passing this check does not reserve anything; the ledger's conditional increment
    /// remains the authority on capacity.
    pub fn ensure_bookable(&self) -> Result<(), BookingError> {
        if !self.is_active {
            return Err(BookingError::SlotInactive(self.id));
        }
        if self.is_full() {
            return Err(BookingError::SlotFull(self.id));
        }
        Ok(())
    }

    /// "YYYY-MM-DD HH:MM-HH:MM", used in gateway order notes and logs.
    pub fn label(&self) -> String {
        format!("{} {}-{}", self.date, self.start_time, self.end_time)
    }

    pub fn into_dto(self) -> SlotDto {
        SlotDto {
            id: self.id,
            date: self.date,
            start_time: self.start_time.to_string(),
            end_time: self.end_time.to_string(),
            max_seats: self.max_seats,
            booked_seats: self.booked_seats,
            available_seats: self.available_seats(),
            minutes_per_patient: self.minutes_per_patient(),
            price: self.price,
            currency: self.currency,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

/// Why the ledger refused to claim a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatRejection {
    Missing,
    Inactive,
    Full,
}

impl SeatRejection {
    pub fn into_error(self, slot_id: i32) -> BookingError {
        match self {
            Self::Missing => BookingError::SlotNotFound(slot_id),
            Self::Inactive => BookingError::SlotInactive(slot_id),
            Self::Full => BookingError::SlotFull(slot_id),
        }
    }
}

/// Outcome of an atomic seat claim.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatClaim {
    /// Seat claimed; carries the slot as it was right after the increment, so
    /// `booked_seats` is the claimant's token number.
    Claimed(entity::slot::Model),
    Rejected(SeatRejection),
}

/// Validated parameters for creating a slot.
#[derive(Debug, Clone)]
pub struct CreateSlotParams {
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub max_seats: i32,
    pub price: i64,
    pub currency: String,
    pub is_active: bool,
}

impl CreateSlotParams {
    /// Validates a slot creation request.
    ///
    /// Collects every failing field rather than stopping at the first one.
    ///
    /// # Arguments
    /// - `dto` - Request body
    /// - `today` - Current date; slots may not be created in the past
    ///
    /// # Returns
    /// - `Ok(CreateSlotParams)` - Request is valid
    /// - `Err(Vec<String>)` - One message per invalid field
    pub fn from_dto(dto: CreateSlotDto, today: NaiveDate) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        let start_time = TimeOfDay::parse(&dto.start_time)
            .map_err(|e| errors.push(format!("start_time: {}", e)))
            .ok();
        let end_time = TimeOfDay::parse(&dto.end_time)
            .map_err(|e| errors.push(format!("end_time: {}", e)))
            .ok();

        if dto.date < today {
            errors.push("date: cannot be in the past".to_string());
        }
        if !(1..=MAX_SEATS_LIMIT).contains(&dto.max_seats) {
            errors.push(format!(
                "max_seats: must be between 1 and {}",
                MAX_SEATS_LIMIT
            ));
        }
        if let Some(price) = dto.price {
            if price < 0 {
                errors.push("price: cannot be negative".to_string());
            }
        }

        let currency = dto
            .currency
            .map(|c| c.trim().to_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.push("currency: must be a three letter ISO code".to_string());
        }

        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end <= start {
                errors.push("end_time: must be after start_time".to_string());
            } else if (1..=MAX_SEATS_LIMIT).contains(&dto.max_seats)
                && token::minutes_per_patient(start, end, dto.max_seats) == 0
            {
                errors.push(
                    "max_seats: more seats than minutes in the slot, each patient would get a zero-minute window"
                        .to_string(),
                );
            }
        }

        match (start_time, end_time) {
            (Some(start_time), Some(end_time)) if errors.is_empty() => Ok(Self {
                date: dto.date,
                start_time,
                end_time,
                max_seats: dto.max_seats,
                price: dto.price.unwrap_or(DEFAULT_SLOT_PRICE),
                currency,
                is_active: dto.is_active.unwrap_or(true),
            }),
            _ => Err(errors),
        }
    }
}
