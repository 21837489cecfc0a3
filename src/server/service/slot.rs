use sea_orm::{DatabaseConnection, SqlErr};

use crate::server::{
    data::{booking::BookingRepository, slot::SlotRepository},
    error::{booking::BookingError, AppError},
    model::{
        booking::Booking,
        slot::{CreateSlotParams, Slot},
    },
};

pub struct SlotService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SlotService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a slot, rejecting a second slot with the same date and time range
    pub async fn create(&self, params: CreateSlotParams) -> Result<Slot, AppError> {
        let repo = SlotRepository::new(self.db);

        let start_time = params.start_time.to_string();
        let end_time = params.end_time.to_string();
        if repo
            .exists_with_range(params.date, &start_time, &end_time)
            .await?
        {
            return Err(slot_exists());
        }

        let slot = match repo.create(params).await {
            Ok(slot) => slot,
            Err(err) => {
                return match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => Err(slot_exists()),
                    _ => Err(err.into()),
                }
            }
        };

        tracing::info!(
            "Created slot {} on {} {}-{} with {} seats",
            slot.id,
            slot.date,
            slot.start_time,
            slot.end_time,
            slot.max_seats
        );

        Ok(Slot::from_entity(slot)?)
    }

    /// Gets active slots that still have free seats
    pub async fn get_available(&self) -> Result<Vec<Slot>, AppError> {
        let slots = SlotRepository::new(self.db).get_available().await?;

        Ok(slots
            .into_iter()
            .map(Slot::from_entity)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Gets a slot together with its non-cancelled bookings
    pub async fn get_with_bookings(&self, slot_id: i32) -> Result<(Slot, Vec<Booking>), AppError> {
        let slot = SlotRepository::new(self.db)
            .find_by_id(slot_id)
            .await?
            .ok_or(BookingError::SlotNotFound(slot_id))?;

        let bookings = BookingRepository::new(self.db)
            .get_active_by_slot(slot_id)
            .await?;

        Ok((
            Slot::from_entity(slot)?,
            bookings.into_iter().map(Booking::from_entity).collect(),
        ))
    }
}

fn slot_exists() -> AppError {
    AppError::Conflict("A slot with the same date and time range already exists".to_string())
}
