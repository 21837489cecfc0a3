use crate::server::{
    data::slot::SlotRepository,
    model::slot::{CreateSlotParams, SeatClaim, SeatRejection},
    util::token::TimeOfDay,
};
use chrono::{Duration, Utc};
use sea_orm::{DbErr, EntityTrait};
use test_utils::{builder::TestBuilder, factory};


/// Reads the current booked seat counter of a slot
async fn booked_seats(db: &sea_orm::DatabaseConnection, slot_id: i32) -> Result<i32, DbErr> {
    let slot = entity::prelude::Slot::find_by_id(slot_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("slot {}", slot_id)))?;
    Ok(slot.booked_seats)
}
