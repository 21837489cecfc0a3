use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

mod payment;
mod slot;

/// Reads the current booked seat counter of a slot
async fn booked_seats(db: &DatabaseConnection, slot_id: i32) -> Result<i32, DbErr> {
    let slot = entity::prelude::Slot::find_by_id(slot_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("slot {}", slot_id)))?;
    Ok(slot.booked_seats)
}
