use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::server::model::slot::{CreateSlotParams, SeatClaim, SeatRejection};

pub struct SlotRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SlotRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new slot with no seats booked
    pub async fn create(&self, params: CreateSlotParams) -> Result<entity::slot::Model, DbErr> {
        entity::slot::ActiveModel {
            date: ActiveValue::Set(params.date),
            start_time: ActiveValue::Set(params.start_time.to_string()),
            end_time: ActiveValue::Set(params.end_time.to_string()),
            max_seats: ActiveValue::Set(params.max_seats),
            booked_seats: ActiveValue::Set(0),
            price: ActiveValue::Set(params.price),
            currency: ActiveValue::Set(params.currency),
            is_active: ActiveValue::Set(params.is_active),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Finds a slot by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::slot::Model>, DbErr> {
        entity::prelude::Slot::find_by_id(id).one(self.db).await
    }

    /// Checks whether a slot already covers exactly this date and time range
    pub async fn exists_with_range(
        &self,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
    ) -> Result<bool, DbErr> {
        let slot = entity::prelude::Slot::find()
            .filter(entity::slot::Column::Date.eq(date))
            .filter(entity::slot::Column::StartTime.eq(start_time))
            .filter(entity::slot::Column::EndTime.eq(end_time))
            .one(self.db)
            .await?;

        Ok(slot.is_some())
    }

    /// Gets active slots with at least one free seat, ordered by date then start time
    pub async fn get_available(&self) -> Result<Vec<entity::slot::Model>, DbErr> {
        entity::prelude::Slot::find()
            .filter(entity::slot::Column::IsActive.eq(true))
            .filter(Expr::cust("booked_seats < max_seats"))
            .order_by_asc(entity::slot::Column::Date)
            .order_by_asc(entity::slot::Column::StartTime)
            .all(self.db)
            .await
    }

    /// Atomically claims one seat on an active slot that still has capacity.
    ///
    /// The capacity check and the increment are a single conditional UPDATE; the slot is
    /// re-read inside the same transaction so the returned `booked_seats` is the value this
    /// claim produced. When nothing was updated the slot is inspected only to report why.
    ///
    /// # Returns
    /// - `Ok(SeatClaim::Claimed(slot))` - Seat claimed, `slot.booked_seats` is the new count
    /// - `Ok(SeatClaim::Rejected(reason))` - Slot missing, inactive or full
    /// - `Err(DbErr)` - Database error; no seat was claimed
    pub async fn try_reserve_seat(&self, slot_id: i32) -> Result<SeatClaim, DbErr> {
        let txn = self.db.begin().await?;

        let result = entity::prelude::Slot::update_many()
            .col_expr(
                entity::slot::Column::BookedSeats,
                Expr::cust("booked_seats + 1"),
            )
            .filter(entity::slot::Column::Id.eq(slot_id))
            .filter(entity::slot::Column::IsActive.eq(true))
            .filter(Expr::cust("booked_seats < max_seats"))
            .exec(&txn)
            .await?;

        let slot = entity::prelude::Slot::find_by_id(slot_id).one(&txn).await?;

        txn.commit().await?;

        if result.rows_affected == 1 {
            return slot.map(SeatClaim::Claimed).ok_or_else(|| {
                DbErr::RecordNotFound(format!("Slot {} vanished after seat claim", slot_id))
            });
        }

        let rejection = match slot {
            None => SeatRejection::Missing,
            Some(slot) if !slot.is_active => SeatRejection::Inactive,
            Some(_) => SeatRejection::Full,
        };

        Ok(SeatClaim::Rejected(rejection))
    }

    /// Atomically returns one seat to a slot.
    ///
    /// Guarded on `booked_seats > 0`, so a repeated release never drives the counter negative.
    ///
    /// # Returns
    /// - `Ok(true)` - A seat was released
    /// - `Ok(false)` - Slot missing or already at zero
    pub async fn release_seat(&self, slot_id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Slot::update_many()
            .col_expr(
                entity::slot::Column::BookedSeats,
                Expr::cust("booked_seats - 1"),
            )
            .filter(entity::slot::Column::Id.eq(slot_id))
            .filter(entity::slot::Column::BookedSeats.gt(0))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Returns several seats per slot in one transaction.
    ///
    /// Each slot is decremented by its count, floored at zero.
    ///
    /// # Arguments
    /// - `releases` - Pairs of slot ID and number of seats to return
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of slots updated
    pub async fn release_seats(&self, releases: &[(i32, i32)]) -> Result<u64, DbErr> {
        let txn = self.db.begin().await?;
        let mut updated = 0;

        for &(slot_id, count) in releases.iter().filter(|(_, count)| *count > 0) {
            let result = entity::prelude::Slot::update_many()
                .col_expr(
                    entity::slot::Column::BookedSeats,
                    Expr::cust(format!(
                        "CASE WHEN booked_seats >= {count} THEN booked_seats - {count} ELSE 0 END"
                    )),
                )
                .filter(entity::slot::Column::Id.eq(slot_id))
                .filter(entity::slot::Column::BookedSeats.gt(0))
                .exec(&txn)
                .await?;

            updated += result.rows_affected;
        }

        txn.commit().await?;

        Ok(updated)
    }
}
