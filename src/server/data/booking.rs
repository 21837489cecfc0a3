use chrono::{DateTime, NaiveDate, Utc};
use entity::sea_orm_active_enums::BookingStatus;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::server::model::booking::{BookingStats, NewBookingParams};

pub struct BookingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BookingRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a confirmed booking.
    ///
    /// Fails with a unique constraint violation when the patient already holds a
    /// non-cancelled booking for the slot, or when a live booking holds the token number.
    pub async fn create(&self, params: NewBookingParams) -> Result<entity::booking::Model, DbErr> {
        entity::booking::ActiveModel {
            account_id: ActiveValue::Set(params.account_id),
            patient_id: ActiveValue::Set(params.patient_id),
            slot_id: ActiveValue::Set(params.slot_id),
            booking_date: ActiveValue::Set(params.booking_date),
            status: ActiveValue::Set(BookingStatus::Confirmed),
            token_number: ActiveValue::Set(params.allocation.token_number),
            token_id: ActiveValue::Set(params.allocation.token_id),
            appointment_time: ActiveValue::Set(params.allocation.appointment_time.to_string()),
            appointment_end_time: ActiveValue::Set(
                params.allocation.appointment_end_time.to_string(),
            ),
            payment_id: ActiveValue::Set(params.payment_id),
            cancelled_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Finds a booking by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::booking::Model>, DbErr> {
        entity::prelude::Booking::find_by_id(id).one(self.db).await
    }

    /// Finds the patient's non-cancelled booking for a slot, if any
    pub async fn find_active(
        &self,
        patient_id: i32,
        slot_id: i32,
    ) -> Result<Option<entity::booking::Model>, DbErr> {
        entity::prelude::Booking::find()
            .filter(entity::booking::Column::PatientId.eq(patient_id))
            .filter(entity::booking::Column::SlotId.eq(slot_id))
            .filter(entity::booking::Column::Status.ne(BookingStatus::Cancelled))
            .one(self.db)
            .await
    }

    /// Gets the token numbers held by non-cancelled bookings on a slot
    pub async fn live_token_numbers(&self, slot_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::Booking::find()
            .select_only()
            .column(entity::booking::Column::TokenNumber)
            .filter(entity::booking::Column::SlotId.eq(slot_id))
            .filter(entity::booking::Column::Status.ne(BookingStatus::Cancelled))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Marks a booking cancelled unless it already is.
    ///
    /// The status check is part of the UPDATE, so two concurrent cancellations of the same
    /// booking cannot both succeed.
    ///
    /// # Returns
    /// - `Ok(true)` - Booking transitioned to cancelled
    /// - `Ok(false)` - Booking missing or already cancelled
    pub async fn mark_cancelled(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Booking::update_many()
            .set(cancelled_update(Utc::now()))
            .filter(entity::booking::Column::Id.eq(id))
            .filter(entity::booking::Column::Status.ne(BookingStatus::Cancelled))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Cancels every confirmed booking of a patient dated on or after `from_date`.
    ///
    /// Selection and status update run in one transaction. Seat counters are not touched;
    /// the caller releases the returned bookings' seats.
    ///
    /// # Returns
    /// - `Ok(Vec<Model>)` - Bookings that were cancelled, as they were before cancellation
    pub async fn cancel_future_for_patient(
        &self,
        patient_id: i32,
        from_date: NaiveDate,
    ) -> Result<Vec<entity::booking::Model>, DbErr> {
        let txn = self.db.begin().await?;

        let bookings = entity::prelude::Booking::find()
            .filter(entity::booking::Column::PatientId.eq(patient_id))
            .filter(entity::booking::Column::Status.eq(BookingStatus::Confirmed))
            .filter(entity::booking::Column::BookingDate.gte(from_date))
            .all(&txn)
            .await?;

        if !bookings.is_empty() {
            let ids: Vec<i32> = bookings.iter().map(|b| b.id).collect();

            entity::prelude::Booking::update_many()
                .set(cancelled_update(Utc::now()))
                .filter(entity::booking::Column::Id.is_in(ids))
                .filter(entity::booking::Column::Status.eq(BookingStatus::Confirmed))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        Ok(bookings)
    }

    /// Gets bookings made by an account, newest first
    pub async fn get_by_account(
        &self,
        account_id: i32,
    ) -> Result<Vec<entity::booking::Model>, DbErr> {
        entity::prelude::Booking::find()
            .filter(entity::booking::Column::AccountId.eq(account_id))
            .order_by_desc(entity::booking::Column::CreatedAt)
            .order_by_desc(entity::booking::Column::Id)
            .all(self.db)
            .await
    }

    /// Gets bookings of a patient, latest booking date first
    pub async fn get_by_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<entity::booking::Model>, DbErr> {
        entity::prelude::Booking::find()
            .filter(entity::booking::Column::PatientId.eq(patient_id))
            .order_by_desc(entity::booking::Column::BookingDate)
            .order_by_desc(entity::booking::Column::Id)
            .all(self.db)
            .await
    }

    /// Gets non-cancelled bookings of a slot, newest first
    pub async fn get_active_by_slot(
        &self,
        slot_id: i32,
    ) -> Result<Vec<entity::booking::Model>, DbErr> {
        entity::prelude::Booking::find()
            .filter(entity::booking::Column::SlotId.eq(slot_id))
            .filter(entity::booking::Column::Status.ne(BookingStatus::Cancelled))
            .order_by_desc(entity::booking::Column::CreatedAt)
            .order_by_desc(entity::booking::Column::Id)
            .all(self.db)
            .await
    }

    /// Gets a page of all bookings, newest first, together with the total count
    pub async fn get_paginated(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::booking::Model>, u64), DbErr> {
        let paginator = entity::prelude::Booking::find()
            .order_by_desc(entity::booking::Column::CreatedAt)
            .order_by_desc(entity::booking::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let bookings = paginator.fetch_page(page).await?;

        Ok((bookings, total))
    }

    /// Counts bookings by status and those created since `recent_since`
    pub async fn stats(&self, recent_since: DateTime<Utc>) -> Result<BookingStats, DbErr> {
        let count_status = |status: BookingStatus| {
            entity::prelude::Booking::find()
                .filter(entity::booking::Column::Status.eq(status))
                .count(self.db)
        };

        Ok(BookingStats {
            total: entity::prelude::Booking::find().count(self.db).await?,
            confirmed: count_status(BookingStatus::Confirmed).await?,
            cancelled: count_status(BookingStatus::Cancelled).await?,
            completed: count_status(BookingStatus::Completed).await?,
            recent: entity::prelude::Booking::find()
                .filter(entity::booking::Column::CreatedAt.gte(recent_since))
                .count(self.db)
                .await?,
        })
    }
}

fn cancelled_update(at: DateTime<Utc>) -> entity::booking::ActiveModel {
    entity::booking::ActiveModel {
        status: ActiveValue::Set(BookingStatus::Cancelled),
        cancelled_at: ActiveValue::Set(Some(at)),
        ..Default::default()
    }
}
