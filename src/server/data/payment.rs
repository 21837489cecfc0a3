use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{PaymentStatus, RefundStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::server::model::payment::NewPaymentParams;

pub struct PaymentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PaymentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a pending payment for a freshly created gateway order
    pub async fn create(&self, params: NewPaymentParams) -> Result<entity::payment::Model, DbErr> {
        entity::payment::ActiveModel {
            account_id: ActiveValue::Set(params.account_id),
            slot_id: ActiveValue::Set(params.slot_id),
            booking_id: ActiveValue::Set(None),
            amount: ActiveValue::Set(params.amount),
            currency: ActiveValue::Set(params.currency),
            order_id: ActiveValue::Set(params.order_id),
            gateway_payment_id: ActiveValue::Set(None),
            signature: ActiveValue::Set(None),
            status: ActiveValue::Set(PaymentStatus::Pending),
            refund_status: ActiveValue::Set(RefundStatus::None),
            refund_id: ActiveValue::Set(None),
            refund_amount: ActiveValue::Set(None),
            paid_at: ActiveValue::Set(None),
            refunded_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Finds a payment by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::payment::Model>, DbErr> {
        entity::prelude::Payment::find_by_id(id).one(self.db).await
    }

    /// Finds a payment by its gateway order id
    pub async fn find_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<entity::payment::Model>, DbErr> {
        entity::prelude::Payment::find()
            .filter(entity::payment::Column::OrderId.eq(order_id))
            .one(self.db)
            .await
    }

    /// Marks a payment succeeded unless it already is.
    ///
    /// Conditional on the current status so that only one of two racing verifications of
    /// the same order proceeds to booking.
    ///
    /// # Returns
    /// - `Ok(Some(model))` - Payment transitioned to succeeded
    /// - `Ok(None)` - Payment missing or already succeeded
    pub async fn mark_succeeded(
        &self,
        id: i32,
        gateway_payment_id: &str,
        signature: &str,
    ) -> Result<Option<entity::payment::Model>, DbErr> {
        let result = entity::prelude::Payment::update_many()
            .set(entity::payment::ActiveModel {
                status: ActiveValue::Set(PaymentStatus::Succeeded),
                gateway_payment_id: ActiveValue::Set(Some(gateway_payment_id.to_string())),
                signature: ActiveValue::Set(Some(signature.to_string())),
                paid_at: ActiveValue::Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(entity::payment::Column::Id.eq(id))
            .filter(entity::payment::Column::Status.ne(PaymentStatus::Succeeded))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    /// Marks a payment failed after a signature mismatch
    pub async fn mark_failed(
        &self,
        id: i32,
        gateway_payment_id: &str,
        signature: &str,
    ) -> Result<(), DbErr> {
        entity::prelude::Payment::update_many()
            .set(entity::payment::ActiveModel {
                status: ActiveValue::Set(PaymentStatus::Failed),
                gateway_payment_id: ActiveValue::Set(Some(gateway_payment_id.to_string())),
                signature: ActiveValue::Set(Some(signature.to_string())),
                ..Default::default()
            })
            .filter(entity::payment::Column::Id.eq(id))
            .filter(entity::payment::Column::Status.ne(PaymentStatus::Succeeded))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Links a payment to the booking it produced
    pub async fn set_booking(
        &self,
        id: i32,
        booking_id: i32,
    ) -> Result<entity::payment::Model, DbErr> {
        entity::payment::ActiveModel {
            id: ActiveValue::Unchanged(id),
            booking_id: ActiveValue::Set(Some(booking_id)),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Records a completed gateway refund
    pub async fn mark_refunded(
        &self,
        id: i32,
        refund_id: String,
        refund_amount: i64,
    ) -> Result<entity::payment::Model, DbErr> {
        entity::payment::ActiveModel {
            id: ActiveValue::Unchanged(id),
            refund_status: ActiveValue::Set(RefundStatus::Refunded),
            refund_id: ActiveValue::Set(Some(refund_id)),
            refund_amount: ActiveValue::Set(Some(refund_amount)),
            refunded_at: ActiveValue::Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Moves a succeeded payment's refund status to pending unless a refund already ran.
    ///
    /// Conditional on the current refund status so that only one of two racing refunds of
    /// the same payment reaches the gateway.
    ///
    /// # Returns
    /// - `Ok(true)` - Refund claimed
    /// - `Ok(false)` - Payment missing, not succeeded, refunded or being refunded
    pub async fn claim_refund(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Payment::update_many()
            .set(entity::payment::ActiveModel {
                refund_status: ActiveValue::Set(RefundStatus::Pending),
                ..Default::default()
            })
            .filter(entity::payment::Column::Id.eq(id))
            .filter(entity::payment::Column::Status.eq(PaymentStatus::Succeeded))
            .filter(
                entity::payment::Column::RefundStatus
                    .is_in([RefundStatus::None, RefundStatus::Failed]),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Sets only the refund status, used to flag refunds in progress or failed
    pub async fn set_refund_status(
        &self,
        id: i32,
        refund_status: RefundStatus,
    ) -> Result<entity::payment::Model, DbErr> {
        entity::payment::ActiveModel {
            id: ActiveValue::Unchanged(id),
            refund_status: ActiveValue::Set(refund_status),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Cancels payments still pending that were created before `cutoff`
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of payments cancelled
    pub async fn expire_pending_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::Payment::update_many()
            .set(entity::payment::ActiveModel {
                status: ActiveValue::Set(PaymentStatus::Cancelled),
                ..Default::default()
            })
            .filter(entity::payment::Column::Status.eq(PaymentStatus::Pending))
            .filter(entity::payment::Column::CreatedAt.lt(cutoff))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Gets payments made by an account, newest first
    pub async fn get_by_account(
        &self,
        account_id: i32,
    ) -> Result<Vec<entity::payment::Model>, DbErr> {
        entity::prelude::Payment::find()
            .filter(entity::payment::Column::AccountId.eq(account_id))
            .order_by_desc(entity::payment::Column::CreatedAt)
            .order_by_desc(entity::payment::Column::Id)
            .all(self.db)
            .await
    }

    /// Gets all payments, newest first
    pub async fn get_all(&self) -> Result<Vec<entity::payment::Model>, DbErr> {
        entity::prelude::Payment::find()
            .order_by_desc(entity::payment::Column::CreatedAt)
            .order_by_desc(entity::payment::Column::Id)
            .all(self.db)
            .await
    }
}
