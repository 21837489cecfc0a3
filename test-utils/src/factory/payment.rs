//! Payment factory for creating test payment entities.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{PaymentStatus, RefundStatus};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Factory for creating test payments with customizable fields.
///
/// Defaults to a pending payment for the slot's full price with a unique gateway order id.
pub struct PaymentFactory<'a> {
    db: &'a DatabaseConnection,
    account_id: i32,
    slot_id: i32,
    booking_id: Option<i32>,
    amount: i64,
    currency: String,
    order_id: String,
    gateway_payment_id: Option<String>,
    status: PaymentStatus,
    refund_status: RefundStatus,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl<'a> PaymentFactory<'a> {
    /// Creates a new PaymentFactory for the given account and slot.
    ///
    /// Defaults:
    /// - amount / currency: the slot's price and currency
    /// - order_id: `"order_test{id}"`
    /// - status: `PaymentStatus::Pending`, refund_status: `RefundStatus::None`
    /// - created_at: now
    pub fn new(
        db: &'a DatabaseConnection,
        account_id: i32,
        slot: &entity::slot::Model,
    ) -> Self {
        Self {
            db,
            account_id,
            slot_id: slot.id,
            booking_id: None,
            amount: slot.price,
            currency: slot.currency.clone(),
            order_id: format!("order_test{}", next_id()),
            gateway_payment_id: None,
            status: PaymentStatus::Pending,
            refund_status: RefundStatus::None,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the gateway order id.
    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = order_id.into();
        self
    }

    /// Sets the payment status. Succeeded payments get a gateway payment id and paid timestamp.
    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        if status == PaymentStatus::Succeeded {
            self.gateway_payment_id = Some(format!("pay_test{}", next_id()));
            self.paid_at = Some(Utc::now());
        }
        self
    }

    /// Sets the refund status.
    pub fn refund_status(mut self, refund_status: RefundStatus) -> Self {
        self.refund_status = refund_status;
        self
    }

    /// Links the payment to the booking it produced.
    pub fn booking_id(mut self, booking_id: Option<i32>) -> Self {
        self.booking_id = booking_id;
        self
    }

    /// Sets the creation timestamp, used to age payments for expiry tests.
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the payment entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::payment::Model)` - Created payment entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::payment::Model, DbErr> {
        entity::payment::ActiveModel {
            id: ActiveValue::NotSet,
            account_id: ActiveValue::Set(self.account_id),
            slot_id: ActiveValue::Set(self.slot_id),
            booking_id: ActiveValue::Set(self.booking_id),
            amount: ActiveValue::Set(self.amount),
            currency: ActiveValue::Set(self.currency),
            order_id: ActiveValue::Set(self.order_id),
            gateway_payment_id: ActiveValue::Set(self.gateway_payment_id),
            signature: ActiveValue::Set(None),
            status: ActiveValue::Set(self.status),
            refund_status: ActiveValue::Set(self.refund_status),
            refund_id: ActiveValue::Set(None),
            refund_amount: ActiveValue::Set(None),
            paid_at: ActiveValue::Set(self.paid_at),
            refunded_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(self.created_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a pending payment by the account for the slot.
pub async fn create_payment(
    db: &DatabaseConnection,
    account: &entity::account::Model,
    slot: &entity::slot::Model,
) -> Result<entity::payment::Model, DbErr> {
    PaymentFactory::new(db, account.id, slot).build().await
}
