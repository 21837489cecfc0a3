//! Payment domain models and parameters.

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::{PaymentStatus, RefundStatus};

use crate::{
    model::payment::{
        PaymentDto, PaymentStatusDto, RefundResultDto, RefundStatusDto, VerifyPaymentDto,
        VerifyPaymentResultDto,
    },
    server::model::booking::Booking,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i32,
    pub account_id: i32,
    pub slot_id: i32,
    pub booking_id: Option<i32>,
    pub amount: i64,
    pub currency: String,
    pub order_id: String,
    pub gateway_payment_id: Option<String>,
    pub status: PaymentStatus,
    pub refund_status: RefundStatus,
    pub refund_id: Option<String>,
    pub refund_amount: Option<i64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn from_entity(entity: entity::payment::Model) -> Self {
        Self {
            id: entity.id,
            account_id: entity.account_id,
            slot_id: entity.slot_id,
            booking_id: entity.booking_id,
            amount: entity.amount,
            currency: entity.currency,
            order_id: entity.order_id,
            gateway_payment_id: entity.gateway_payment_id,
            status: entity.status,
            refund_status: entity.refund_status,
            refund_id: entity.refund_id,
            refund_amount: entity.refund_amount,
            paid_at: entity.paid_at,
            refunded_at: entity.refunded_at,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> PaymentDto {
        PaymentDto {
            id: self.id,
            account_id: self.account_id,
            slot_id: self.slot_id,
            booking_id: self.booking_id,
            amount: self.amount,
            currency: self.currency,
            order_id: self.order_id,
            gateway_payment_id: self.gateway_payment_id,
            status: match self.status {
                PaymentStatus::Pending => PaymentStatusDto::Pending,
                PaymentStatus::Succeeded => PaymentStatusDto::Succeeded,
                PaymentStatus::Failed => PaymentStatusDto::Failed,
                PaymentStatus::Cancelled => PaymentStatusDto::Cancelled,
            },
            refund_status: match self.refund_status {
                RefundStatus::None => RefundStatusDto::None,
                RefundStatus::Pending => RefundStatusDto::Pending,
                RefundStatus::Refunded => RefundStatusDto::Refunded,
                RefundStatus::Failed => RefundStatusDto::Failed,
            },
            refund_id: self.refund_id,
            refund_amount: self.refund_amount,
            paid_at: self.paid_at,
            refunded_at: self.refunded_at,
            created_at: self.created_at,
        }
    }
}

/// Parameters for recording a freshly created gateway order.
#[derive(Debug, Clone)]
pub struct NewPaymentParams {
    pub account_id: i32,
    pub slot_id: i32,
    pub amount: i64,
    pub currency: String,
    pub order_id: String,
}

/// Gateway callback data forwarded by the client after checkout.
#[derive(Debug, Clone)]
pub struct VerifyPaymentParams {
    pub order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

impl VerifyPaymentParams {
    pub fn from_dto(dto: VerifyPaymentDto) -> Self {
        Self {
            order_id: dto.order_id,
            gateway_payment_id: dto.payment_id,
            signature: dto.signature,
        }
    }
}

/// What verifying a captured payment produced.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    /// Seat claimed and booking created.
    Booked { booking: Booking, payment: Payment },
    /// No booking could be made; the captured amount was refunded.
    Refunded { payment: Payment, message: String },
}

impl VerifyOutcome {
    pub fn is_booked(&self) -> bool {
        matches!(self, Self::Booked { .. })
    }

    pub fn into_dto(self) -> VerifyPaymentResultDto {
        match self {
            Self::Booked { booking, payment } => VerifyPaymentResultDto {
                message: format!("Payment verified, booked token {}", booking.token_id),
                refunded: false,
                booking: Some(booking.into_dto()),
                payment: payment.into_dto(),
            },
            Self::Refunded { payment, message } => VerifyPaymentResultDto {
                message,
                refunded: true,
                booking: None,
                payment: payment.into_dto(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RefundResult {
    pub payment: Payment,
    /// Booking that was cancelled because its payment was refunded.
    pub cancelled_booking: Option<Booking>,
}

impl RefundResult {
    pub fn into_dto(self) -> RefundResultDto {
        RefundResultDto {
            payment: self.payment.into_dto(),
            cancelled_booking: self.cancelled_booking.map(Booking::into_dto),
        }
    }
}
