use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::booking::BookingDto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatusDto {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RefundStatusDto {
    None,
    Pending,
    Refunded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentDto {
    pub id: i32,
    pub account_id: i32,
    pub slot_id: i32,
    pub booking_id: Option<i32>,
    pub amount: i64,
    pub currency: String,
    pub order_id: String,
    pub gateway_payment_id: Option<String>,
    pub status: PaymentStatusDto,
    pub refund_status: RefundStatusDto,
    pub refund_id: Option<String>,
    pub refund_amount: Option<i64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentOrderDto {
    pub slot_id: i32,
}

/// Gateway order handed to the client to open the checkout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentOrderDto {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    /// Public gateway key the checkout widget is initialised with.
    pub key_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyPaymentDto {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Result of verifying a payment.
///
/// Either a booking was created, or the slot could no longer be booked and the payment was
/// refunded automatically; `message` explains which.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyPaymentResultDto {
    pub message: String,
    pub refunded: bool,
    pub booking: Option<BookingDto>,
    pub payment: PaymentDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefundResultDto {
    pub payment: PaymentDto,
    pub cancelled_booking: Option<BookingDto>,
}
