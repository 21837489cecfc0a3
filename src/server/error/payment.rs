use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment with order id {0} not found")]
    OrderNotFound(String),

    #[error("Payment {0} not found")]
    PaymentNotFound(i32),

    #[error("Payment for order {0} is already verified")]
    AlreadyVerified(String),

    /// Client-supplied gateway signature does not match the recomputed HMAC.
    #[error("Invalid payment signature for order {0}")]
    InvalidSignature(String),

    #[error("Account {account_id} does not own payment {payment_id}")]
    NotPaymentOwner { account_id: i32, payment_id: i32 },

    #[error("Payment {payment_id} cannot be refunded: {reason}")]
    NotRefundable { payment_id: i32, reason: String },

    #[error("Payment {0} is already refunded")]
    AlreadyRefunded(i32),

    #[error("A refund of payment {0} is already in progress")]
    RefundInProgress(i32),

    /// Payment was captured, no booking could be made and the automatic refund failed.
    ///
    /// The caller has been charged; the payment is left with refund status `failed` for
    /// manual follow up.
    #[error("Automatic refund failed for order {0}")]
    RefundFailed(String),
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        match self {
            Self::OrderNotFound(_) | Self::PaymentNotFound(_) => {
                error_response(StatusCode::NOT_FOUND, "Payment not found")
            }
            Self::AlreadyVerified(_) => {
                error_response(StatusCode::CONFLICT, "Payment already verified")
            }
            Self::InvalidSignature(_) => {
                error_response(StatusCode::BAD_REQUEST, "Invalid payment signature")
            }
            Self::NotPaymentOwner { .. } => {
                error_response(StatusCode::FORBIDDEN, "Not authorized")
            }
            Self::NotRefundable { reason, .. } => error_response(StatusCode::CONFLICT, reason),
            Self::AlreadyRefunded(_) => {
                error_response(StatusCode::CONFLICT, "Payment already refunded")
            }
            Self::RefundInProgress(_) => {
                error_response(StatusCode::CONFLICT, "Refund already in progress")
            }
            Self::RefundFailed(order_id) => {
                tracing::error!("Automatic refund failed for order {}", order_id);

                error_response(
                    StatusCode::BAD_GATEWAY,
                    format!(
                        "Your payment could not be turned into a booking and the automatic refund failed. Please contact support with order id {}.",
                        order_id
                    ),
                )
            }
        }
    }
}
