//! External payment gateway.
//!
//! The payment flow only depends on the `PaymentGateway` trait; `RazorpayGateway` is the
//! production implementation and tests inject their own.

pub mod razorpay;

use async_trait::async_trait;

use crate::server::error::gateway::GatewayError;

pub use razorpay::RazorpayGateway;

/// Order creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    /// Amount in minor currency units.
    pub amount: i64,
    pub currency: String,
    /// Merchant-side receipt reference.
    pub receipt: String,
    pub account_id: i32,
    pub slot_id: i32,
    /// Human readable slot description attached to the order notes.
    pub slot_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

/// Refund of a captured payment.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundRequest {
    /// Gateway payment id of the captured payment.
    pub payment_id: String,
    pub amount: i64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRefund {
    pub id: String,
    pub amount: i64,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an order the client can pay against.
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, GatewayError>;

    /// Refunds a captured payment.
    async fn refund(&self, request: RefundRequest) -> Result<GatewayRefund, GatewayError>;
}
