use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use entity::sea_orm_active_enums::{BookingStatus, PaymentStatus, RefundStatus};
use sea_orm::EntityTrait;
use test_utils::{builder::TestBuilder, factory};

use super::booked_seats;
use crate::server::{
    error::{booking::BookingError, gateway::GatewayError, payment::PaymentError, AppError},
    gateway::{CreateOrderRequest, GatewayOrder, GatewayRefund, PaymentGateway, RefundRequest},
    model::{
        booking::Requester,
        payment::{VerifyOutcome, VerifyPaymentParams},
    },
    service::{booking::BookingService, payment::PaymentService},
    util::signature,
};

mod refund;
mod verify_and_book;

const KEY_SECRET: &str = "test_key_secret";

/// In-memory gateway recording every call.
#[derive(Default)]
struct FakeGateway {
    fail_refunds: bool,
    orders: Mutex<Vec<CreateOrderRequest>>,
    refunds: Mutex<Vec<RefundRequest>>,
    sequence: AtomicUsize,
}

impl FakeGateway {
    fn failing_refunds() -> Self {
        Self {
            fail_refunds: true,
            ..Default::default()
        }
    }

    fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    fn refund_count(&self) -> usize {
        self.refunds.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let order = GatewayOrder {
            id: format!("order_fake{}", n),
            amount: request.amount,
            currency: request.currency.clone(),
        };
        self.orders.lock().unwrap().push(request);
        Ok(order)
    }

    async fn refund(&self, request: RefundRequest) -> Result<GatewayRefund, GatewayError> {
        if self.fail_refunds {
            return Err(GatewayError::Rejected {
                operation: "refund",
                status: 400,
                body: "refund rejected".to_string(),
            });
        }

        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let refund = GatewayRefund {
            id: format!("rfnd_fake{}", n),
            amount: request.amount,
        };
        self.refunds.lock().unwrap().push(request);
        Ok(refund)
    }
}

/// Builds verification params signed the way the gateway signs them
fn signed(order_id: &str, gateway_payment_id: &str) -> VerifyPaymentParams {
    VerifyPaymentParams {
        order_id: order_id.to_string(),
        gateway_payment_id: gateway_payment_id.to_string(),
        signature: signature::sign(KEY_SECRET, order_id, gateway_payment_id).unwrap(),
    }
}
