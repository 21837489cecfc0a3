use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::server::{
    error::gateway::GatewayError,
    gateway::{CreateOrderRequest, GatewayOrder, GatewayRefund, PaymentGateway, RefundRequest},
};

/// Razorpay REST client.
///
/// Authenticates every call with HTTP basic auth using the key id and secret.
pub struct RazorpayGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Serialize)]
struct OrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: OrderNotes<'a>,
}

#[derive(Serialize)]
struct OrderNotes<'a> {
    account_id: String,
    slot_id: String,
    slot: &'a str,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

#[derive(Serialize)]
struct RefundBody<'a> {
    amount: i64,
    notes: RefundNotes<'a>,
}

#[derive(Serialize)]
struct RefundNotes<'a> {
    reason: &'a str,
}

#[derive(Deserialize)]
struct RefundResponse {
    id: String,
    amount: i64,
}

impl RazorpayGateway {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }

    async fn post<B, R>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let body = OrderBody {
            amount: request.amount,
            currency: &request.currency,
            receipt: &request.receipt,
            notes: OrderNotes {
                account_id: request.account_id.to_string(),
                slot_id: request.slot_id.to_string(),
                slot: &request.slot_label,
            },
        };

        let order: OrderResponse = self.post("order creation", "/orders", &body).await?;

        tracing::debug!("Created gateway order {}", order.id);

        Ok(GatewayOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
        })
    }

    async fn refund(&self, request: RefundRequest) -> Result<GatewayRefund, GatewayError> {
        let body = RefundBody {
            amount: request.amount,
            notes: RefundNotes {
                reason: &request.reason,
            },
        };

        let refund: RefundResponse = self
            .post(
                "refund",
                &format!("/payments/{}/refund", request.payment_id),
                &body,
            )
            .await?;

        tracing::info!(
            "Refunded gateway payment {} with refund {}",
            request.payment_id,
            refund.id
        );

        Ok(GatewayRefund {
            id: refund.id,
            amount: refund.amount,
        })
    }
}
