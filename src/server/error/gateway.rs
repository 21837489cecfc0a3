use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Errors talking to the external payment gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport failure or undecodable response.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Gateway answered with a non-success status.
    #[error("Payment gateway rejected {operation} with status {status}: {body}")]
    Rejected {
        operation: &'static str,
        status: u16,
        body: String,
    },
}

/// Converts gateway errors into 502 Bad Gateway responses.
///
/// The upstream status and body are logged; clients only learn that the gateway failed.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);

        error_response(StatusCode::BAD_GATEWAY, "Payment gateway request failed")
    }
}
