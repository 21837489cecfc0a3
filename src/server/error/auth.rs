use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Request carried no `Authorization: Bearer` header.
    #[error("Missing bearer token")]
    MissingToken,

    /// Bearer token failed signature, expiry or claim validation.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    /// Token subject does not match any account.
    #[error("Account {0} referenced by token does not exist")]
    AccountNotFound(i32),

    /// Authenticated account lacks the required role.
    ///
    /// # Fields
    /// - Account ID of the caller
    /// - Description of what was attempted
    #[error("Account {0} denied access: {1}")]
    AccessDenied(i32, String),
}

/// Converts authentication errors into HTTP responses.
///
/// Token problems map to 401 Unauthorized and missing roles to 403 Forbidden. Details
/// are logged at debug level while client-facing messages stay generic.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::MissingToken | Self::InvalidToken(_) | Self::AccountNotFound(_) => {
                error_response(StatusCode::UNAUTHORIZED, "Not authenticated")
            }
            Self::AccessDenied(_, _) => {
                error_response(StatusCode::FORBIDDEN, "Insufficient permissions")
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(err.to_string())
    }
}
