//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - JWT secret for validating bearer tokens
//! - Payment gateway client used by the payment flow
//! - Gateway key pair (public id for checkout, secret for signature checks)

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::gateway::PaymentGateway;

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: `DatabaseConnection` is a pool handle, the gateway is
/// reference-counted, and the secrets are shared `Arc<str>`s.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// Secret used to validate HS256 bearer tokens.
    pub jwt_secret: Arc<str>,

    /// Payment gateway used to create orders and issue refunds.
    ///
    /// Held as a trait object so tests and alternative gateways can be injected.
    pub gateway: Arc<dyn PaymentGateway>,

    /// Public gateway key returned to clients when opening a checkout.
    pub gateway_key_id: Arc<str>,

    /// Gateway secret used to verify payment signatures.
    pub gateway_key_secret: Arc<str>,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `jwt_secret` - Bearer token secret
    /// - `gateway` - Payment gateway client
    /// - `gateway_key_id` - Public gateway key
    /// - `gateway_key_secret` - Gateway signing secret
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        db: DatabaseConnection,
        jwt_secret: &str,
        gateway: Arc<dyn PaymentGateway>,
        gateway_key_id: &str,
        gateway_key_secret: &str,
    ) -> Self {
        Self {
            db,
            jwt_secret: Arc::from(jwt_secret),
            gateway,
            gateway_key_id: Arc::from(gateway_key_id),
            gateway_key_secret: Arc::from(gateway_key_secret),
        }
    }
}
