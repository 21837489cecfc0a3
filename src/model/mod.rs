//! API data transfer objects.
//!
//! Request and response bodies exchanged over HTTP. Everything here derives `serde` traits for
//! JSON and `utoipa::ToSchema` so the OpenAPI document can describe it.

pub mod api;
pub mod booking;
pub mod payment;
pub mod slot;
