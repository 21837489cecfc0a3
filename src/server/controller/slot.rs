use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::{
    model::{
        api::ErrorDto,
        slot::{CreateSlotDto, SlotBookingsDto, SlotDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::{
            booking::Booking,
            slot::{CreateSlotParams, Slot},
        },
        service::slot::SlotService,
        state::AppState,
    },
};

/// Tag for grouping slot endpoints in OpenAPI documentation
pub static SLOT_TAG: &str = "slot";

/// Create a new slot.
///
/// Validates every field of the request and reports all problems at once. A slot with the
/// same date and time range as an existing one is rejected.
///
/// # Access Control
/// - `Admin` - Only admins can create slots
///
/// # Returns
/// - `201 Created` - Slot created with no seats booked
/// - `400 Bad Request` - One or more invalid fields
/// - `401 Unauthorized` - Missing or invalid bearer token
/// - `403 Forbidden` - Caller is not an admin
/// - `409 Conflict` - A slot already covers this date and time range
#[utoipa::path(
    post,
    path = "/api/slots",
    tag = SLOT_TAG,
    request_body = CreateSlotDto,
    responses(
        (status = 201, description = "Successfully created slot", body = SlotDto),
        (status = 400, description = "Invalid slot data", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 409, description = "Slot already exists", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn create_slot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateSlotDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Admin])
        .await?;

    let params = CreateSlotParams::from_dto(payload, Utc::now().date_naive())
        .map_err(AppError::Validation)?;

    let slot = SlotService::new(&state.db).create(params).await?;

    Ok((StatusCode::CREATED, Json(slot.into_dto())))
}

/// List slots open for booking.
///
/// Returns active slots with at least one free seat, ordered by date and start time.
///
/// # Returns
/// - `200 OK` - Available slots
#[utoipa::path(
    get,
    path = "/api/slots/available",
    tag = SLOT_TAG,
    responses(
        (status = 200, description = "Available slots", body = Vec<SlotDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_available_slots(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let slots = SlotService::new(&state.db).get_available().await?;

    let dtos: Vec<SlotDto> = slots.into_iter().map(Slot::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Get a slot with its active bookings.
///
/// # Access Control
/// - `Admin` - Only admins can see who booked a slot
///
/// # Returns
/// - `200 OK` - Slot and its non-cancelled bookings
/// - `404 Not Found` - No such slot
#[utoipa::path(
    get,
    path = "/api/slots/{slot_id}/bookings",
    tag = SLOT_TAG,
    params(
        ("slot_id" = i32, Path, description = "Slot ID")
    ),
    responses(
        (status = 200, description = "Slot with bookings", body = SlotBookingsDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Slot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_slot_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slot_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Admin])
        .await?;

    let (slot, bookings) = SlotService::new(&state.db)
        .get_with_bookings(slot_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SlotBookingsDto {
            slot: slot.into_dto(),
            bookings: bookings.into_iter().map(Booking::into_dto).collect(),
        }),
    ))
}
