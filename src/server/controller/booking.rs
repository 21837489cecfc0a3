use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    model::{
        api::ErrorDto,
        booking::{
            BookingDto, BookingStatsDto, BulkCancelResultDto, CreateBookingDto,
            PaginatedBookingsDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::booking::{Booking, CancelBookingParams, Requester},
        service::{booking::BookingService, cancellation::CancellationService},
        state::AppState,
    },
};

/// Tag for grouping booking endpoints in OpenAPI documentation
pub static BOOKING_TAG: &str = "booking";

#[derive(Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_entries")]
    pub entries: u64,
}

fn default_entries() -> u64 {
    10
}

/// Book a seat on a slot.
///
/// Patients book for their own profile. Admins book on behalf of the patient named in
/// `patient_id`. The seat is claimed atomically, so concurrent requests for the last seat
/// produce exactly one booking.
///
/// # Access Control
/// - Any authenticated account
///
/// # Returns
/// - `201 Created` - Booking confirmed with token and appointment window
/// - `400 Bad Request` - Admin did not name a patient
/// - `404 Not Found` - Slot or patient not found
/// - `409 Conflict` - Slot inactive or full, or patient already booked this slot
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = BOOKING_TAG,
    request_body = CreateBookingDto,
    responses(
        (status = 201, description = "Booking confirmed", body = BookingDto),
        (status = 400, description = "Patient required", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 404, description = "Slot or patient not found", body = ErrorDto),
        (status = 409, description = "Slot unavailable or duplicate booking", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[])
        .await?;

    let requester = Requester::from_account(&account, payload.patient_id)?;

    let booking = BookingService::new(&state.db)
        .create(requester, payload.slot_id)
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into_dto())))
}

/// Get the caller's bookings.
///
/// # Access Control
/// - `Patient`
///
/// # Returns
/// - `200 OK` - Bookings made by the caller, newest first
#[utoipa::path(
    get,
    path = "/api/bookings/me",
    tag = BOOKING_TAG,
    responses(
        (status = 200, description = "Caller's bookings", body = Vec<BookingDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a patient", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_my_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Patient])
        .await?;

    let bookings = BookingService::new(&state.db)
        .get_by_account(account.id)
        .await?;

    let dtos: Vec<BookingDto> = bookings.into_iter().map(Booking::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Get all bookings, paginated.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - Page of bookings, newest first
#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = BOOKING_TAG,
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 0)"),
        ("entries" = Option<u64>, Query, description = "Items per page (default: 10, max: 100)")
    ),
    responses(
        (status = 200, description = "Page of bookings", body = PaginatedBookingsDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Admin])
        .await?;

    let bookings = BookingService::new(&state.db)
        .get_paginated(params.page, params.entries)
        .await?;

    Ok((StatusCode::OK, Json(bookings.into_dto())))
}

/// Get booking statistics.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - Booking counts by status and for the last seven days
#[utoipa::path(
    get,
    path = "/api/bookings/stats",
    tag = BOOKING_TAG,
    responses(
        (status = 200, description = "Booking statistics", body = BookingStatsDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_booking_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Admin])
        .await?;

    let stats = BookingService::new(&state.db).stats().await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}

/// Get a patient's bookings.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - Patient's bookings, latest booking date first
/// - `404 Not Found` - No such patient
#[utoipa::path(
    get,
    path = "/api/patients/{patient_id}/bookings",
    tag = BOOKING_TAG,
    params(
        ("patient_id" = i32, Path, description = "Patient ID")
    ),
    responses(
        (status = 200, description = "Patient's bookings", body = Vec<BookingDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Patient not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_patient_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(patient_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Admin])
        .await?;

    let bookings = BookingService::new(&state.db)
        .get_by_patient(patient_id)
        .await?;

    let dtos: Vec<BookingDto> = bookings.into_iter().map(Booking::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Cancel a booking.
///
/// The seat is returned to the slot only when this request is the one that cancels the
/// booking; cancelling an already cancelled booking is rejected.
///
/// # Access Control
/// - The account that made the booking, or an admin
///
/// # Returns
/// - `200 OK` - The cancelled booking
/// - `403 Forbidden` - Caller neither made the booking nor is an admin
/// - `404 Not Found` - No such booking
/// - `409 Conflict` - Booking already cancelled
#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/cancel",
    tag = BOOKING_TAG,
    params(
        ("booking_id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller may not cancel this booking", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 409, description = "Booking already cancelled", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[])
        .await?;

    let booking = CancellationService::new(&state.db)
        .cancel(CancelBookingParams::from_account(&account, booking_id))
        .await?;

    Ok((StatusCode::OK, Json(booking.into_dto())))
}

/// Cancel all of a patient's upcoming bookings.
///
/// Confirmed bookings dated today or later are cancelled together and their seats returned
/// to each slot.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - Number and IDs of cancelled bookings
/// - `404 Not Found` - No such patient
#[utoipa::path(
    post,
    path = "/api/patients/{patient_id}/bookings/cancel",
    tag = BOOKING_TAG,
    params(
        ("patient_id" = i32, Path, description = "Patient ID")
    ),
    responses(
        (status = 200, description = "Bookings cancelled", body = BulkCancelResultDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Patient not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn cancel_patient_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(patient_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Admin])
        .await?;

    let cancelled = CancellationService::new(&state.db)
        .cancel_future_for_patient(patient_id, Utc::now().date_naive())
        .await?;

    Ok((
        StatusCode::OK,
        Json(BulkCancelResultDto {
            cancelled_count: cancelled.len() as u64,
            cancelled_booking_ids: cancelled,
        }),
    ))
}
