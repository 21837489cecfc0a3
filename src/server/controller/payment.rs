use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use entity::sea_orm_active_enums::AccountRole;

use crate::{
    model::{
        api::ErrorDto,
        payment::{
            CreatePaymentOrderDto, PaymentDto, PaymentOrderDto, RefundResultDto,
            VerifyPaymentDto, VerifyPaymentResultDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::payment::{Payment, VerifyPaymentParams},
        service::payment::PaymentService,
        state::AppState,
    },
};

/// Tag for grouping payment endpoints in OpenAPI documentation
pub static PAYMENT_TAG: &str = "payment";

fn payment_service(state: &AppState) -> PaymentService<'_> {
    PaymentService::new(
        &state.db,
        state.gateway.as_ref(),
        &state.gateway_key_secret,
    )
}

/// Open a payment order for a slot.
///
/// No seat is held while the patient pays; the returned order is passed to the gateway
/// checkout together with the public key.
///
/// # Access Control
/// - `Patient`
///
/// # Returns
/// - `201 Created` - Gateway order to pay against
/// - `404 Not Found` - Slot not found
/// - `409 Conflict` - Slot unavailable or already booked by the patient
/// - `502 Bad Gateway` - Gateway refused the order
#[utoipa::path(
    post,
    path = "/api/payments/orders",
    tag = PAYMENT_TAG,
    request_body = CreatePaymentOrderDto,
    responses(
        (status = 201, description = "Order created", body = PaymentOrderDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a patient", body = ErrorDto),
        (status = 404, description = "Slot not found", body = ErrorDto),
        (status = 409, description = "Slot unavailable or duplicate booking", body = ErrorDto),
        (status = 502, description = "Payment gateway error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn create_payment_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePaymentOrderDto>,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Patient])
        .await?;

    let payment = payment_service(&state)
        .create_order(account.id, payload.slot_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentOrderDto {
            order_id: payment.order_id,
            amount: payment.amount,
            currency: payment.currency,
            key_id: state.gateway_key_id.to_string(),
        }),
    ))
}

/// Verify a completed checkout and book the slot.
///
/// When the slot can no longer be booked the payment is refunded automatically and the
/// response says so with `refunded: true`.
///
/// # Access Control
/// - `Patient` who opened the order
///
/// # Returns
/// - `201 Created` - Payment verified and booking confirmed
/// - `200 OK` - Payment verified but refunded because booking was not possible
/// - `400 Bad Request` - Signature does not match
/// - `409 Conflict` - Payment already verified
/// - `502 Bad Gateway` - Automatic refund failed
#[utoipa::path(
    post,
    path = "/api/payments/verify",
    tag = PAYMENT_TAG,
    request_body = VerifyPaymentDto,
    responses(
        (status = 201, description = "Payment verified and booked", body = VerifyPaymentResultDto),
        (status = 200, description = "Payment refunded, no booking made", body = VerifyPaymentResultDto),
        (status = 400, description = "Invalid signature", body = ErrorDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the order", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 409, description = "Payment already verified", body = ErrorDto),
        (status = 502, description = "Automatic refund failed", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<VerifyPaymentDto>,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Patient])
        .await?;

    let outcome = payment_service(&state)
        .verify_and_book(account.id, VerifyPaymentParams::from_dto(payload))
        .await?;

    let status = if outcome.is_booked() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(outcome.into_dto())))
}

/// Get a payment by gateway order id.
///
/// # Access Control
/// - The account that opened the order, or an admin
///
/// # Returns
/// - `200 OK` - The payment
/// - `403 Forbidden` - Caller does not own the payment
/// - `404 Not Found` - No such order
#[utoipa::path(
    get,
    path = "/api/payments/orders/{order_id}",
    tag = PAYMENT_TAG,
    params(
        ("order_id" = String, Path, description = "Gateway order id")
    ),
    responses(
        (status = 200, description = "Payment", body = PaymentDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller does not own the payment", body = ErrorDto),
        (status = 404, description = "Order not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_payment_by_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[])
        .await?;

    let payment = payment_service(&state)
        .get_by_order_id(account.id, account.role == AccountRole::Admin, &order_id)
        .await?;

    Ok((StatusCode::OK, Json(payment.into_dto())))
}

/// Get the caller's payments.
///
/// # Access Control
/// - `Patient`
///
/// # Returns
/// - `200 OK` - Caller's payments, newest first
#[utoipa::path(
    get,
    path = "/api/payments/me",
    tag = PAYMENT_TAG,
    responses(
        (status = 200, description = "Caller's payments", body = Vec<PaymentDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not a patient", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_my_payments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let account = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Patient])
        .await?;

    let payments = payment_service(&state)
        .get_by_account(account.id)
        .await?;

    let dtos: Vec<PaymentDto> = payments.into_iter().map(Payment::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Get all payments.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - All payments, newest first
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = PAYMENT_TAG,
    responses(
        (status = 200, description = "All payments", body = Vec<PaymentDto>),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn get_payments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Admin])
        .await?;

    let payments = payment_service(&state)
        .get_all()
        .await?;

    let dtos: Vec<PaymentDto> = payments.into_iter().map(Payment::into_dto).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Refund a payment.
///
/// Refunds the full amount through the gateway and cancels the booking the payment paid
/// for, returning its seat.
///
/// # Access Control
/// - `Admin`
///
/// # Returns
/// - `200 OK` - Refunded payment and the cancelled booking, if any
/// - `404 Not Found` - No such payment
/// - `409 Conflict` - Payment not refundable or already refunded
/// - `502 Bad Gateway` - Gateway refused the refund
#[utoipa::path(
    post,
    path = "/api/payments/{payment_id}/refund",
    tag = PAYMENT_TAG,
    params(
        ("payment_id" = i32, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment refunded", body = RefundResultDto),
        (status = 401, description = "Not authenticated", body = ErrorDto),
        (status = 403, description = "Caller is not an admin", body = ErrorDto),
        (status = 404, description = "Payment not found", body = ErrorDto),
        (status = 409, description = "Payment not refundable", body = ErrorDto),
        (status = 502, description = "Payment gateway error", body = ErrorDto)
    ),
    security(("bearer" = []))
)]
pub async fn refund_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(payment_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &state.jwt_secret, &headers)
        .require(&[Permission::Admin])
        .await?;

    let result = payment_service(&state)
        .refund(payment_id)
        .await?;

    Ok((StatusCode::OK, Json(result.into_dto())))
}
