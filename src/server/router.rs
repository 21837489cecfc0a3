use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    model::{
        api::ErrorDto,
        booking::{
            BookingDto, BookingStatsDto, BookingStatusDto, BulkCancelResultDto, CreateBookingDto,
            PaginatedBookingsDto,
        },
        payment::{
            CreatePaymentOrderDto, PaymentDto, PaymentOrderDto, PaymentStatusDto,
            RefundResultDto, RefundStatusDto, VerifyPaymentDto, VerifyPaymentResultDto,
        },
        slot::{CreateSlotDto, SlotBookingsDto, SlotDto},
    },
    server::{
        controller::{
            booking::{
                self, cancel_booking, cancel_patient_bookings, create_booking, get_booking_stats,
                get_bookings, get_my_bookings, get_patient_bookings,
            },
            payment::{
                self, create_payment_order, get_my_payments, get_payment_by_order, get_payments,
                refund_payment, verify_payment,
            },
            slot::{self, create_slot, get_available_slots, get_slot_bookings},
        },
        state::AppState,
    },
};

/// OpenAPI document for every endpoint.
#[derive(OpenApi)]
#[openapi(
    paths(
        slot::create_slot,
        slot::get_available_slots,
        slot::get_slot_bookings,
        booking::create_booking,
        booking::get_my_bookings,
        booking::get_bookings,
        booking::get_booking_stats,
        booking::get_patient_bookings,
        booking::cancel_booking,
        booking::cancel_patient_bookings,
        payment::create_payment_order,
        payment::verify_payment,
        payment::get_payment_by_order,
        payment::get_my_payments,
        payment::get_payments,
        payment::refund_payment,
    ),
    components(schemas(
        ErrorDto,
        SlotDto,
        CreateSlotDto,
        SlotBookingsDto,
        BookingDto,
        BookingStatusDto,
        CreateBookingDto,
        PaginatedBookingsDto,
        BookingStatsDto,
        BulkCancelResultDto,
        PaymentDto,
        PaymentStatusDto,
        RefundStatusDto,
        CreatePaymentOrderDto,
        PaymentOrderDto,
        VerifyPaymentDto,
        VerifyPaymentResultDto,
        RefundResultDto,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "slot", description = "Appointment slots and seat availability"),
        (name = "booking", description = "Bookings and cancellations"),
        (name = "payment", description = "Paid bookings and refunds"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/openapi.json", get(openapi))
        .route("/api/slots", post(create_slot))
        .route("/api/slots/available", get(get_available_slots))
        .route("/api/slots/{slot_id}/bookings", get(get_slot_bookings))
        .route("/api/bookings", post(create_booking).get(get_bookings))
        .route("/api/bookings/me", get(get_my_bookings))
        .route("/api/bookings/stats", get(get_booking_stats))
        .route("/api/bookings/{booking_id}/cancel", post(cancel_booking))
        .route(
            "/api/patients/{patient_id}/bookings",
            get(get_patient_bookings),
        )
        .route(
            "/api/patients/{patient_id}/bookings/cancel",
            post(cancel_patient_bookings),
        )
        .route("/api/payments", get(get_payments))
        .route("/api/payments/me", get(get_my_payments))
        .route("/api/payments/orders", post(create_payment_order))
        .route(
            "/api/payments/orders/{order_id}",
            get(get_payment_by_order),
        )
        .route("/api/payments/verify", post(verify_payment))
        .route("/api/payments/{payment_id}/refund", post(refund_payment))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
