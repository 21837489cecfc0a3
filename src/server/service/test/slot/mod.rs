use crate::server::{
    error::{booking::BookingError, AppError},
    model::slot::CreateSlotParams,
    service::slot::SlotService,
    util::token::TimeOfDay,
};
use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::BookingStatus;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod get_with_bookings;

fn params(days_ahead: i64, start: &str, end: &str) -> CreateSlotParams {
    CreateSlotParams {
        date: Utc::now().date_naive() + Duration::days(days_ahead),
        start_time: TimeOfDay::parse(start).unwrap(),
        end_time: TimeOfDay::parse(end).unwrap(),
        max_seats: 20,
        price: 1000,
        currency: "INR".to_string(),
        is_active: true,
    }
}
