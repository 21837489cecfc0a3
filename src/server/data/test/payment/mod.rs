use crate::server::{data::payment::PaymentRepository, model::payment::NewPaymentParams};
use chrono::{Duration, Utc};
use entity::sea_orm_active_enums::{PaymentStatus, RefundStatus};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod expire_pending_before;
