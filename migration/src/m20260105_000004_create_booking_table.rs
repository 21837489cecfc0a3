use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_account_table::Account,
    m20260105_000002_create_patient_table::Patient, m20260105_000003_create_slot_table::Slot,
};

/// Partial unique index allowing at most one non-cancelled booking per patient and slot.
///
/// Kept as raw SQL because the index carries a `WHERE` clause. Shared with the test
/// builder so in-memory test databases enforce the same constraint.
pub const CREATE_ACTIVE_BOOKING_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     idx_booking_active_patient_slot ON booking (patient_id, slot_id) \
     WHERE status <> 'cancelled'";

/// Partial unique index allowing each token number to be held by one live booking per slot.
pub const CREATE_ACTIVE_TOKEN_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     idx_booking_active_slot_token ON booking (slot_id, token_number) \
     WHERE status <> 'cancelled'";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::Id))
                    .col(integer(Booking::AccountId))
                    .col(integer(Booking::PatientId))
                    .col(integer(Booking::SlotId))
                    .col(date(Booking::BookingDate))
                    .col(string_len(Booking::Status, 16).default("confirmed"))
                    .col(integer(Booking::TokenNumber))
                    .col(string(Booking::TokenId))
                    .col(string_len(Booking::AppointmentTime, 5))
                    .col(string_len(Booking::AppointmentEndTime, 5))
                    .col(integer_null(Booking::PaymentId))
                    .col(timestamp_null(Booking::CancelledAt))
                    .col(
                        timestamp(Booking::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_account_id")
                            .from(Booking::Table, Booking::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_patient_id")
                            .from(Booking::Table, Booking::PatientId)
                            .to(Patient::Table, Patient::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_slot_id")
                            .from(Booking::Table, Booking::SlotId)
                            .to(Slot::Table, Slot::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(CREATE_ACTIVE_BOOKING_INDEX)
            .await?;

        manager
            .get_connection()
            .execute_unprepared(CREATE_ACTIVE_TOKEN_INDEX)
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_account_status")
                    .table(Booking::Table)
                    .col(Booking::AccountId)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_slot_id")
                    .table(Booking::Table)
                    .col(Booking::SlotId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    AccountId,
    PatientId,
    SlotId,
    BookingDate,
    Status,
    TokenNumber,
    TokenId,
    AppointmentTime,
    AppointmentEndTime,
    PaymentId,
    CancelledAt,
    CreatedAt,
}
