use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20260105_000001_create_account_table::Account, m20260105_000003_create_slot_table::Slot,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(pk_auto(Payment::Id))
                    .col(integer(Payment::AccountId))
                    .col(integer(Payment::SlotId))
                    .col(integer_null(Payment::BookingId))
                    .col(big_integer(Payment::Amount))
                    .col(string_len(Payment::Currency, 3))
                    .col(string_uniq(Payment::OrderId))
                    .col(string_null(Payment::GatewayPaymentId))
                    .col(string_null(Payment::Signature))
                    .col(string_len(Payment::Status, 16).default("pending"))
                    .col(string_len(Payment::RefundStatus, 16).default("none"))
                    .col(string_null(Payment::RefundId))
                    .col(big_integer_null(Payment::RefundAmount))
                    .col(timestamp_null(Payment::PaidAt))
                    .col(timestamp_null(Payment::RefundedAt))
                    .col(
                        timestamp(Payment::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_account_id")
                            .from(Payment::Table, Payment::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_slot_id")
                            .from(Payment::Table, Payment::SlotId)
                            .to(Slot::Table, Slot::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_status_created_at")
                    .table(Payment::Table)
                    .col(Payment::Status)
                    .col(Payment::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Payment {
    Table,
    Id,
    AccountId,
    SlotId,
    BookingId,
    Amount,
    Currency,
    OrderId,
    GatewayPaymentId,
    Signature,
    Status,
    RefundStatus,
    RefundId,
    RefundAmount,
    PaidAt,
    RefundedAt,
    CreatedAt,
}
