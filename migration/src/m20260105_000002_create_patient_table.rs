use sea_orm_migration::{prelude::*, schema::*};

use super::m20260105_000001_create_account_table::Account;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patient::Table)
                    .if_not_exists()
                    .col(pk_auto(Patient::Id))
                    .col(integer_null(Patient::AccountId).unique_key())
                    .col(string(Patient::Name))
                    .col(string_null(Patient::Email))
                    .col(string_null(Patient::Phone))
                    .col(integer_null(Patient::Age))
                    .col(string_null(Patient::Gender))
                    .col(
                        timestamp(Patient::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patient_account_id")
                            .from(Patient::Table, Patient::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Patient::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Patient {
    Table,
    Id,
    AccountId,
    Name,
    Email,
    Phone,
    Age,
    Gender,
    CreatedAt,
}
