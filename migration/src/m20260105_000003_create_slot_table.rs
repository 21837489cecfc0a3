use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Slot::Table)
                    .if_not_exists()
                    .col(pk_auto(Slot::Id))
                    .col(date(Slot::Date))
                    .col(string_len(Slot::StartTime, 5))
                    .col(string_len(Slot::EndTime, 5))
                    .col(integer(Slot::MaxSeats))
                    .col(integer(Slot::BookedSeats).default(0))
                    .col(big_integer(Slot::Price).default(1000))
                    .col(string_len(Slot::Currency, 3).default("INR"))
                    .col(boolean(Slot::IsActive).default(true))
                    .col(
                        timestamp(Slot::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One slot per date and time range
        manager
            .create_index(
                Index::create()
                    .name("idx_slot_date_time_range")
                    .table(Slot::Table)
                    .col(Slot::Date)
                    .col(Slot::StartTime)
                    .col(Slot::EndTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_slot_active_date")
                    .table(Slot::Table)
                    .col(Slot::IsActive)
                    .col(Slot::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_slot_active_date")
                    .table(Slot::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_slot_date_time_range")
                    .table(Slot::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Slot::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Slot {
    Table,
    Id,
    Date,
    StartTime,
    EndTime,
    MaxSeats,
    BookedSeats,
    Price,
    Currency,
    IsActive,
    CreatedAt,
}
