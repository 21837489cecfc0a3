pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_account_table;
mod m20260105_000002_create_patient_table;
mod m20260105_000003_create_slot_table;
mod m20260105_000004_create_booking_table;
mod m20260105_000005_create_payment_table;

pub use m20260105_000004_create_booking_table::{
    CREATE_ACTIVE_BOOKING_INDEX, CREATE_ACTIVE_TOKEN_INDEX,
};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_account_table::Migration),
            Box::new(m20260105_000002_create_patient_table::Migration),
            Box::new(m20260105_000003_create_slot_table::Migration),
            Box::new(m20260105_000004_create_booking_table::Migration),
            Box::new(m20260105_000005_create_payment_table::Migration),
        ]
    }
}
