pub mod prelude;

pub mod account;
pub mod booking;
pub mod patient;
pub mod payment;
pub mod sea_orm_active_enums;
pub mod slot;
