//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations for each
//! domain in the application. Repositories use SeaORM entity models internally and return
//! entity or domain models to the service layer. The slot repository doubles as the seat
//! ledger: every change to a slot's booked seat counter goes through one of its conditional
//! updates.

pub mod account;
pub mod booking;
pub mod patient;
pub mod payment;
pub mod slot;
