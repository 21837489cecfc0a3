//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation. Factories insert
//! directly through SeaORM active models and bypass service-level validation, which makes
//! them suitable for arranging edge-case states (a full slot, an inactive slot, a booking
//! that is already cancelled).
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let (account, patient) = factory::helpers::create_patient_account(&db).await?;
//! let slot = factory::slot::SlotFactory::new(&db).max_seats(1).build().await?;
//! let booking = factory::create_booking(&db, &account, &patient, &slot).await?;
//! ```
//!
//! # Available Factories
//!
//! - `account` - Create account entities (patients and admins)
//! - `patient` - Create patient profile entities
//! - `slot` - Create slot entities
//! - `booking` - Create booking entities
//! - `payment` - Create payment entities
//! - `helpers` - Convenience methods for creating entities with dependencies

pub mod account;
pub mod booking;
pub mod helpers;
pub mod patient;
pub mod payment;
pub mod slot;

pub use account::{create_account, create_admin};
pub use booking::create_booking;
pub use patient::create_patient;
pub use payment::create_payment;
pub use slot::create_slot;
