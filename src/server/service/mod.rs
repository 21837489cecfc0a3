//! Business logic layer.
//!
//! Services orchestrate repositories and external collaborators. Each service borrows the
//! database connection for the duration of a request, following the same `new(db)`
//! construction as the repositories.
//!
//! - `booking` - Booking reservation engine and booking queries
//! - `cancellation` - Single and bulk cancellation with seat release
//! - `payment` - Payment-gated reservation flow, refunds and payment queries
//! - `slot` - Slot administration and availability

pub mod booking;
pub mod cancellation;
pub mod payment;
pub mod slot;

#[cfg(test)]
mod test;
