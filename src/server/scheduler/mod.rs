//! Cron jobs for automated maintenance tasks.

pub mod payment_expiry;
