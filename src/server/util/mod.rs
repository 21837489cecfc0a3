//! Pure helpers with no database or network access.

pub mod signature;
pub mod token;
