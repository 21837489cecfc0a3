use thiserror::Error;

/// Errors that can occur while setting up a test context.
#[derive(Error, Debug)]
pub enum TestError {
    /// Failed to connect to the in-memory database or create its schema.
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}
