use std::time::Duration;

use thiserror::Error;

/// Store-level failure. Schema failures are fatal to an ingestion run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Failure writing a single event. Counted by the loader, never fatal.
#[derive(Debug, Error)]
pub enum InsertError {
    #[error("Invalid event_datetime {0:?}")]
    InvalidDatetime(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Insert timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for InsertError {
    fn from(err: sqlx::Error) -> Self {
        InsertError::Database(err.to_string())
    }
}
