use async_trait::async_trait;
use execsummary_common::StoredEvent;

use crate::error::{InsertError, StoreError};
use crate::row::NewEventRow;

/// Write side used by the ingestion loader.
#[async_trait]
pub trait EventWriter: Send + Sync {
    /// Create the events table if it does not exist. Safe to call every run.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Insert one row, stamping it with the server's current time.
    async fn insert(&self, row: &NewEventRow) -> Result<(), InsertError>;
}

/// Read side used by the query service.
#[async_trait]
pub trait EventReader: Send + Sync {
    /// Every stored row, unfiltered.
    async fn all_events(&self) -> Result<Vec<StoredEvent>, StoreError>;
}
