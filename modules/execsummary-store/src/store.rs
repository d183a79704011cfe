//! PgEventStore: the events table behind a managed connection pool.

use std::time::Duration;

use async_trait::async_trait;
use execsummary_common::StoredEvent;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::{InsertError, StoreError};
use crate::row::NewEventRow;
use crate::schema::{CREATE_TABLE_SQL, INSERT_SQL, SELECT_ALL_SQL, TABLE_NAME};
use crate::traits::{EventReader, EventWriter};

#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// Postgres-backed event store. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and verify one connection can be established.
    pub async fn connect(database_url: &str, settings: PoolSettings) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Storage(format!("connect failed: {e}")))?;

        info!(max_connections = settings.max_connections, "Connected to database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for checked-out connections to return, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

#[async_trait]
impl EventWriter for PgEventStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Schema(e.to_string()))?;

        info!(table = TABLE_NAME, "Table verified/created");
        Ok(())
    }

    async fn insert(&self, row: &NewEventRow) -> Result<(), InsertError> {
        sqlx::query(INSERT_SQL)
            .bind(&row.event_id)
            .bind(&row.conversation_id)
            .bind(&row.building_name)
            .bind(&row.guest_card_id)
            .bind(&row.global_session_id)
            .bind(&row.global_session_id_building)
            .bind(&row.lead_first_name)
            .bind(&row.lead_last_name)
            .bind(&row.lead_email)
            .bind(&row.lead_phone_number)
            .bind(&row.channel)
            .bind(&row.marketing_source)
            .bind(&row.event_type)
            .bind(row.event_datetime)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl EventReader for PgEventStore {
    async fn all_events(&self) -> Result<Vec<StoredEvent>, StoreError> {
        sqlx::query_as::<_, StoredEvent>(SELECT_ALL_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgRow;

    fn decodes_from_pg_row<T: for<'r> sqlx::FromRow<'r, PgRow>>() {}

    #[test]
    fn stored_event_is_read_with_from_row() {
        decodes_from_pg_row::<StoredEvent>();
    }
}
