//! In-memory store for tests, with switches to make individual calls fail.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use execsummary_common::StoredEvent;

use crate::error::{InsertError, StoreError};
use crate::row::NewEventRow;
use crate::traits::{EventReader, EventWriter};

#[derive(Default)]
struct MemoryState {
    table_exists: bool,
    schema_calls: usize,
    rows: Vec<StoredEvent>,
    failing_event_ids: HashSet<String>,
    fail_schema: bool,
    fail_reads: bool,
}

#[derive(Clone, Default)]
pub struct MemoryEventStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose table already exists and holds `rows`.
    pub fn with_rows(rows: Vec<StoredEvent>) -> Self {
        let store = Self::new();
        {
            let mut state = store.lock();
            state.table_exists = true;
            state.rows = rows;
        }
        store
    }

    /// Make inserts of the event with this id fail.
    pub fn fail_insert_for(&self, event_id: &str) {
        self.lock().failing_event_ids.insert(event_id.to_string());
    }

    pub fn fail_schema(&self) {
        self.lock().fail_schema = true;
    }

    pub fn fail_reads(&self) {
        self.lock().fail_reads = true;
    }

    pub fn rows(&self) -> Vec<StoredEvent> {
        self.lock().rows.clone()
    }

    pub fn table_exists(&self) -> bool {
        self.lock().table_exists
    }

    pub fn schema_calls(&self) -> usize {
        self.lock().schema_calls
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panicking test thread poisons the lock; the data is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EventWriter for MemoryEventStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.schema_calls += 1;
        if state.fail_schema {
            return Err(StoreError::Schema("permission denied to create table".to_string()));
        }
        state.table_exists = true;
        Ok(())
    }

    async fn insert(&self, row: &NewEventRow) -> Result<(), InsertError> {
        let mut state = self.lock();
        if !state.table_exists {
            return Err(InsertError::Database("relation does not exist".to_string()));
        }
        if let Some(id) = &row.event_id {
            if state.failing_event_ids.contains(id) {
                return Err(InsertError::Database(format!("insert rejected for {id}")));
            }
        }
        state.rows.push(StoredEvent {
            event_id: row.event_id.clone(),
            conversation_id: row.conversation_id.clone(),
            building_name: row.building_name.clone(),
            guest_card_id: row.guest_card_id.clone(),
            global_session_id: row.global_session_id.clone(),
            global_session_id_building: row.global_session_id_building.clone(),
            lead_first_name: row.lead_first_name.clone(),
            lead_last_name: row.lead_last_name.clone(),
            lead_email: row.lead_email.clone(),
            lead_phone_number: row.lead_phone_number.clone(),
            channel: row.channel.clone(),
            marketing_source: row.marketing_source.clone(),
            event_type: row.event_type.clone(),
            event_datetime: row.event_datetime,
            created_date: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl EventReader for MemoryEventStore {
    async fn all_events(&self) -> Result<Vec<StoredEvent>, StoreError> {
        let state = self.lock();
        if state.fail_reads {
            return Err(StoreError::Storage("connection refused".to_string()));
        }
        Ok(state.rows.clone())
    }
}
