//! Storage for leasing events: one Postgres table, written once per event and
//! read back whole by the reporting side.
//!
//! Writers and readers are traits so the loader and the API can run against
//! the in-memory store in tests (`test-utils` feature).

pub mod error;
pub mod row;
pub mod schema;
pub mod store;
pub mod traits;

#[cfg(feature = "test-utils")]
pub mod memory;

pub use error::{InsertError, StoreError};
pub use row::{parse_event_datetime, NewEventRow};
pub use schema::{CREATE_TABLE_SQL, TABLE_NAME};
pub use store::{PgEventStore, PoolSettings};
pub use traits::{EventReader, EventWriter};

#[cfg(feature = "test-utils")]
pub use memory::MemoryEventStore;
