pub mod aggregate;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod types;

pub use aggregate::{
    aggregate, tour_ratio, BuildingSummary, EventCategory, PropertyFilter, SignalRules,
    SourceSummary, ALL_PROPERTIES, UNKNOWN_SOURCE,
};
pub use config::{Config, SmtpConfig};
pub use error::ConfigError;
pub use sanitize::{sanitize, truncate, FieldLimits};
pub use types::{DateRange, EventRecord, StoredEvent};
