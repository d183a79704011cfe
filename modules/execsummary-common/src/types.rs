//! Event records as received from the reporting API and as stored.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// One leasing event exactly as the upstream API reports it.
///
/// Every field is optional. Scalars that arrive as numbers or booleans are
/// kept in their textual form so an id sent as `12345` still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub conversation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub building_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub guest_card_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub global_session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub global_session_id_building: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lead_first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lead_last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lead_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lead_phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub marketing_source: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_datetime: Option<String>,
}

impl EventRecord {
    /// Identifier used in logs. Records without an id still need a label.
    pub fn log_id(&self) -> &str {
        self.event_id.as_deref().unwrap_or("<no event_id>")
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or scalar, found {other}"
        ))),
    }
}

/// A row of the events table. Serialized with the verbatim column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StoredEvent {
    pub event_id: Option<String>,
    pub conversation_id: Option<String>,
    pub building_name: Option<String>,
    pub guest_card_id: Option<String>,
    pub global_session_id: Option<String>,
    pub global_session_id_building: Option<String>,
    pub lead_first_name: Option<String>,
    pub lead_last_name: Option<String>,
    pub lead_email: Option<String>,
    pub lead_phone_number: Option<String>,
    pub channel: Option<String>,
    pub marketing_source: Option<String>,
    pub event_type: Option<String>,
    pub event_datetime: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
}

/// Inclusive calendar date range for one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::DateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The full calendar month before the one containing `today`.
    pub fn previous_month(today: NaiveDate) -> Self {
        let first_of_month = today - Duration::days(i64::from(today.day0()));
        let end = first_of_month - Duration::days(1);
        let start = end - Duration::days(i64::from(end.day0()));
        Self { start, end }
    }

    /// "January 2025" style label of the month the range starts in.
    pub fn month_label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_param(), self.end_param())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_and_null_fields_are_none() {
        let record: EventRecord =
            serde_json::from_value(json!({"event_id": "e1", "building_name": null})).unwrap();
        assert_eq!(record.event_id.as_deref(), Some("e1"));
        assert!(record.building_name.is_none());
        assert!(record.marketing_source.is_none());
    }

    #[test]
    fn numeric_ids_are_kept_as_text() {
        let record: EventRecord =
            serde_json::from_value(json!({"event_id": 12345, "guest_card_id": 7.5})).unwrap();
        assert_eq!(record.event_id.as_deref(), Some("12345"));
        assert_eq!(record.guest_card_id.as_deref(), Some("7.5"));
    }

    #[test]
    fn nested_values_are_rejected() {
        let result: Result<EventRecord, _> =
            serde_json::from_value(json!({"event_id": {"nested": true}}));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record: EventRecord =
            serde_json::from_value(json!({"event_id": "e1", "extra": [1, 2]})).unwrap();
        assert_eq!(record.log_id(), "e1");
    }

    #[test]
    fn previous_month_mid_year() {
        let range = DateRange::previous_month(date(2025, 3, 14));
        assert_eq!(range.start, date(2025, 2, 1));
        assert_eq!(range.end, date(2025, 2, 28));
        assert_eq!(range.month_label(), "February 2025");
    }

    #[test]
    fn previous_month_wraps_year() {
        let range = DateRange::previous_month(date(2025, 1, 1));
        assert_eq!(range.start, date(2024, 12, 1));
        assert_eq!(range.end, date(2024, 12, 31));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(DateRange::new(date(2025, 2, 1), date(2025, 1, 1)).is_err());
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        assert_eq!(range.to_string(), "2025-01-01 to 2025-01-31");
    }
}
