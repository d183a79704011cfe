use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use execsummary_common::EventRecord;

use crate::error::InsertError;

/// A sanitized event ready to insert. `created_date` is assigned by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEventRow {
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
}

impl NewEventRow {
    /// Build a row from an already-sanitized record.
    ///
    /// Fails only when `event_datetime` is present but unreadable.
    pub fn from_record(record: &EventRecord) -> Result<Self, InsertError> {
        let event_datetime = match record.event_datetime.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                parse_event_datetime(raw)
                    .ok_or_else(|| InsertError::InvalidDatetime(raw.to_string()))?,
            ),
        };

        Ok(Self {
            event_id: record.event_id.clone(),
            conversation_id: record.conversation_id.clone(),
            building_name: record.building_name.clone(),
            guest_card_id: record.guest_card_id.clone(),
            global_session_id: record.global_session_id.clone(),
            global_session_id_building: record.global_session_id_building.clone(),
            lead_first_name: record.lead_first_name.clone(),
            lead_last_name: record.lead_last_name.clone(),
            lead_email: record.lead_email.clone(),
            lead_phone_number: record.lead_phone_number.clone(),
            channel: record.channel.clone(),
            marketing_source: record.marketing_source.clone(),
            event_type: record.event_type.clone(),
            event_datetime,
        })
    }

    pub fn log_id(&self) -> &str {
        self.event_id.as_deref().unwrap_or("<no event_id>")
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an upstream timestamp. RFC 3339 first, then naive forms read as UTC.
pub fn parse_event_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rfc3339_with_offset_is_normalised_to_utc() {
        let dt = parse_event_datetime("2025-01-15T09:30:00-05:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn naive_forms_are_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap();
        assert_eq!(parse_event_datetime("2025-01-15T09:30:00"), Some(expected));
        assert_eq!(parse_event_datetime("2025-01-15 09:30:00.000"), Some(expected));
        assert_eq!(parse_event_datetime("2025-01-15 09:30"), Some(expected));
        assert_eq!(
            parse_event_datetime("2025-01-15"),
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_event_datetime("last tuesday").is_none());
    }

    #[test]
    fn missing_datetime_is_null_not_error() {
        let row = NewEventRow::from_record(&EventRecord {
            event_id: Some("e1".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(row.event_datetime.is_none());
        assert_eq!(row.log_id(), "e1");
    }

    #[test]
    fn unreadable_datetime_fails_the_record() {
        let err = NewEventRow::from_record(&EventRecord {
            event_datetime: Some("not a date".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, InsertError::InvalidDatetime(_)));
    }
}
