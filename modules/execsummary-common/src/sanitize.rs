//! Truncation of event fields to the column widths of the events table.

use crate::types::EventRecord;

/// Maximum length, in characters, of each text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub event_id: usize,
    pub conversation_id: usize,
    pub building_name: usize,
    pub guest_card_id: usize,
    pub global_session_id: usize,
    pub global_session_id_building: usize,
    pub lead_first_name: usize,
    pub lead_last_name: usize,
    pub lead_email: usize,
    pub lead_phone_number: usize,
    pub channel: usize,
    pub marketing_source: usize,
    pub event_type: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            event_id: 100,
            conversation_id: 100,
            building_name: 200,
            guest_card_id: 100,
            global_session_id: 100,
            global_session_id_building: 100,
            lead_first_name: 100,
            lead_last_name: 100,
            lead_email: 200,
            lead_phone_number: 100,
            channel: 50,
            marketing_source: 100,
            event_type: 50,
        }
    }
}

/// Cut `value` down to at most `limit` characters. Never splits a code point.
pub fn truncate(value: Option<&str>, limit: usize) -> Option<String> {
    let value = value?;
    match value.char_indices().nth(limit) {
        Some((byte_idx, _)) => Some(value[..byte_idx].to_string()),
        None => Some(value.to_string()),
    }
}

/// Copy of `record` with every text field cut to its column width.
///
/// `event_datetime` is left alone; the loader parses it into a timestamp.
pub fn sanitize(record: &EventRecord, limits: &FieldLimits) -> EventRecord {
    EventRecord {
        event_id: truncate(record.event_id.as_deref(), limits.event_id),
        conversation_id: truncate(record.conversation_id.as_deref(), limits.conversation_id),
        building_name: truncate(record.building_name.as_deref(), limits.building_name),
        guest_card_id: truncate(record.guest_card_id.as_deref(), limits.guest_card_id),
        global_session_id: truncate(record.global_session_id.as_deref(), limits.global_session_id),
        global_session_id_building: truncate(
            record.global_session_id_building.as_deref(),
            limits.global_session_id_building,
        ),
        lead_first_name: truncate(record.lead_first_name.as_deref(), limits.lead_first_name),
        lead_last_name: truncate(record.lead_last_name.as_deref(), limits.lead_last_name),
        lead_email: truncate(record.lead_email.as_deref(), limits.lead_email),
        lead_phone_number: truncate(record.lead_phone_number.as_deref(), limits.lead_phone_number),
        channel: truncate(record.channel.as_deref(), limits.channel),
        marketing_source: truncate(record.marketing_source.as_deref(), limits.marketing_source),
        event_type: truncate(record.event_type.as_deref(), limits.event_type),
        event_datetime: record.event_datetime.clone(),
    }
}
