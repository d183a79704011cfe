//! Decoding of report payloads into event records.
//!
//! The API has been observed returning both newline-delimited JSON and a
//! plain JSON array for the same endpoint. Neither shape is documented as
//! canonical, so both are accepted. Treat this as a fragile contract: if a
//! third shape shows up it is rejected rather than guessed at.

use execsummary_common::EventRecord;
use serde_json::Value;

use crate::error::ParseError;

/// Report body as it came off the wire, or already decoded by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Text(String),
    Json(Value),
}

/// Parse a payload into event records, preserving input order.
///
/// Any malformed line or element fails the whole payload.
pub fn parse_payload(payload: RawPayload) -> Result<Vec<EventRecord>, ParseError> {
    match payload {
        RawPayload::Text(body) => parse_text(&body),
        RawPayload::Json(Value::Array(items)) => parse_array(items),
        RawPayload::Json(other) => Err(ParseError::UnsupportedShape(shape_name(&other))),
    }
}

fn parse_text(body: &str) -> Result<Vec<EventRecord>, ParseError> {
    if body.trim_start().starts_with('[') {
        let items: Vec<Value> =
            serde_json::from_str(body).map_err(|e| ParseError::MalformedArray(e.to_string()))?;
        return parse_array(items);
    }
    parse_lines(body)
}

fn parse_lines(body: &str) -> Result<Vec<EventRecord>, ParseError> {
    body.split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<Value>(line.trim())
                .map_err(|e| e.to_string())
                .and_then(event_from_value)
                .map_err(|message| ParseError::MalformedLine {
                    line: idx + 1,
                    message,
                })
        })
        .collect()
}

fn parse_array(items: Vec<Value>) -> Result<Vec<EventRecord>, ParseError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            event_from_value(item).map_err(|message| ParseError::MalformedElement { index, message })
        })
        .collect()
}

/// Each line or element must be one JSON object. Serde would otherwise
/// read a sequence positionally into the record's fields.
fn event_from_value(value: Value) -> Result<EventRecord, String> {
    if !value.is_object() {
        return Err(format!("expected an event object, got {}", shape_name(&value)));
    }
    serde_json::from_value::<EventRecord>(value).map_err(|e| e.to_string())
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
