/// Destination table for leasing events.
pub const TABLE_NAME: &str = "exec_summary_events";

/// Column widths match `execsummary_common::FieldLimits::default()`.
pub const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS exec_summary_events (
    event_id                    VARCHAR(100),
    conversation_id             VARCHAR(100),
    building_name               VARCHAR(200),
    guest_card_id               VARCHAR(100),
    global_session_id           VARCHAR(100),
    global_session_id_building  VARCHAR(100),
    lead_first_name             VARCHAR(100),
    lead_last_name              VARCHAR(100),
    lead_email                  VARCHAR(200),
    lead_phone_number           VARCHAR(100),
    channel                     VARCHAR(50),
    marketing_source            VARCHAR(100),
    event_type                  VARCHAR(50),
    event_datetime              TIMESTAMPTZ,
    created_date                TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub(crate) const INSERT_SQL: &str = r#"
INSERT INTO exec_summary_events (
    event_id, conversation_id, building_name, guest_card_id,
    global_session_id, global_session_id_building,
    lead_first_name, lead_last_name, lead_email, lead_phone_number,
    channel, marketing_source, event_type, event_datetime, created_date
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, now())
"#;

pub(crate) const SELECT_ALL_SQL: &str = r#"
SELECT event_id, conversation_id, building_name, guest_card_id,
       global_session_id, global_session_id_building,
       lead_first_name, lead_last_name, lead_email, lead_phone_number,
       channel, marketing_source, event_type, event_datetime, created_date
FROM exec_summary_events
"#;
