use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use execsummary_common::DateRange;
use execsummary_ingest::{
    EventFeed, Loader, LoaderOptions, NotificationError, Notifier, PayloadSource, Pipeline,
    RunError, RunReporter, FAILURE_SUBJECT, SUCCESS_SUBJECT,
};
use execsummary_store::MemoryEventStore;
use leasing_client::{FetchError, RawPayload};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(NotificationError::Transport("relay refused".to_string()));
        }
        Ok(())
    }
}

enum StubFeed {
    Body(RawPayload),
    Down,
}

#[async_trait]
impl EventFeed for StubFeed {
    async fn fetch(&self, _range: &DateRange) -> Result<RawPayload, FetchError> {
        match self {
            StubFeed::Body(payload) => Ok(payload.clone()),
            StubFeed::Down => Err(FetchError::Network("connection refused".to_string())),
        }
    }
}

fn january() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
    )
    .unwrap()
}

fn ndjson(ids: &[&str]) -> String {
    ids.iter()
        .map(|id| {
            format!(
                r#"{{"event_id":"{id}","building_name":"Riverside","marketing_source":"Zillow","event_type":"state","event_datetime":"2025-01-10T12:00:00Z"}}"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pipeline(
    source: PayloadSource,
    store: &MemoryEventStore,
    notifier: Arc<RecordingNotifier>,
) -> Pipeline {
    Pipeline::new(
        source,
        Loader::new(Arc::new(store.clone()), LoaderOptions::default()),
        RunReporter::new(notifier),
    )
}

fn feed(body: String) -> PayloadSource {
    PayloadSource::Feed(Arc::new(StubFeed::Body(RawPayload::Text(body))))
}

#[tokio::test]
async fn successful_run_loads_events_and_sends_summary() {
    let store = MemoryEventStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    store.fail_insert_for("e3");

    let report = pipeline(feed(ndjson(&["e1", "e2", "e3", "e4", "e5"])), &store, notifier.clone())
        .run(&january())
        .await
        .unwrap();

    assert_eq!(report.tally.total, 5);
    assert_eq!(report.tally.processed, 4);
    assert_eq!(report.tally.errors, 1);

    let ids: Vec<String> = store.rows().into_iter().filter_map(|r| r.event_id).collect();
    assert_eq!(ids, vec!["e1", "e2", "e4", "e5"]);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, SUCCESS_SUBJECT);
    assert!(sent[0].1.contains("Date Range: 2025-01-01 to 2025-01-31"));
    assert!(sent[0].1.contains("Events Processed: 4"));
    assert!(sent[0].1.contains("Errors: 1"));
}

#[tokio::test]
async fn json_array_payload_loads_the_same_events() {
    let store = MemoryEventStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let body = serde_json::json!([
        {"event_id": "a1", "event_type": "tour_booked"},
        {"event_id": "a2", "event_type": "state"},
        {"event_id": "a3"}
    ]);
    let source = PayloadSource::Feed(Arc::new(StubFeed::Body(RawPayload::Json(body))));

    let report = pipeline(source, &store, notifier).run(&january()).await.unwrap();

    assert_eq!(report.tally.processed, 3);
    assert_eq!(store.rows().len(), 3);
}

#[tokio::test]
async fn fetch_failure_sends_error_notification_and_fails_the_run() {
    let store = MemoryEventStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let source = PayloadSource::Feed(Arc::new(StubFeed::Down));

    let result = pipeline(source, &store, notifier.clone()).run(&january()).await;

    assert!(matches!(result, Err(RunError::Fetch(FetchError::Network(_)))));
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, FAILURE_SUBJECT);
    assert!(sent[0].1.starts_with("Error processing events: "));
    assert!(sent[0].1.contains("connection refused"));
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn malformed_payload_is_a_parse_failure() {
    let store = MemoryEventStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let body = format!("{}\n{{not json", ndjson(&["e1"]));

    let result = pipeline(feed(body), &store, notifier.clone()).run(&january()).await;

    assert!(matches!(result, Err(RunError::Parse(_))));
    assert_eq!(notifier.sent()[0].0, FAILURE_SUBJECT);
    assert!(store.rows().is_empty());
}

#[tokio::test]
async fn schema_failure_stops_before_fetching() {
    let store = MemoryEventStore::new();
    store.fail_schema();
    let notifier = Arc::new(RecordingNotifier::default());

    let result = pipeline(PayloadSource::Feed(Arc::new(StubFeed::Down)), &store, notifier.clone())
        .run(&january())
        .await;

    assert!(matches!(result, Err(RunError::Schema(_))));
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn notifier_failure_does_not_change_the_outcome() {
    let store = MemoryEventStore::new();
    let notifier = Arc::new(RecordingNotifier::failing());

    let ok = pipeline(feed(ndjson(&["e1"])), &store, notifier.clone())
        .run(&january())
        .await;
    assert!(ok.is_ok());

    let failed = pipeline(PayloadSource::Feed(Arc::new(StubFeed::Down)), &store, notifier.clone())
        .run(&january())
        .await;
    assert!(matches!(failed, Err(RunError::Fetch(_))));

    assert_eq!(notifier.sent().len(), 2);
}

#[tokio::test]
async fn repeated_runs_reuse_the_existing_table() {
    let store = MemoryEventStore::new();
    let notifier = Arc::new(RecordingNotifier::default());

    for ids in [["e1", "e2"], ["e3", "e4"]] {
        pipeline(feed(ndjson(&ids)), &store, notifier.clone())
            .run(&january())
            .await
            .unwrap();
    }

    assert_eq!(store.schema_calls(), 2);
    assert_eq!(store.rows().len(), 4);
}

#[tokio::test]
async fn saved_payload_file_is_loaded_without_fetching() {
    let path = std::env::temp_dir().join(format!("execsummary-payload-{}.ndjson", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", ndjson(&["f1", "f2"])).unwrap();
    }

    let store = MemoryEventStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let report = pipeline(PayloadSource::File(path.clone()), &store, notifier)
        .run(&january())
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(report.tally.processed, 2);
}

#[tokio::test]
async fn missing_payload_file_is_a_payload_error() {
    let store = MemoryEventStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let source = PayloadSource::File("/nonexistent/events.ndjson".into());

    let result = pipeline(source, &store, notifier.clone()).run(&january()).await;

    assert!(matches!(result, Err(RunError::Payload { .. })));
    assert_eq!(notifier.sent()[0].0, FAILURE_SUBJECT);
}
