//! Fetch tests against a local stand-in for the reporting API.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use execsummary_common::DateRange;
use leasing_client::{parse_payload, FetchError, RawPayload, ReportingClient, ReportingClientOptions};

const KEY: &str = "test-security-key";

async fn events(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
    if headers.get("X-SecurityKey").and_then(|v| v.to_str().ok()) != Some(KEY) {
        return (StatusCode::UNAUTHORIZED, "bad key".to_string());
    }
    let start = params.get("start_date").cloned().unwrap_or_default();
    let end = params.get("end_date").cloned().unwrap_or_default();
    let body = format!(
        "{{\"event_id\":\"start-{start}\",\"event_type\":\"state\"}}\n\n{{\"event_id\":\"end-{end}\"}}\n"
    );
    (StatusCode::OK, body)
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    ""
}

/// Serve a router on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let app = Router::new()
        .route("/events", get(events))
        .route("/slow", get(slow));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(endpoint: String, key: &str, timeout: Duration) -> ReportingClient {
    ReportingClient::new(ReportingClientOptions {
        endpoint,
        security_key: key.to_string(),
        timeout,
    })
    .unwrap()
}

fn january() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn sends_key_and_date_range() {
    let base = spawn_server().await;
    let client = client(format!("{base}/events"), KEY, Duration::from_secs(5));

    let payload = client.fetch_events(&january()).await.unwrap();
    let RawPayload::Text(body) = &payload else {
        panic!("expected a text payload");
    };
    assert!(body.contains("start-2025-01-01"));

    let records = parse_payload(payload).unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.log_id()).collect();
    assert_eq!(ids, vec!["start-2025-01-01", "end-2025-01-31"]);
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let base = spawn_server().await;
    let client = client(format!("{base}/events"), "wrong-key", Duration::from_secs(5));

    let err = client.fetch_events(&january()).await.unwrap_err();
    match err {
        FetchError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "bad key");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let base = spawn_server().await;
    let client = client(format!("{base}/slow"), KEY, Duration::from_millis(200));

    let err = client.fetch_events(&january()).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{addr}/events"), KEY, Duration::from_secs(2));
    let err = client.fetch_events(&january()).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}
