use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use execsummary_common::PropertyFilter;
use execsummary_store::EventReader;
use serde::Deserialize;
use tracing::warn;

use crate::AppState;

// --- Query structs ---

#[derive(Debug, Default, Deserialize)]
pub struct PropertyQuery {
    pub property: Option<String>,
}

impl PropertyQuery {
    pub fn filter(&self) -> PropertyFilter {
        PropertyFilter::from_selection(self.property.as_deref())
    }
}

// --- Handlers ---

/// Every stored row, unfiltered.
pub async fn api_data(State(state): State<Arc<AppState>>) -> Response {
    match state.reader.all_events().await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to read events");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// Aggregated leads & tours, optionally for one building.
pub async fn api_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PropertyQuery>,
) -> Response {
    match state.summaries(&query.filter()).await {
        Ok(summaries) => Json(summaries).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to build summary");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

pub async fn api_properties(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.selector_values())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
