use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use tracing::warn;

use crate::components::report::FETCH_ERROR_MESSAGE;
use crate::components::{render_report, report_rows, ReportView};
use crate::export::{export_filename, render_svg};
use crate::rest::PropertyQuery;
use crate::AppState;

pub async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PropertyQuery>,
) -> impl IntoResponse {
    let filter = query.filter();

    let rows = match state.summaries(&filter).await {
        Ok(summaries) => Ok(report_rows(&summaries)),
        Err(e) => {
            warn!(error = %e, "Failed to load dashboard data");
            Err(FETCH_ERROR_MESSAGE.to_string())
        }
    };

    let view = ReportView {
        month_label: state.report_month(),
        properties: state.selector_values(),
        selected: filter.label().to_string(),
        export_href: format!("/export?property={}", urlencoding::encode(filter.label())),
        rows,
        last_updated: Utc::now().format("%b %-d, %Y %-I:%M %p UTC").to_string(),
    };

    Html(render_report(view))
}

pub async fn export_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PropertyQuery>,
) -> Response {
    let summaries = match state.summaries(&query.filter()).await {
        Ok(summaries) => summaries,
        Err(e) => {
            warn!(error = %e, "Failed to load export data");
            return (StatusCode::INTERNAL_SERVER_ERROR, FETCH_ERROR_MESSAGE).into_response();
        }
    };

    let month = state.report_month();
    let svg = render_svg(&format!("Leads & Tours - {month}"), &report_rows(&summaries));
    let disposition = format!("attachment; filename=\"{}\"", export_filename(&month));

    (
        [
            (header::CONTENT_TYPE, "image/svg+xml".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        svg,
    )
        .into_response()
}
