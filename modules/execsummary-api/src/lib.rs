//! Web side of the exec summary: raw rows as JSON, the leads & tours
//! rollup, and the dashboard page with its image export.

pub mod components;
pub mod export;
pub mod pages;
pub mod rest;
pub mod templates;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use chrono::Utc;
use execsummary_common::{
    aggregate, BuildingSummary, DateRange, PropertyFilter, SignalRules, ALL_PROPERTIES,
};
use execsummary_store::{EventReader, StoreError};
use tower_http::set_header::SetResponseHeaderLayer;

pub struct AppState {
    pub reader: Arc<dyn EventReader>,
    /// Buildings offered in the selector, in configured order.
    pub properties: Vec<String>,
    pub rules: SignalRules,
}

impl AppState {
    /// Selector values: the all-properties sentinel, then each configured building.
    pub fn selector_values(&self) -> Vec<String> {
        std::iter::once(ALL_PROPERTIES.to_string())
            .chain(
                self.properties
                    .iter()
                    .filter(|p| p.as_str() != ALL_PROPERTIES)
                    .cloned(),
            )
            .collect()
    }

    /// The month the dashboard reports on, e.g. "January 2025".
    pub fn report_month(&self) -> String {
        DateRange::previous_month(Utc::now().date_naive()).month_label()
    }

    pub async fn summaries(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<BuildingSummary>, StoreError> {
        let rows = self.reader.all_events().await?;
        Ok(aggregate(&rows, filter, &self.rules))
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(|| async { "ok" }))
        // Dashboard (Dioxus SSR)
        .route("/", get(pages::dashboard_page))
        .route("/export", get(pages::export_image))
        // REST API
        .route("/api/data", get(rest::api_data))
        .route("/api/summary", get(rest::api_summary))
        .route("/api/properties", get(rest::api_properties))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Method + path only, no query string
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
