pub mod error;
pub mod payload;

pub use error::{FetchError, ParseError, Result};
pub use payload::{parse_payload, RawPayload};

use std::time::Duration;

use execsummary_common::DateRange;

/// Header carrying the pre-shared key.
const SECURITY_HEADER: &str = "X-SecurityKey";

#[derive(Debug, Clone)]
pub struct ReportingClientOptions {
    pub endpoint: String,
    pub security_key: String,
    pub timeout: Duration,
}

/// Client for the leasing events report endpoint.
pub struct ReportingClient {
    client: reqwest::Client,
    endpoint: String,
    security_key: String,
}

impl ReportingClient {
    pub fn new(options: ReportingClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: options.endpoint.trim_end_matches('/').to_string(),
            security_key: options.security_key,
        })
    }

    /// Fetch the raw events report for `range`. The body is returned unparsed.
    pub async fn fetch_events(&self, range: &DateRange) -> Result<RawPayload> {
        tracing::info!(endpoint = %self.endpoint, range = %range, "Fetching events report");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("start_date", range.start_param()),
                ("end_date", range.end_param()),
            ])
            .header(SECURITY_HEADER, &self.security_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        tracing::info!(bytes = body.len(), "Events report received");
        Ok(RawPayload::Text(body))
    }
}
