use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::aggregate::SignalRules;
use crate::error::ConfigError;

pub const DEFAULT_REPORTING_API_URL: &str =
    "https://app.meetelise.com/reportingApi/leasing/generateReport/events";

/// SMTP relay credentials for run notifications.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
}

/// Application configuration loaded from environment variables.
/// Built once per process and handed to each component at construction.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,

    // Reporting API
    pub reporting_api_url: String,
    pub reporting_api_key: String,
    pub fetch_timeout: Duration,

    // Loader
    pub insert_timeout: Duration,
    pub insert_concurrency: usize,

    // Notifications
    pub smtp: Option<SmtpConfig>,
    pub notify_from: Option<String>,
    pub notify_recipients: Vec<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Dashboard
    pub properties: Vec<String>,
    pub signal_rules: SignalRules,
}

impl Config {
    /// Load the configuration for an ingestion run.
    pub fn ingest_from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::ingest_from(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Load a minimal config for the web server (no reporting API key needed).
    pub fn web_from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::web_from(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    pub fn ingest_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::base_from(&lookup)?;
        config.reporting_api_key = required(&lookup, "REPORTING_API_KEY")?;
        config.smtp = smtp_from(&lookup)?;
        config.notify_from = lookup("NOTIFY_FROM")
            .or_else(|| config.smtp.as_ref().map(|s| s.username.clone()));
        config.notify_recipients = lookup("NOTIFY_RECIPIENTS")
            .map(|v| split_list(&v))
            .unwrap_or_default();
        Ok(config)
    }

    pub fn web_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::base_from(&lookup)
    }

    /// Build from a fixed map. Handy for tests and one-off tools.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::ingest_from(|key| vars.get(key).cloned())
    }

    fn base_from(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = SignalRules::default();
        let signal_rules = SignalRules {
            lead_types: lookup("LEAD_EVENT_TYPES")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.lead_types),
            tour_types: lookup("TOUR_EVENT_TYPES")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.tour_types),
        };

        Ok(Self {
            database_url: required(lookup, "DATABASE_URL")?,
            db_max_connections: parsed(lookup, "DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout: Duration::from_secs(parsed(lookup, "DB_ACQUIRE_TIMEOUT_SECS", 10)?),
            reporting_api_url: lookup("REPORTING_API_URL")
                .unwrap_or_else(|| DEFAULT_REPORTING_API_URL.to_string()),
            reporting_api_key: String::new(),
            fetch_timeout: Duration::from_secs(parsed(lookup, "FETCH_TIMEOUT_SECS", 120)?),
            insert_timeout: Duration::from_secs(parsed(lookup, "INSERT_TIMEOUT_SECS", 30)?),
            insert_concurrency: parsed::<usize>(lookup, "INSERT_CONCURRENCY", 4)?.max(1),
            smtp: None,
            notify_from: None,
            notify_recipients: Vec::new(),
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port: parsed(lookup, "WEB_PORT", 3001)?,
            properties: lookup("DASHBOARD_PROPERTIES")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            signal_rules,
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().count().min(5);
            let head: String = val.chars().take(n).collect();
            format!("{}...({} chars)", head, val.chars().count())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  DATABASE_URL: {}", preview(&self.database_url));
        if !self.reporting_api_key.is_empty() {
            tracing::info!("  REPORTING_API_URL: {}", self.reporting_api_url);
            tracing::info!("  REPORTING_API_KEY: {}", preview(&self.reporting_api_key));
        }
        match &self.smtp {
            Some(smtp) => tracing::info!(
                "  SMTP: {} as {} -> {} recipient(s)",
                smtp.host,
                smtp.username,
                self.notify_recipients.len()
            ),
            None => tracing::info!("  SMTP: <not set>, notifications go to the log"),
        }
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// All three SMTP variables or none of them.
fn smtp_from(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<SmtpConfig>, ConfigError> {
    const KEYS: [&str; 3] = ["SMTP_HOST", "SMTP_USERNAME", "SMTP_PASSWORD"];
    match KEYS.map(|key| lookup(key)) {
        [Some(host), Some(username), Some(password)] => Ok(Some(SmtpConfig {
            host,
            username,
            password,
        })),
        [None, None, None] => Ok(None),
        values => {
            let missing: Vec<&str> = KEYS
                .iter()
                .zip(&values)
                .filter(|(_, v)| v.is_none())
                .map(|(k, _)| *k)
                .collect();
            Err(ConfigError::Invalid {
                key: "SMTP".to_string(),
                message: format!("incomplete settings, missing {}", missing.join(", ")),
            })
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
