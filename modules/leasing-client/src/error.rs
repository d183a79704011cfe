use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failure reaching the reporting API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Payload that is neither newline-delimited JSON nor a JSON array of events.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported payload shape: expected NDJSON text or a JSON array, got {0}")]
    UnsupportedShape(&'static str),

    #[error("Malformed event on line {line}: {message}")]
    MalformedLine { line: usize, message: String },

    #[error("Malformed JSON array: {0}")]
    MalformedArray(String),

    #[error("Malformed event at index {index}: {message}")]
    MalformedElement { index: usize, message: String },
}
