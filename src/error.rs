use serde_json::Value;
use thiserror::Error;

const STATUS_UNAUTHORIZED: u16 = 401;

/// Error returned by every operation that talks to the Bank Account Data API.
///
/// Transport failures, error responses and malformed payloads are all folded
/// into this one shape. The status code and body are attached whenever the
/// failing response provided them.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct NordigenApiError {
    message: String,
    status_code: Option<u16>,
    response_body: Option<Value>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl NordigenApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            response_body: None,
            source: None,
        }
    }

    pub fn with_response(
        message: impl Into<String>,
        status_code: Option<u16>,
        response_body: Option<Value>,
    ) -> Self {
        Self {
            message: message.into(),
            status_code,
            response_body,
            source: None,
        }
    }

    /// Build an error from a non-success API response.
    ///
    /// The API repeats the status in a `status_code` field of its error body;
    /// that value wins over the HTTP status when present. Bodies that are not
    /// JSON are kept as a JSON string.
    pub(crate) fn from_api_response(context: &str, http_status: u16, body: &str) -> Self {
        let response_body = match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(_) => Value::String(body.to_string()),
        };

        let status_code = response_body
            .get("status_code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(http_status);

        Self::with_response(
            format!("{}: {}", context, response_body),
            Some(status_code),
            Some(response_body),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }

    /// True when the API rejected the credentials or token in use
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(STATUS_UNAUTHORIZED)
    }
}

impl From<reqwest::Error> for NordigenApiError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            message: format!("HTTP request failed: {}", e),
            status_code: e.status().map(|status| status.as_u16()),
            response_body: None,
            source: Some(Box::new(e)),
        }
    }
}

impl From<serde_json::Error> for NordigenApiError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            message: format!("Malformed API response: {}", e),
            status_code: None,
            response_body: None,
            source: Some(Box::new(e)),
        }
    }
}

pub type Result<T> = std::result::Result<T, NordigenApiError>;

/// Errors surfaced by the `nordigen-account` binary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Nordigen API error: {0}")]
    Nordigen(#[from] NordigenApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
