use std::fmt;

/// Errors that can occur while talking to the comment backend.
///
/// Every variant is treated the same way by the reply composer (a generic
/// "failed to post" notification); the split exists for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Client misconfigured (bad base URL, client build failure).
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// Backend answered with a non-2xx status.
    Api { status: u16, message: String },
    /// Response body was not the JSON we expected.
    Parse(String),
    /// No answer within the configured request timeout.
    Timeout { after_secs: u64 },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(msg) => write!(f, "config error: {msg}"),
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Timeout { after_secs } => {
                write!(f, "request timed out after {after_secs}s")
            }
        }
    }
}

impl std::error::Error for ApiError {}
