//! Error types for the library layer.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding configuration, rate-limit, storage and input failures.
#[derive(Debug)]
pub enum DashboardError {
    /// An error from the underlying API client.
    Api(dashboard_api::Error),
    /// The request was rejected locally before reaching the network.
    RateLimited { reset_in: Duration },
    /// Required configuration is missing or malformed.
    Config(String),
    /// The persisted key-value store could not be read or written.
    Storage(String),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "{}", e),
            Self::RateLimited { reset_in } => write!(
                f,
                "Rate limit exceeded. Please try again in {} minute(s).",
                reset_in.as_secs().div_ceil(60).max(1)
            ),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<dashboard_api::Error> for DashboardError {
    fn from(e: dashboard_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl DashboardError {
    /// Flattens this error into the normalized record surfaced to callers.
    pub fn to_info(&self) -> ApiErrorInfo {
        match self {
            Self::Api(e) => ApiErrorInfo {
                message: e.to_string(),
                http_status: e.status(),
                transport_code: e.transport_code(),
            },
            Self::RateLimited { .. } => ApiErrorInfo {
                message: self.to_string(),
                http_status: None,
                transport_code: Some("RATE_LIMITED".to_string()),
            },
            other => ApiErrorInfo {
                message: other.to_string(),
                http_status: None,
                transport_code: None,
            },
        }
    }
}

/// Normalized view of a failed call: message plus optional HTTP status and
/// transport code. Never carries the underlying transport error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorInfo {
    pub message: String,
    pub http_status: Option<u16>,
    pub transport_code: Option<String>,
}

impl ApiErrorInfo {
    /// No HTTP response was received.
    pub fn is_network_error(&self) -> bool {
        self.http_status.is_none() && self.transport_code.is_some() && !self.is_rate_limited()
    }

    /// Rejected locally by the client-side rate limiter.
    pub fn is_rate_limited(&self) -> bool {
        self.transport_code.as_deref() == Some("RATE_LIMITED")
    }

    pub fn is_server_error(&self) -> bool {
        self.http_status.is_some_and(|s| s >= 500)
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status.is_some_and(|s| (400..500).contains(&s))
    }
}
