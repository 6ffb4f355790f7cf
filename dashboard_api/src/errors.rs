//! Error types for the API client.

/// Transport-level failure codes for requests that never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    /// Could not connect to the remote host.
    Connect,
    /// The request could not be built or sent.
    Request,
    /// The response body could not be read.
    Body,
    /// Any other transport failure.
    Other,
}

impl std::fmt::Display for TransportCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransportCode::Connect => "ECONNREFUSED",
                TransportCode::Request => "ERR_REQUEST",
                TransportCode::Body => "ERR_BODY",
                TransportCode::Other => "NETWORK_ERROR",
            }
        )
    }
}

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No response was received (connectivity problem).
    #[error("Network error - check internet connection")]
    Network { code: TransportCode },
    /// The request exceeded the configured timeout.
    #[error("Request timeout - server took too long to respond")]
    Timeout,
    /// The API returned a non-success status with a body snippet.
    #[error("{}", describe_status(*status))]
    HttpStatus { status: u16, body: String },
    /// The response body did not have the expected shape.
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
    /// The request URL could not be constructed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport code for failures that produced no response.
    pub fn transport_code(&self) -> Option<String> {
        match self {
            Error::Network { code } => Some(code.to_string()),
            Error::Timeout => Some("ECONNABORTED".to_string()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

fn describe_status(status: u16) -> String {
    match status {
        401 => "Unauthorized - please sign in again".to_string(),
        403 => "Access forbidden - check API credentials".to_string(),
        404 => "Resource not found - check URL configuration".to_string(),
        429 => "Too many requests - server rate limit exceeded".to_string(),
        500..=599 => "Server error - please try again later".to_string(),
        _ => format!("Request failed with status {}", status),
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else if e.is_connect() {
            Error::Network {
                code: TransportCode::Connect,
            }
        } else if e.is_body() || e.is_decode() {
            Error::Network {
                code: TransportCode::Body,
            }
        } else if e.is_request() || e.is_builder() {
            Error::Network {
                code: TransportCode::Request,
            }
        } else {
            Error::Network {
                code: TransportCode::Other,
            }
        }
    }
}
