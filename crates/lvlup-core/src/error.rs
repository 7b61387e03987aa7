//! Error types for lvlup API operations.
//!
//! Every fallible call in the workspace reports through [`Error`]. Local
//! validation failures, remote status failures and transport failures share
//! one enum so callers branch on a single type.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::envelope::Envelope;

/// Main error type for lvlup operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A scalar argument was rejected before any request was made
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The pagination parameter was rejected before any request was made
    #[error("Invalid pagination parameter: {0}")]
    InvalidPagination(String),

    /// A sandbox-only operation was called on a deployment client
    #[error("{0}")]
    SandboxOnly(String),

    /// The API answered with a status other than 200
    #[error(
        "Request to {} failed with status {} {}",
        .envelope.source,
        .envelope.status_code,
        .envelope.status_text
    )]
    Status {
        /// Status envelope of the failed request
        envelope: Envelope,
        /// Human-readable hint for well-known statuses of the endpoint
        info: Option<String>,
    },

    /// The API answered 200 but the body could not be decoded
    #[error("Invalid response body from {}: {message}", .envelope.source)]
    InvalidBody {
        /// Status envelope of the request
        envelope: Envelope,
        /// Decoder message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The API could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request URL could not be assembled
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for lvlup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Status envelope, when the error came from the API
    #[serde(flatten)]
    pub envelope: Option<Envelope>,
    /// Endpoint specific hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::InvalidPagination(_) => "INVALID_PAGINATION",
            Self::SandboxOnly(_) => "SANDBOX_ONLY",
            Self::Status { .. } => "REMOTE_STATUS",
            Self::InvalidBody { .. } => "INVALID_BODY",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns the status envelope if the error originated from an API response.
    #[must_use]
    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            Self::Status { envelope, .. } | Self::InvalidBody { envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    /// Returns the HTTP status code if the error originated from an API response.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.envelope().map(|envelope| envelope.status_code)
    }

    /// Returns the endpoint hint attached to a status failure.
    #[must_use]
    pub fn info(&self) -> Option<&str> {
        match self {
            Self::Status { info, .. } => info.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the failure happened locally and no request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::InvalidPagination(_)
                | Self::SandboxOnly(_)
                | Self::ConfigError(_)
                | Self::InvalidEndpoint(_)
        )
    }

    /// Attach `info` to a [`Error::Status`] whose status code equals `status`.
    ///
    /// Any other error is returned untouched.
    #[must_use]
    pub fn with_status_hint(self, status: StatusCode, info: impl Into<String>) -> Self {
        match self {
            Self::Status { envelope, .. } if envelope.status_code == status.as_u16() => {
                Self::Status {
                    envelope,
                    info: Some(info.into()),
                }
            }
            other => other,
        }
    }

    /// Converts the error into an [`ErrorResponse`].
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        let code = self.error_code().to_string();
        let message = self.to_string();
        let info = self.info().map(str::to_string);
        let envelope = self.envelope().cloned();

        ErrorResponse {
            code,
            message,
            envelope,
            info,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::HttpError(format!("JSON encoding failed: {err}"))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
