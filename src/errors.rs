//! Error types surfaced by the news backends and the single-item fetch path.

use thiserror::Error;

/// Classified transport/API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    Timeout,
    NotFound,
    Forbidden,
    RateLimited,
    ServerError,
    ServiceUnavailable,
    /// Response body could not be decoded.
    Malformed,
    /// Envelope decoded but carried `status != 1`.
    Rejected,
    Unknown,
}

impl ApiErrorKind {
    /// Message suitable for direct display.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Network => "Network error. Please check your internet connection.",
            Self::Timeout => "Request timeout. Please try again.",
            Self::NotFound => "Unable to load data. Please try again later.",
            Self::Forbidden => "Access denied. Please check your permissions.",
            Self::RateLimited => "Too many requests. Please try again shortly.",
            Self::ServerError => "Server error. Please try again later.",
            Self::ServiceUnavailable => {
                "Service is currently unavailable. Please try again later."
            }
            Self::Malformed | Self::Rejected | Self::Unknown => {
                "Something went wrong. Please try again later."
            }
        }
    }

    /// Maps an HTTP status code to a failure kind.
    pub fn from_status(code: u16) -> Self {
        match code {
            403 => Self::Forbidden,
            404 => Self::NotFound,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            503 => Self::ServiceUnavailable,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Failure of one collaborator call.
#[derive(Debug, Clone, Error)]
#[error("{operation} failed ({kind:?}): {detail}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub operation: &'static str,
    pub status: Option<u16>,
    pub detail: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            operation,
            status: None,
            detail: detail.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

/// Error returned by the single-item fetch path.
///
/// Upstream failures never show up here; they are turned into placeholder items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No news ID provided")]
    MissingIdentifier,
}
