//! Error types for the Betterpick API client.
//!
//! # Design
//! `ApiError` records what actually went wrong during a round-trip.
//! Application code only ever sees `ManagerError`, which collapses every
//! cause into "the user's network failed" or "the server misbehaved".

use thiserror::Error;

/// Detailed failure causes produced by request building, transports and
/// response validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a status outside 200..=299.
    #[error("unexpected HTTP status {status}")]
    InvalidStatusCode { status: u16 },

    /// The body was absent, empty, or did not decode into the expected type.
    #[error("invalid response body: {0}")]
    InvalidResponseBody(String),

    /// The transport finished without producing a response object.
    #[error("no response was created")]
    ResponseNotCreated,

    #[error("unknown failure: {0}")]
    Unknown(String),

    /// Connectivity, DNS, TLS or timeout failure below HTTP.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request URL could not be assembled from the configured base URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Collapse the cause into the two kinds callers are allowed to see.
    pub fn classify(&self) -> ManagerError {
        match self {
            ApiError::Transport(_) => ManagerError::UserNetwork,
            ApiError::InvalidStatusCode { .. }
            | ApiError::InvalidResponseBody(_)
            | ApiError::ResponseNotCreated
            | ApiError::Unknown(_)
            | ApiError::InvalidUrl(_) => ManagerError::Server,
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}

/// Failure kinds surfaced to the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// Retrying may help once connectivity is back.
    #[error("network connection failed")]
    UserNetwork,

    #[error("server error")]
    Server,
}

impl From<ApiError> for ManagerError {
    fn from(e: ApiError) -> Self {
        e.classify()
    }
}

/// Filter criteria that cannot be expressed as a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("overall range {min}..={max} is empty")]
    EmptyRange { min: u8, max: u8 },

    #[error("overall rating {0} is outside 1..=99")]
    RatingOutOfBounds(u8),
}
