//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and interprets `HttpResponse` values; a `Transport` supplied by the
//! host performs the round-trip and reports back through a completion.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross the FFI
//! boundary without lifetime concerns.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

/// HTTP method for a request. The Betterpick API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already percent-encoded. `timeout` is `None` when
/// the transport default should apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

/// An HTTP response described as plain data.
///
/// `body` is `None` when the transport received no payload at all, which is
/// distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }
}

/// Outcome handed to a transport completion.
pub type TransportResult = Result<HttpResponse, ApiError>;

/// Completion invoked exactly once by a `Transport`, on any thread.
pub type TransportCompletion = Box<dyn FnOnce(TransportResult) + Send + 'static>;

/// Executes requests on behalf of the core.
///
/// Implementations report connectivity problems as `ApiError::Transport`,
/// a missing response object as `ApiError::ResponseNotCreated`, and any
/// other failure as `ApiError::Unknown`. Status codes are never turned into
/// errors here; the dispatcher interprets them.
pub trait Transport: Send + Sync {
    fn perform(&self, request: HttpRequest, completion: TransportCompletion);
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn perform(&self, request: HttpRequest, completion: TransportCompletion) {
        (**self).perform(request, completion)
    }
}
