//! Blocking `ureq` transport for hosts without their own HTTP stack.
//!
//! Each request runs on a dedicated thread and the completion is invoked
//! from that thread. ureq's status-as-error behavior is disabled so 4xx/5xx
//! responses come back as data and the dispatcher decides what they mean.

use std::thread;

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportCompletion};

#[derive(Debug, Default, Clone, Copy)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }

    /// Execute `request` on the calling thread.
    pub fn execute(request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(request.timeout)
            .build()
            .new_agent();

        let HttpRequest {
            method,
            url,
            headers,
            ..
        } = request;

        let mut builder = match method {
            HttpMethod::Get => agent.get(&url),
        };
        for (key, value) in &headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(map_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = match response.body_mut().read_to_string() {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(error = %e, "response body could not be read");
                None
            }
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for UreqTransport {
    fn perform(&self, request: HttpRequest, completion: TransportCompletion) {
        thread::spawn(move || completion(Self::execute(request)));
    }
}

fn map_error(error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::StatusCode(status) => ApiError::InvalidStatusCode { status },
        ureq::Error::BadUri(reason) => ApiError::Unknown(reason),
        other => ApiError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;
    use crate::error::ManagerError;

    #[test]
    fn unreachable_host_is_a_network_failure() {
        // Nothing listens on the discard port.
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/leagues".to_string(),
            headers: Vec::new(),
            timeout: Some(Duration::from_secs(2)),
        };
        let (tx, rx) = mpsc::channel();
        UreqTransport::new().perform(request, Box::new(move |r| tx.send(r).unwrap()));
        let err = rx.recv().unwrap().unwrap_err();
        assert_eq!(err.classify(), ManagerError::UserNetwork);
    }
}
