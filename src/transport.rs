//! The HTTP transport seam
//!
//! Abstracts over how requests reach the server (an HTTP client, a test
//! double) so the resource client never depends on a concrete HTTP
//! stack. Timeouts, retries, auth, and base-URL resolution all live
//! behind this trait.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// Why a transport call failed.
#[derive(Debug, Clone, Error)]
pub enum TransportFailure {
    /// The server answered with a non-success status; carries its
    /// structured response body.
    #[error("server rejected request")]
    Rejected { response: Value },
    /// No response exists (DNS failure, connection reset, timeout).
    #[error("network failure: {0}")]
    Network(String),
}

/// The injected HTTP collaborator.
///
/// URLs are relative to whatever base the implementation resolves
/// against. Bodies and responses are JSON values; implementations are
/// expected to hand back the parsed response body on success and a
/// [`TransportFailure`] otherwise.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Value, TransportFailure>;

    async fn post(
        &self,
        url: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value, TransportFailure>;

    async fn patch(
        &self,
        url: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value, TransportFailure>;

    async fn delete(&self, url: &str) -> Result<Value, TransportFailure>;
}

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
            Self::Patch => f.write_str("PATCH"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

/// One request as seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    /// Request body; `None` for GET and DELETE
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

/// Mock transport for testing — records every request and replays
/// preconfigured responses in FIFO order.
///
/// An exhausted queue yields a [`TransportFailure::Network`], so a test
/// that issues more requests than it configured fails loudly.
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<Result<Value, TransportFailure>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn with_response(self, body: Value) -> Self {
        self.push(Ok(body));
        self
    }

    /// Queue a failure.
    pub fn with_failure(self, failure: TransportFailure) -> Self {
        self.push(Err(failure));
        self
    }

    /// Snapshot of every request recorded so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, response: Result<Value, TransportFailure>) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
    }

    fn record(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<Value, TransportFailure> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRequest {
                method,
                url: url.to_string(),
                body: body.cloned(),
                headers: headers
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            });
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportFailure::Network(format!(
                    "no mock response queued for {} {}",
                    method, url
                )))
            })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<Value, TransportFailure> {
        self.record(Method::Get, url, None, &[])
    }

    async fn post(
        &self,
        url: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value, TransportFailure> {
        self.record(Method::Post, url, Some(body), headers)
    }

    async fn patch(
        &self,
        url: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value, TransportFailure> {
        self.record(Method::Patch, url, Some(body), headers)
    }

    async fn delete(&self, url: &str) -> Result<Value, TransportFailure> {
        self.record(Method::Delete, url, None, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_responses_in_fifo_order() {
        let transport = MockTransport::new()
            .with_response(json!({"data": []}))
            .with_response(json!({"data": {"type": "posts", "id": "1"}}));

        assert_eq!(transport.get("posts?").await.unwrap(), json!({"data": []}));
        assert_eq!(
            transport.get("posts/1?").await.unwrap(),
            json!({"data": {"type": "posts", "id": "1"}})
        );
    }

    #[tokio::test]
    async fn records_method_url_body_and_headers() {
        let transport = MockTransport::new().with_response(json!({"data": null}));
        let body = json!({"data": {"type": "posts"}});
        transport
            .post("posts?", &body, &[("Content-Type", "application/vnd.api+json")])
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, "posts?");
        assert_eq!(requests[0].body.as_ref(), Some(&body));
        assert_eq!(
            requests[0].headers,
            vec![(
                "Content-Type".to_string(),
                "application/vnd.api+json".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn exhausted_queue_fails_loudly() {
        let transport = MockTransport::new();
        let failure = transport.get("posts?").await.unwrap_err();
        assert!(matches!(failure, TransportFailure::Network(_)));
    }

    #[tokio::test]
    async fn queued_failure_is_returned() {
        let transport = MockTransport::new().with_failure(TransportFailure::Rejected {
            response: json!({"errors": [{"status": "404"}]}),
        });
        let failure = transport.get("posts/9?").await.unwrap_err();
        assert!(matches!(failure, TransportFailure::Rejected { .. }));
    }
}
