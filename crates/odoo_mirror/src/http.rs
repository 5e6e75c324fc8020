//! HTTP transport boundary for the Odoo JSON-RPC client.
//!
//! Every outbound call goes through [`HttpTransport`], so the client can be
//! exercised against canned responses without opening sockets.

use async_trait::async_trait;
use thiserror::Error;

/// HTTP headers represented as key/value pairs.
pub type HttpHeaders = Vec<(String, String)>;

/// An outbound POST request. JSON-RPC never needs any other verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Build a request carrying a JSON body.
    pub fn json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as lossy UTF-8, truncated for log and error messages.
    #[must_use]
    pub fn body_snippet(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        match text.char_indices().nth(200) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.into_owned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("http transport error: {0}")]
    Transport(String),

    #[error("no mock response registered for POST {url}")]
    NoMockResponse { url: String },
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

#[cfg(feature = "odoo")]
pub mod reqwest_transport {
    use super::*;

    use std::time::Duration;

    /// Transport backed by a pooled reqwest client.
    #[derive(Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| HttpError::Transport(e.to_string()))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let mut builder = self.client.post(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let resp = builder
                .body(request.body)
                .send()
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?;

            let status = resp.status().as_u16();
            let body = resp
                .bytes()
                .await
                .map_err(|e| HttpError::Transport(e.to_string()))?
                .to_vec();

            Ok(HttpResponse { status, body })
        }
    }
}

// ---------- Test-only mock transport ----------

#[cfg(test)]
use std::collections::{HashMap, VecDeque};
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Canned transport for unit tests.
///
/// Responses registered for the same URL are returned in FIFO order. A
/// response slot may also hold a transport failure, to drive retry paths.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[cfg(test)]
#[derive(Default)]
struct MockTransportInner {
    routes: HashMap<String, VecDeque<Result<HttpResponse, String>>>,
    requests: Vec<HttpRequest>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, url: impl Into<String>, response: HttpResponse) {
        self.push(url.into(), Ok(response));
    }

    /// Queue a JSON body with status 200.
    pub fn push_json(&self, url: impl Into<String>, body: serde_json::Value) {
        self.push_response(
            url,
            HttpResponse {
                status: 200,
                body: body.to_string().into_bytes(),
            },
        );
    }

    pub fn push_failure(&self, url: impl Into<String>, message: impl Into<String>) {
        self.push(url.into(), Err(message.into()));
    }

    fn push(&self, url: String, slot: Result<HttpResponse, String>) {
        self.inner
            .lock()
            .expect("mock transport lock should not be poisoned")
            .routes
            .entry(url)
            .or_default()
            .push_back(slot);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner
            .lock()
            .expect("mock transport lock should not be poisoned")
            .requests
            .clone()
    }

    /// Decoded JSON bodies of every recorded request.
    #[must_use]
    pub fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.requests()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("request body should be JSON"))
            .collect()
    }
}

#[cfg(test)]
#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut inner = self
            .inner
            .lock()
            .expect("mock transport lock should not be poisoned");

        let url = request.url.clone();
        inner.requests.push(request);

        match inner.routes.get_mut(&url).and_then(|q| q.pop_front()) {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(message)) => Err(HttpError::Transport(message)),
            None => Err(HttpError::NoMockResponse { url }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_request_sets_content_type() {
        let req = HttpRequest::json("http://odoo.local/jsonrpc", b"{}".to_vec());
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn body_snippet_truncates_long_bodies() {
        let resp = HttpResponse {
            status: 502,
            body: "x".repeat(500).into_bytes(),
        };
        let snippet = resp.body_snippet();
        assert_eq!(snippet.len(), 203);
        assert!(snippet.ends_with("..."));
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn mock_transport_replays_in_fifo_order_and_records_requests() {
        let transport = MockTransport::new();
        let url = "http://odoo.local/jsonrpc";
        transport.push_failure(url, "connection reset");
        transport.push_json(url, serde_json::json!({"result": 1}));

        let req = HttpRequest::json(url, b"{\"id\":1}".to_vec());
        let first = transport.send(req.clone()).await;
        assert!(matches!(first, Err(HttpError::Transport(m)) if m == "connection reset"));

        let second = transport.send(req.clone()).await.expect("queued response");
        assert!(second.is_success());

        let third = transport.send(req.clone()).await;
        assert!(matches!(third, Err(HttpError::NoMockResponse { .. })));

        assert_eq!(transport.requests().len(), 3);
        assert_eq!(transport.request_bodies()[0], serde_json::json!({"id": 1}));
    }

    #[tokio::test]
    #[cfg(feature = "odoo")]
    async fn reqwest_transport_reports_invalid_url_as_transport_error() {
        let transport = reqwest_transport::ReqwestTransport::new(reqwest::Client::new());
        let err = transport
            .send(HttpRequest::json("not a url", Vec::new()))
            .await
            .expect_err("expected error");
        assert!(matches!(err, HttpError::Transport(_)));
    }
}
