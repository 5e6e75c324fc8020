use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;

use super::rpc::{RpcRequest, decode_response};
use crate::http::{HttpRequest, HttpTransport};
use crate::remote::{Domain, Page, RemoteError, RemoteRecord, RemoteSource, Result};
use crate::retry::{RetryConfig, with_retry};

/// Connection settings for one Odoo database.
#[derive(Clone)]
pub struct OdooConfig {
    /// Base URL, e.g. `https://erp.example.com`.
    pub url: String,
    pub db: String,
    pub username: String,
    /// Password or API key.
    pub password: String,
    /// Per-request timeout for the HTTP transport.
    pub timeout: Duration,
}

impl fmt::Debug for OdooConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdooConfig")
            .field("url", &self.url)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OdooConfig {
    fn endpoint(&self) -> String {
        format!("{}/jsonrpc", self.url.trim_end_matches('/'))
    }
}

/// Odoo client speaking JSON-RPC over an [`HttpTransport`].
///
/// The user id returned by `authenticate` is cached; model calls log in lazily
/// on first use. Network failures are retried with exponential backoff.
pub struct OdooClient {
    transport: Arc<dyn HttpTransport>,
    config: OdooConfig,
    endpoint: String,
    uid: Mutex<Option<i64>>,
    next_id: AtomicU64,
    retry: RetryConfig,
}

impl OdooClient {
    /// Create a client backed by a reqwest transport honoring `config.timeout`.
    pub fn new(config: OdooConfig) -> Result<Self> {
        let transport = crate::http::reqwest_transport::ReqwestTransport::with_timeout(config.timeout)
            .map_err(|e| RemoteError::network(e.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: OdooConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let endpoint = config.endpoint();
        Self {
            transport,
            config,
            endpoint,
            uid: Mutex::new(None),
            next_id: AtomicU64::new(1),
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &OdooConfig {
        &self.config
    }

    /// The cached user id, if a login has succeeded.
    pub async fn uid(&self) -> Option<i64> {
        *self.uid.lock().await
    }

    async fn call_once(&self, service: &str, method: &str, args: Vec<Value>) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(&RpcRequest::call(id, service, method, args))
            .map_err(|e| RemoteError::invalid_response(format!("cannot encode request: {e}")))?;

        let response = self
            .transport
            .send(HttpRequest::json(self.endpoint.clone(), body))
            .await
            .map_err(|e| RemoteError::network(e.to_string()))?;

        decode_response(&response)
    }

    async fn call(&self, service: &str, method: &str, args: Vec<Value>) -> Result<Value> {
        let label = format!("{service}.{method}");
        with_retry(
            || self.call_once(service, method, args.clone()),
            RemoteError::is_retryable,
            &self.retry,
            &label,
        )
        .await
    }

    async fn login(&self) -> Result<i64> {
        let result = self
            .call(
                "common",
                "authenticate",
                vec![
                    json!(self.config.db),
                    json!(self.config.username),
                    json!(self.config.password),
                    json!({}),
                ],
            )
            .await
            .inspect_err(|e| tracing::error!(url = %self.config.url, "Odoo authentication error: {}", e))?;

        match result.as_i64() {
            Some(uid) if uid > 0 => {
                tracing::info!(uid, db = %self.config.db, "Authenticated with Odoo");
                Ok(uid)
            }
            _ => Err(RemoteError::auth_failed(format!(
                "invalid credentials for {} on {}",
                self.config.username, self.config.db
            ))),
        }
    }

    async fn ensure_uid(&self) -> Result<i64> {
        let mut cached = self.uid.lock().await;
        if let Some(uid) = *cached {
            return Ok(uid);
        }
        let uid = self.login().await?;
        *cached = Some(uid);
        Ok(uid)
    }

    /// Call `method` on `model` through `object.execute_kw`.
    pub async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value> {
        let uid = self.ensure_uid().await?;
        tracing::debug!(model, method, "execute_kw");

        self.call(
            "object",
            "execute_kw",
            vec![
                json!(self.config.db),
                json!(uid),
                json!(self.config.password),
                json!(model),
                json!(method),
                Value::Array(args),
                Value::Object(kwargs),
            ],
        )
        .await
        .inspect_err(|e| tracing::error!(model, method, "Odoo call failed: {}", e))
    }
}

fn domain_arg(domain: &Domain) -> Result<Value> {
    serde_json::to_value(domain)
        .map_err(|e| RemoteError::invalid_response(format!("cannot encode domain: {e}")))
}

#[async_trait]
impl RemoteSource for OdooClient {
    async fn authenticate(&self) -> Result<i64> {
        let uid = self.login().await?;
        *self.uid.lock().await = Some(uid);
        Ok(uid)
    }

    async fn search_read(
        &self,
        model: &str,
        domain: &Domain,
        fields: &[&str],
        page: Page,
    ) -> Result<Vec<RemoteRecord>> {
        let mut kwargs = Map::new();
        kwargs.insert("fields".to_string(), json!(fields));
        kwargs.insert("offset".to_string(), json!(page.offset));
        if let Some(limit) = page.limit {
            kwargs.insert("limit".to_string(), json!(limit));
        }

        let result = self
            .execute_kw(model, "search_read", vec![domain_arg(domain)?], kwargs)
            .await?;

        match result {
            Value::Array(rows) => rows.into_iter().map(RemoteRecord::try_from).collect(),
            other => Err(RemoteError::invalid_response(format!(
                "search_read on {model} returned {other}"
            ))),
        }
    }

    async fn search(&self, model: &str, domain: &Domain) -> Result<Vec<i64>> {
        let result = self
            .execute_kw(model, "search", vec![domain_arg(domain)?], Map::new())
            .await?;

        serde_json::from_value::<Vec<i64>>(result).map_err(|e| {
            RemoteError::invalid_response(format!("search on {model} returned non-id values: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::remote::{CONTACT_MODEL, INVOICE_MODEL};

    const URL: &str = "http://odoo.test";
    const ENDPOINT: &str = "http://odoo.test/jsonrpc";

    fn config() -> OdooConfig {
        OdooConfig {
            url: format!("{URL}/"),
            db: "prod".to_string(),
            username: "sync@example.com".to_string(),
            password: "secret".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    fn client(transport: &MockTransport) -> OdooClient {
        OdooClient::with_transport(config(), Arc::new(transport.clone()))
            .with_retry_config(RetryConfig::disabled())
    }

    fn result(value: Value) -> Value {
        json!({"jsonrpc": "2.0", "id": 1, "result": value})
    }

    #[tokio::test]
    async fn authenticate_posts_common_call_and_caches_uid() {
        let transport = MockTransport::new();
        transport.push_json(ENDPOINT, result(json!(2)));
        let client = client(&transport);

        assert_eq!(client.authenticate().await.unwrap(), 2);
        assert_eq!(client.uid().await, Some(2));

        let bodies = transport.request_bodies();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["params"]["service"], "common");
        assert_eq!(bodies[0]["params"]["method"], "authenticate");
        assert_eq!(
            bodies[0]["params"]["args"],
            json!(["prod", "sync@example.com", "secret", {}])
        );
    }

    #[tokio::test]
    async fn false_uid_is_auth_failure() {
        let transport = MockTransport::new();
        transport.push_json(ENDPOINT, result(json!(false)));
        let client = client(&transport);

        let err = client.authenticate().await.expect_err("should fail");
        assert!(matches!(err, RemoteError::AuthFailed { .. }));
        assert_eq!(client.uid().await, None);
    }

    #[tokio::test]
    async fn model_calls_log_in_once_then_reuse_uid() {
        let transport = MockTransport::new();
        transport.push_json(ENDPOINT, result(json!(7)));
        transport.push_json(ENDPOINT, result(json!([{"id": 1, "name": "A"}])));
        transport.push_json(ENDPOINT, result(json!([1, 2, 3])));
        let client = client(&transport);

        let contacts = client.fetch_contacts(None).await.unwrap();
        let ids = client.all_invoice_ids().await.unwrap();

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].id(), Some(1));
        assert_eq!(ids, vec![1, 2, 3]);

        let bodies = transport.request_bodies();
        assert_eq!(bodies.len(), 3);
        assert_eq!(bodies[0]["params"]["method"], "authenticate");

        let read = &bodies[1]["params"]["args"];
        assert_eq!(read[0], "prod");
        assert_eq!(read[1], 7);
        assert_eq!(read[3], CONTACT_MODEL);
        assert_eq!(read[4], "search_read");
        assert_eq!(read[5], json!([[]]));
        assert_eq!(read[6]["offset"], 0);
        assert!(read[6].get("limit").is_none());
        assert_eq!(read[6]["fields"][6], "country_id");

        let search = &bodies[2]["params"]["args"];
        assert_eq!(search[3], INVOICE_MODEL);
        assert_eq!(search[4], "search");
    }

    #[tokio::test]
    async fn invoice_filter_and_page_are_forwarded() {
        let transport = MockTransport::new();
        transport.push_json(ENDPOINT, result(json!(7)));
        transport.push_json(ENDPOINT, result(json!([])));
        let client = client(&transport);

        let found = client.fetch_invoice_by_id(42).await.unwrap();
        assert!(found.is_none());

        let args = &transport.request_bodies()[1]["params"]["args"];
        assert_eq!(args[5], json!([[["id", "=", 42]]]));
        assert_eq!(args[6]["limit"], 1);
    }

    #[tokio::test]
    async fn server_errors_surface_without_retry() {
        let transport = MockTransport::new();
        transport.push_json(ENDPOINT, result(json!(7)));
        transport.push_json(
            ENDPOINT,
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "error": {"message": "Odoo Server Error", "data": {"name": "builtins.ValueError", "message": "bad domain"}}
            }),
        );
        let client = OdooClient::with_transport(config(), Arc::new(transport.clone()));

        let err = client
            .search_read(CONTACT_MODEL, &Domain::new(), &["id"], Page::all())
            .await
            .expect_err("should fail");

        assert!(matches!(err, RemoteError::Api { .. }));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failures_are_retried() {
        let transport = MockTransport::new();
        transport.push_failure(ENDPOINT, "connection refused");
        transport.push_failure(ENDPOINT, "connection refused");
        transport.push_json(ENDPOINT, result(json!(3)));
        let client = OdooClient::with_transport(config(), Arc::new(transport.clone()));

        assert_eq!(client.authenticate().await.unwrap(), 3);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn non_list_search_read_result_is_invalid() {
        let transport = MockTransport::new();
        transport.push_json(ENDPOINT, result(json!(7)));
        transport.push_json(ENDPOINT, result(json!({"id": 1})));
        let client = client(&transport);

        let err = client.fetch_contacts(None).await.expect_err("should fail");
        assert!(matches!(err, RemoteError::InvalidResponse { .. }));
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
