//! JSON-RPC 2.0 envelopes and error classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::HttpResponse;
use crate::remote::RemoteError;

#[derive(Debug, Serialize)]
pub(super) struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: RpcParams<'a>,
    id: u64,
}

#[derive(Debug, Serialize)]
struct RpcParams<'a> {
    service: &'a str,
    method: &'a str,
    args: Vec<Value>,
}

impl<'a> RpcRequest<'a> {
    pub(super) fn call(id: u64, service: &'a str, method: &'a str, args: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "call",
            params: RpcParams {
                service,
                method,
                args,
            },
            id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    message: String,
    data: Option<RpcErrorData>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorData {
    name: Option<String>,
    message: Option<String>,
}

impl RpcErrorBody {
    fn into_remote_error(self) -> RemoteError {
        let name = self
            .data
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .unwrap_or_default();
        let detail = self
            .data
            .as_ref()
            .and_then(|d| d.message.clone())
            .filter(|m| !m.is_empty());

        let message = match detail {
            Some(detail) => format!("{}: {}", self.message, detail),
            None => self.message,
        };

        if name.contains("AccessDenied") || name.contains("SessionExpired") {
            RemoteError::auth_failed(message)
        } else {
            RemoteError::api(message)
        }
    }
}

/// Classify a raw HTTP response and unwrap the JSON-RPC `result`.
///
/// Gateway errors count as network failures so they are retried; any other
/// non-2xx status is an API error.
pub(super) fn decode_response(response: &HttpResponse) -> Result<Value, RemoteError> {
    if !response.is_success() {
        let message = format!("HTTP {}: {}", response.status, response.body_snippet());
        return Err(match response.status {
            502..=504 => RemoteError::network(message),
            _ => RemoteError::api(message),
        });
    }

    let envelope: RpcResponse = serde_json::from_slice(&response.body)
        .map_err(|e| RemoteError::invalid_response(format!("malformed JSON-RPC body: {e}")))?;

    match envelope.error {
        Some(error) => Err(error.into_remote_error()),
        None => Ok(envelope.result),
    }
}
