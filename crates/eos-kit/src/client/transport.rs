//! Single-shot HTTP transport and failure classification.
//!
//! A [`Transport`] performs exactly one JSON-over-HTTP round trip against
//! one endpoint and never retries; retry and endpoint rotation live a layer
//! up in [`RpcClient`](super::rpc::RpcClient). What the transport *does* own
//! is classification: every failure comes back as a typed [`RpcError`]
//! variant so the retry layer dispatches on the tag rather than matching
//! strings out of exception messages.

use std::future::Future;

use tracing::debug;

use crate::error::RpcError;

/// How much of a non-JSON body to keep in the error message.
const BODY_SNIPPET_LEN: usize = 200;

/// One JSON POST against one endpoint. No retries.
pub trait Transport: Send + Sync {
    /// POST `body` to `{endpoint}{path}` and return the parsed JSON response.
    fn post(
        &self,
        endpoint: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = Result<serde_json::Value, RpcError>> + Send;
}

/// The production transport, backed by a shared `reqwest` client.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport over an existing `reqwest` client, e.g. one
    /// configured with a custom timeout or proxy.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let url = format!("{}{}", endpoint.trim_end_matches('/'), path);
        debug!(%url, "rpc request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| RpcError::Http {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| RpcError::Http {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let value: serde_json::Value = serde_json::from_str(&text).map_err(|_| {
            // HTML error pages and truncated bodies land here
            RpcError::transport(
                endpoint,
                format!(
                    "response body is not JSON (HTTP {}): {}",
                    status.as_u16(),
                    snippet(&text)
                ),
            )
        })?;

        if status.is_success() {
            Ok(value)
        } else {
            Err(classify_error_response(endpoint, path, status.as_u16(), &value))
        }
    }
}

/// Map a nodeos error envelope to a typed [`RpcError`].
///
/// The envelope looks like
/// `{"code":500,"message":...,"error":{"code":N,"name":...,"what":...,"details":[...]}}`.
/// An HTTP 404, or a `what`/`message` containing "unknown endpoint", means
/// the node does not serve the requested API (e.g. the history plugin is
/// disabled) — that is a property of the node, so it is retryable elsewhere.
/// Everything else is a chain-level rejection of the request itself and is
/// terminal.
pub(crate) fn classify_error_response(
    endpoint: &str,
    path: &str,
    status: u16,
    value: &serde_json::Value,
) -> RpcError {
    let inner = value.get("error");
    let what = inner
        .and_then(|e| e.get("what"))
        .and_then(|w| w.as_str())
        .unwrap_or("");
    let message = value.get("message").and_then(|m| m.as_str()).unwrap_or("");

    let unsupported = status == 404
        || what.to_ascii_lowercase().contains("unknown endpoint")
        || message.to_ascii_lowercase().contains("unknown endpoint");
    if unsupported {
        return RpcError::EndpointUnsupported {
            endpoint: endpoint.to_string(),
            path: path.to_string(),
            message: if what.is_empty() { message } else { what }.to_string(),
        };
    }

    RpcError::Chain {
        endpoint: endpoint.to_string(),
        code: inner
            .and_then(|e| e.get("code"))
            .and_then(|c| c.as_i64())
            .or_else(|| value.get("code").and_then(|c| c.as_i64()))
            .unwrap_or(0),
        name: inner
            .and_then(|e| e.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown")
            .to_string(),
        what: if what.is_empty() { message } else { what }.to_string(),
        details: inner.and_then(|e| e.get("details")).cloned(),
    }
}

fn snippet(text: &str) -> &str {
    let end = text
        .char_indices()
        .take_while(|(i, _)| *i < BODY_SNIPPET_LEN)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_endpoint_is_capability_failure() {
        let body = serde_json::json!({
            "code": 404,
            "message": "Not Found",
            "error": {
                "code": 0,
                "name": "exception",
                "what": "Unknown Endpoint",
                "details": []
            }
        });
        let err = classify_error_response(
            "http://node.example",
            "/v1/history/get_key_accounts",
            404,
            &body,
        );
        match err {
            RpcError::EndpointUnsupported { endpoint, path, message } => {
                assert_eq!(endpoint, "http://node.example");
                assert_eq!(path, "/v1/history/get_key_accounts");
                assert_eq!(message, "Unknown Endpoint");
            }
            other => panic!("expected EndpointUnsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_endpoint_match_is_case_insensitive() {
        let body = serde_json::json!({
            "code": 404,
            "message": "unknown endpoint",
        });
        assert!(matches!(
            classify_error_response("http://node.example", "/v1/chain/get_info", 404, &body),
            RpcError::EndpointUnsupported { .. }
        ));
    }

    #[test]
    fn test_plain_404_is_capability_failure() {
        // proxies in front of API-less nodes often 404 with a JSON body of
        // their own shape
        let body = serde_json::json!({ "status": "not found" });
        assert!(matches!(
            classify_error_response("http://node.example", "/v1/history/get_transaction", 404, &body),
            RpcError::EndpointUnsupported { .. }
        ));
    }

    #[test]
    fn test_chain_error_is_terminal_and_verbatim() {
        let body = serde_json::json!({
            "code": 500,
            "message": "Internal Service Error",
            "error": {
                "code": 3060003,
                "name": "table_not_found",
                "what": "Table does not exist",
                "details": [{"message": "query_exec_visitor", "file": "chain_plugin.cpp"}]
            }
        });
        let err = classify_error_response("http://node.example", "/v1/chain/get_table_rows", 500, &body);
        match err {
            RpcError::Chain { code, name, what, details, .. } => {
                assert_eq!(code, 3060003);
                assert_eq!(name, "table_not_found");
                assert_eq!(what, "Table does not exist");
                assert!(details.is_some());
            }
            other => panic!("expected Chain, got {other:?}"),
        }
        let err = classify_error_response("http://node.example", "/v1/chain/get_table_rows", 500, &body);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_bare_envelope_falls_back_to_outer_fields() {
        let body = serde_json::json!({ "code": 500, "message": "Internal Service Error" });
        match classify_error_response("http://node.example", "/v1/chain/get_info", 500, &body) {
            RpcError::Chain { code, what, name, .. } => {
                assert_eq!(code, 500);
                assert_eq!(what, "Internal Service Error");
                assert_eq!(name, "unknown");
            }
            other => panic!("expected Chain, got {other:?}"),
        }
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let text = "é".repeat(300);
        let cut = snippet(&text);
        assert!(cut.len() <= BODY_SNIPPET_LEN + 2);
        assert!(text.starts_with(cut));
    }
}
