//! Retry-policy tests over a scripted transport.
//!
//! These exercise the resilience layer without any network: a mock
//! [`Transport`] plays back a queue of canned replies and counts how many
//! round trips the client actually made.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use eos_kit::*;

/// One scripted transport reply.
#[derive(Clone)]
enum Reply {
    Ok(serde_json::Value),
    /// Transport-level failure (garbage body, connection trouble).
    Garbage(String),
    /// Node lacks the requested API plugin.
    Unsupported,
    /// Chain-level rejection.
    Chain { code: i64, name: String, what: String },
}

#[derive(Clone, Default)]
struct MockTransport {
    inner: Arc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    endpoints_seen: Mutex<Vec<String>>,
}

impl MockTransport {
    fn scripted(replies: impl IntoIterator<Item = Reply>) -> Self {
        let mock = Self::default();
        mock.inner.replies.lock().unwrap().extend(replies);
        mock
    }

    fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    fn endpoints_seen(&self) -> Vec<String> {
        self.inner.endpoints_seen.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn post(
        &self,
        endpoint: &str,
        path: &str,
        _body: &serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .endpoints_seen
            .lock()
            .unwrap()
            .push(endpoint.to_string());

        let reply = self
            .inner
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more times than scripted");

        match reply {
            Reply::Ok(value) => Ok(value),
            Reply::Garbage(message) => Err(RpcError::Transport {
                endpoint: endpoint.to_string(),
                message,
            }),
            Reply::Unsupported => Err(RpcError::EndpointUnsupported {
                endpoint: endpoint.to_string(),
                path: path.to_string(),
                message: "unknown endpoint".to_string(),
            }),
            Reply::Chain { code, name, what } => Err(RpcError::Chain {
                endpoint: endpoint.to_string(),
                code,
                name,
                what,
                details: None,
            }),
        }
    }
}

fn pool() -> EndpointPool {
    EndpointPool::new(vec![
        "http://node-a.test".into(),
        "http://node-b.test".into(),
        "http://node-c.test".into(),
    ])
    .unwrap()
}

fn client(replies: impl IntoIterator<Item = Reply>) -> (RpcClient<MockTransport>, MockTransport) {
    let mock = MockTransport::scripted(replies);
    (RpcClient::with_transport(pool(), mock.clone()), mock)
}

fn eos(replies: impl IntoIterator<Item = Reply>) -> (Eos<MockTransport>, MockTransport) {
    let (rpc, mock) = client(replies);
    (Eos::from_parts(rpc, None, TokenRegistry::default()), mock)
}

fn info_json() -> serde_json::Value {
    serde_json::json!({
        "chain_id": "aca376f206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906",
        "head_block_num": 100_000,
        "last_irreversible_block_num": 99_000,
    })
}

// =============================================================================
// Attempt budget
// =============================================================================

#[tokio::test]
async fn test_two_failures_then_success_recovers() {
    let (rpc, mock) = client([
        Reply::Garbage("<html>cloudflare</html>".into()),
        Reply::Garbage("connection reset".into()),
        Reply::Ok(info_json()),
    ]);

    let info = rpc.get_info().await.unwrap();
    assert_eq!(info.head_block_num, 100_000);
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn test_budget_exhaustion_surfaces_last_failure() {
    let (rpc, mock) = client([
        Reply::Garbage("first".into()),
        Reply::Garbage("second".into()),
        Reply::Garbage("third".into()),
    ]);

    let err = rpc.get_info().await.unwrap_err();
    assert_eq!(mock.calls(), 3, "budget is exactly three attempts");

    // the error is the actual final failure, not a placeholder
    match err {
        RpcError::Transport { message, endpoint } => {
            assert_eq!(message, "third");
            assert!(!endpoint.is_empty());
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chain_error_is_terminal_no_retry() {
    let (rpc, mock) = client([Reply::Chain {
        code: 3050003,
        name: "eosio_assert_message_exception".into(),
        what: "overdrawn balance".into(),
    }]);

    let err = rpc.get_info().await.unwrap_err();
    assert_eq!(mock.calls(), 1, "chain rejections must not be retried");
    match err {
        RpcError::Chain { name, what, .. } => {
            assert_eq!(name, "eosio_assert_message_exception");
            assert_eq!(what, "overdrawn balance");
        }
        other => panic!("expected Chain, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsupported_endpoint_rotates() {
    let (rpc, mock) = client([
        Reply::Unsupported,
        Reply::Ok(serde_json::json!({ "account_names": ["alice", "bob"] })),
    ]);

    let key: PublicKey = "EOS7S7oY6Jrjzq8txrPmBwUhUmKzpN64835E7ura1HDDAVUu3pzSs"
        .parse()
        .unwrap();
    let accounts = rpc.get_key_accounts(&key).await.unwrap();
    assert_eq!(mock.calls(), 2);
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].to_string(), "alice");
}

#[tokio::test]
async fn test_malformed_success_body_rotates() {
    // HTTP 200 with a shape that is not a get_info response
    let (rpc, mock) = client([
        Reply::Ok(serde_json::json!({ "unexpected": true })),
        Reply::Ok(info_json()),
    ]);

    let info = rpc.get_info().await.unwrap();
    assert_eq!(mock.calls(), 2);
    assert_eq!(info.head_block_num, 100_000);
}

#[tokio::test]
async fn test_retries_select_from_pool() {
    let (rpc, mock) = client([
        Reply::Garbage("a".into()),
        Reply::Garbage("b".into()),
        Reply::Ok(info_json()),
    ]);

    rpc.get_info().await.unwrap();
    let pool = pool();
    for seen in mock.endpoints_seen() {
        assert!(pool.endpoints().iter().any(|e| *e == seen));
    }
}

// =============================================================================
// Local validation short-circuits the network
// =============================================================================

#[tokio::test]
async fn test_invalid_public_key_never_hits_network() {
    let (eos, mock) = eos([]);
    let err = eos.key_accounts("not-a-key").await.unwrap_err();
    assert!(matches!(err, Error::ParseKey(_)));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_invalid_account_name_never_hits_network() {
    let (eos, mock) = eos([]);
    let err = eos.account_exists("Capitalized").await.unwrap_err();
    assert!(matches!(err, Error::ParseName(_)));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_transfer_precision_mismatch_fails_locally() {
    let signer = InMemorySigner::from_wif("5HwoXVkHoRM8sL2KmNRS217n1g8mPPBomrY7yehCuXC1115WWsh")
        .unwrap();
    let mock = MockTransport::scripted([]);
    let rpc = RpcClient::with_transport(pool(), mock.clone());
    let eos = Eos::from_parts(rpc, Some(Arc::new(signer)), TokenRegistry::default());

    // EOS has precision 4; "1.23" must be rejected before any RPC
    let err = eos.transfer("alice", "bob", "1.23", "EOS", "").await.unwrap_err();
    assert!(matches!(err, Error::ParseAsset(_)));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_transfer_unregistered_token_fails_locally() {
    let signer = InMemorySigner::from_wif("5HwoXVkHoRM8sL2KmNRS217n1g8mPPBomrY7yehCuXC1115WWsh")
        .unwrap();
    let mock = MockTransport::scripted([]);
    let rpc = RpcClient::with_transport(pool(), mock.clone());
    let eos = Eos::from_parts(rpc, Some(Arc::new(signer)), TokenRegistry::default());

    let err = eos.transfer("alice", "bob", "1.0000", "DOGE", "").await.unwrap_err();
    assert!(matches!(err, Error::TokenNotRegistered(code) if code == "DOGE"));
    assert_eq!(mock.calls(), 0);
}

// =============================================================================
// Semantic operations over the mock
// =============================================================================

#[tokio::test]
async fn test_account_exists_maps_rows() {
    let (eos, _) = eos([Reply::Ok(
        serde_json::json!({ "rows": [{ "owner": "alice" }], "more": false }),
    )]);
    assert!(eos.account_exists("alice").await.unwrap());

    let (eos, _) = self::eos([Reply::Ok(serde_json::json!({ "rows": [], "more": false }))]);
    assert!(!eos.account_exists("nonexistent13").await.unwrap());
}

#[tokio::test]
async fn test_balance_parses_quantity() {
    let (eos, _) = eos([Reply::Ok(serde_json::json!(["1234.5678 EOS"]))]);
    let balance = eos.balance("alice", "EOS").await.unwrap();
    assert!((balance - 1234.5678).abs() < 1e-9);
}

#[tokio::test]
async fn test_balance_empty_means_zero() {
    let (eos, mock) = eos([Reply::Ok(serde_json::json!([]))]);
    let balance = eos.balance("alice", "EOS").await.unwrap();
    assert_eq!(balance, 0.0);
    assert_eq!(mock.calls(), 1, "empty balance is an answer, not a failure");
}

#[tokio::test]
async fn test_currency_stats_keyed_by_symbol() {
    let (eos, _) = eos([Reply::Ok(serde_json::json!({
        "EOS": {
            "supply": "1020000000.0000 EOS",
            "max_supply": "10000000000.0000 EOS",
            "issuer": "eosio"
        }
    }))]);

    let stats = eos.currency_stats("EOS").await.unwrap();
    assert_eq!(stats.issuer.to_string(), "eosio");
    assert_eq!(stats.supply.to_string(), "1020000000.0000 EOS");
}

#[tokio::test]
async fn test_table_rows_pass_through() {
    let (eos, _) = eos([Reply::Ok(serde_json::json!({
        "rows": [{ "balance": "1.0000 EOS" }, { "balance": "2.0000 EOS" }],
        "more": true
    }))]);

    let query = TableRowsQuery::new("eosio.token", "alice", "accounts").limit(2);
    let rows = eos.table_rows(&query).await.unwrap();
    assert_eq!(rows.rows.len(), 2);
    assert!(rows.more);
}

#[tokio::test]
async fn test_transaction_lookup_requires_id() {
    // a response with neither `transaction_id` nor `id` is a malformed answer
    let (eos, mock) = eos([
        Reply::Ok(serde_json::json!({ "block_num": 1 })),
        Reply::Ok(serde_json::json!({ "block_num": 1 })),
        Reply::Ok(serde_json::json!({ "block_num": 1 })),
    ]);
    let err = eos.transaction("deadbeef", None).await.unwrap_err();
    assert!(matches!(err, Error::Rpc(RpcError::Transport { .. })));
    assert_eq!(mock.calls(), 3);

    let (eos, _) = self::eos([Reply::Ok(
        serde_json::json!({ "id": "deadbeef", "block_num": 7 }),
    )]);
    let info = eos.transaction("deadbeef", Some(7)).await.unwrap();
    assert_eq!(info.id(), "deadbeef");
}

// =============================================================================
// Full transfer flow
// =============================================================================

#[tokio::test]
async fn test_transfer_flow_signs_and_pushes() {
    let signer = InMemorySigner::from_wif("5HwoXVkHoRM8sL2KmNRS217n1g8mPPBomrY7yehCuXC1115WWsh")
        .unwrap();
    let mock = MockTransport::scripted([
        Reply::Ok(info_json()),
        Reply::Ok(serde_json::json!({
            "block_num": 99_997,
            "id": "0001869d0000000000000000000000000000000000000000000000000000abcd",
            "ref_block_prefix": 3735928559u32,
        })),
        Reply::Ok(serde_json::json!({
            "transaction_id": "feedface",
            "processed": { "receipt": { "status": "executed" } }
        })),
    ]);
    let rpc = RpcClient::with_transport(pool(), mock.clone());
    let eos = Eos::from_parts(rpc, Some(Arc::new(signer)), TokenRegistry::default());

    let receipt = eos
        .transfer("alice", "bob", "1.2300", "EOS", "hi")
        .await
        .unwrap();

    assert_eq!(receipt.transaction_id, "feedface");
    // get_info, get_block, push_transaction
    assert_eq!(mock.calls(), 3);
}
