//! Integration tests against EOS mainnet.
//!
//! These make real RPC calls through the public endpoint pool. They are
//! read-only and need no credentials, but public nodes come and go, so the
//! suite is ignored by default:
//!
//! ```text
//! cargo test --test mainnet_integration -- --ignored
//! ```

use eos_kit::*;

/// The chain id of EOS mainnet.
const MAINNET_CHAIN_ID: &str = "aca376f206b8fc25a6ed44dbdc66547c36c6c33e3a119ffbeaef943642f0e906";

/// Opt into retry/rotation logs with `RUST_LOG=eos_kit=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[tokio::test]
#[ignore = "requires live mainnet endpoints"]
async fn test_get_info() {
    init_tracing();
    let eos = Eos::mainnet();
    let info = eos.get_info().await.unwrap();

    assert_eq!(info.chain_id, MAINNET_CHAIN_ID);
    assert!(info.head_block_num > 0);
    assert!(info.last_irreversible_block_num <= info.head_block_num);
}

#[tokio::test]
#[ignore = "requires live mainnet endpoints"]
async fn test_account_exists() {
    init_tracing();
    let eos = Eos::mainnet();

    // the system account always exists
    assert!(eos.account_exists("eosio").await.unwrap());
    assert!(!eos.account_exists("zzzqqqxxx123").await.unwrap());
}

#[tokio::test]
#[ignore = "requires live mainnet endpoints"]
async fn test_core_token_stats() {
    init_tracing();
    let eos = Eos::mainnet();
    let stats = eos.currency_stats("EOS").await.unwrap();

    assert_eq!(stats.issuer.to_string(), "eosio");
    assert!(stats.supply.amount() > 0);
    assert!(stats.max_supply.amount() >= stats.supply.amount());
}

#[tokio::test]
#[ignore = "requires live mainnet endpoints"]
async fn test_balance_of_system_account() {
    init_tracing();
    let eos = Eos::mainnet();

    // eosio holds EOS; the call must succeed and return a finite number
    let balance = eos.balance("eosio", "EOS").await.unwrap();
    assert!(balance.is_finite());
    assert!(balance >= 0.0);
}

#[tokio::test]
#[ignore = "requires live mainnet endpoints"]
async fn test_table_rows_token_stat() {
    init_tracing();
    let eos = Eos::mainnet();

    // the stat table of the core token, scoped by symbol code
    let query = TableRowsQuery::new("eosio.token", "EOS", "stat").limit(1);
    let rows = eos.table_rows(&query).await.unwrap();
    assert_eq!(rows.rows.len(), 1);
    assert!(rows.rows[0].get("supply").is_some());
}

#[tokio::test]
#[ignore = "requires live mainnet endpoints and a history-enabled node"]
async fn test_key_accounts() {
    init_tracing();
    let eos = Eos::mainnet();

    // history plugins are rare on public nodes; retry budget may be spent
    // on nodes that do not serve /v1/history at all
    match eos
        .key_accounts("EOS6zQQQXEgT9jmy9NHahAXqTRV4LaeCUwsE8XP8MP557Kn6s3KxP")
        .await
    {
        Ok(accounts) => assert!(!accounts.is_empty()),
        Err(Error::Rpc(e)) => assert!(e.is_retryable(), "unexpected terminal error: {e}"),
        Err(other) => panic!("unexpected error: {other}"),
    }
}
