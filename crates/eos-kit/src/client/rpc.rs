//! Resilient RPC client: bounded retry with endpoint rotation.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::RpcError;
use crate::types::{
    AccountName, Asset, BlockInfo, ChainInfo, CurrencyStats, KeyAccounts, PublicKey,
    SignedTransaction, TableRows, TableRowsQuery, TransactionInfo, TransactionReceipt,
};

use super::endpoints::EndpointPool;
use super::transport::{HttpTransport, Transport};

/// Total attempts per operation, counting the first.
///
/// Retryable failures rotate to a freshly selected endpoint; once the budget
/// is spent the last real failure propagates to the caller.
pub const MAX_ATTEMPTS: u32 = 3;

// nodeos API paths
const GET_INFO: &str = "/v1/chain/get_info";
const GET_BLOCK: &str = "/v1/chain/get_block";
const GET_TABLE_ROWS: &str = "/v1/chain/get_table_rows";
const GET_CURRENCY_BALANCE: &str = "/v1/chain/get_currency_balance";
const GET_CURRENCY_STATS: &str = "/v1/chain/get_currency_stats";
const PUSH_TRANSACTION: &str = "/v1/chain/push_transaction";
const GET_KEY_ACCOUNTS: &str = "/v1/history/get_key_accounts";
const GET_TRANSACTION: &str = "/v1/history/get_transaction";

/// Low-level RPC client over a pool of endpoints.
///
/// Every semantic operation follows the same policy: pick a random endpoint,
/// make one transport round trip, and on a retryable failure (garbage
/// response, connection error, missing API plugin) rotate to another
/// endpoint, up to [`MAX_ATTEMPTS`] total attempts. Chain-level rejections
/// are terminal and surface verbatim on the first attempt.
#[derive(Clone, Debug)]
pub struct RpcClient<T: Transport = HttpTransport> {
    pool: EndpointPool,
    transport: T,
}

impl RpcClient<HttpTransport> {
    /// A client over the default mainnet pool.
    pub fn mainnet() -> Self {
        Self::new(EndpointPool::mainnet())
    }

    /// A client over the given pool.
    pub fn new(pool: EndpointPool) -> Self {
        Self::with_transport(pool, HttpTransport::new())
    }
}

impl<T: Transport> RpcClient<T> {
    /// A client over the given pool and transport. The transport seam is
    /// what tests hook to observe attempt counts.
    pub fn with_transport(pool: EndpointPool, transport: T) -> Self {
        Self { pool, transport }
    }

    /// The endpoint pool in use.
    pub fn pool(&self) -> &EndpointPool {
        &self.pool
    }

    /// A clone of this client with all traffic forced to one endpoint.
    pub fn at(&self, url: impl Into<String>) -> Self
    where
        T: Clone,
    {
        Self {
            pool: EndpointPool::single(url),
            transport: self.transport.clone(),
        }
    }

    /// Make a raw RPC call with endpoint rotation.
    pub async fn call<R: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<R, RpcError> {
        self.call_inner(path, body).await.map(|(_, result)| result)
    }

    /// As [`RpcClient::call`], but also reports which endpoint answered.
    async fn call_inner<R: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<(String, R), RpcError> {
        let mut attempt = 1;
        loop {
            let endpoint = self.pool.select().to_string();
            debug!(%endpoint, %path, attempt, "rpc attempt");

            match self.try_call::<R>(&endpoint, path, body).await {
                Ok(result) => return Ok((endpoint, result)),
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(%endpoint, %path, attempt, error = %e, "retryable rpc failure, rotating endpoint");
                    attempt += 1;
                }
                // Terminal failure, or the budget is spent: the caller gets
                // the actual last failure, endpoint and all.
                Err(e) => return Err(e),
            }
        }
    }

    /// One attempt: transport round trip plus response-shape decoding.
    ///
    /// A 200 response that does not decode into `R` counts as a malformed
    /// response from that node, so it feeds the same retry class as a
    /// non-JSON body.
    async fn try_call<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<R, RpcError> {
        let value = self.transport.post(endpoint, path, body).await?;
        serde_json::from_value(value)
            .map_err(|e| RpcError::transport(endpoint, format!("unexpected response shape: {e}")))
    }

    // ========================================================================
    // Chain state
    // ========================================================================

    /// Get chain info from one of the pool's nodes.
    pub async fn get_info(&self) -> Result<ChainInfo, RpcError> {
        self.call(GET_INFO, &serde_json::json!({})).await
    }

    /// Get header fields of a block by number.
    pub async fn get_block(&self, block_num: u32) -> Result<BlockInfo, RpcError> {
        self.call(GET_BLOCK, &serde_json::json!({ "block_num_or_id": block_num }))
            .await
    }

    // ========================================================================
    // Table reads
    // ========================================================================

    /// Range-scan a contract table. Bounds and limit pass through verbatim;
    /// the caller drives pagination off `more`.
    pub async fn get_table_rows(&self, query: &TableRowsQuery) -> Result<TableRows, RpcError> {
        let body = serde_json::json!({
            "json": true,
            "code": query.code,
            "scope": query.scope,
            "table": query.table,
            "lower_bound": query.lower_bound,
            "upper_bound": query.upper_bound,
            "limit": query.limit,
        });
        self.call(GET_TABLE_ROWS, &body).await
    }

    /// Check whether an account exists on-chain.
    ///
    /// Accounts that have been created always have a row in the `userres`
    /// resource table under their own scope, so a single-row range scan
    /// pinned to the name answers the question.
    pub async fn account_exists(&self, name: &AccountName) -> Result<bool, RpcError> {
        let name = name.to_string();
        let query = TableRowsQuery::new("eosio", name.clone(), "userres")
            .lower_bound(name.clone())
            .upper_bound(name)
            .limit(1);
        let rows = self.get_table_rows(&query).await?;
        Ok(!rows.rows.is_empty())
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Account names controlled by a public key, via the history plugin.
    ///
    /// The key is already validated by construction of [`PublicKey`], so a
    /// malformed key never reaches the network.
    pub async fn get_key_accounts(&self, key: &PublicKey) -> Result<Vec<AccountName>, RpcError> {
        let body = serde_json::json!({ "public_key": key.to_string() });
        let response: KeyAccounts = self.call(GET_KEY_ACCOUNTS, &body).await?;
        Ok(response.account_names)
    }

    /// Look up a transaction by id, optionally hinting the block it was in.
    ///
    /// A response carrying no transaction id at all fails decoding and is
    /// retried on another endpoint like any other malformed answer.
    pub async fn get_transaction(
        &self,
        txid: &str,
        block_num_hint: Option<u32>,
    ) -> Result<TransactionInfo, RpcError> {
        let mut body = serde_json::json!({ "id": txid });
        if let Some(block_num) = block_num_hint {
            body["block_num_hint"] = block_num.into();
        }
        self.call(GET_TRANSACTION, &body).await
    }

    // ========================================================================
    // Currency
    // ========================================================================

    /// Balance of `account` in `symbol` on the given token contract.
    ///
    /// Nodes report no holding as an empty list rather than an error; that
    /// is a zero balance, not a failure.
    pub async fn get_currency_balance(
        &self,
        contract: &AccountName,
        account: &AccountName,
        symbol: &str,
    ) -> Result<f64, RpcError> {
        let body = serde_json::json!({
            "code": contract.to_string(),
            "account": account.to_string(),
            "symbol": symbol,
        });
        let balances: Vec<Asset> = self.call(GET_CURRENCY_BALANCE, &body).await?;
        Ok(balances.first().map(Asset::to_f64).unwrap_or(0.0))
    }

    /// Supply statistics for a token symbol on the given contract.
    pub async fn get_currency_stats(
        &self,
        contract: &AccountName,
        symbol: &str,
    ) -> Result<CurrencyStats, RpcError> {
        let body = serde_json::json!({
            "code": contract.to_string(),
            "symbol": symbol,
        });
        let (endpoint, mut stats): (String, HashMap<String, CurrencyStats>) =
            self.call_inner(GET_CURRENCY_STATS, &body).await?;
        stats.remove(symbol).ok_or_else(|| {
            RpcError::transport(
                endpoint,
                format!("node returned no stats entry for symbol {symbol}"),
            )
        })
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Submit a signed, packed transaction.
    pub async fn push_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> Result<TransactionReceipt, RpcError> {
        self.call(PUSH_TRANSACTION, &signed.to_push_params()).await
    }
}
