//! RPC request and response types for the nodeos HTTP API.
//!
//! Schemas here are dictated by the node software; field names match the
//! wire exactly. Rows coming back from table scans are contract-defined and
//! stay untyped (`serde_json::Value`).

use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::asset::Asset;
use super::name::AccountName;

/// Default row limit for table range scans.
pub const DEFAULT_TABLE_LIMIT: u32 = 100;

/// A contract table range-scan query.
///
/// Bounds are passed through to the node verbatim; an empty bound means
/// "unbounded" on that side. The default limit is 100 rows.
///
/// ```
/// use eos_kit::TableRowsQuery;
///
/// let query = TableRowsQuery::new("eosio.token", "alice", "accounts")
///     .lower_bound("EOS")
///     .limit(10);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct TableRowsQuery {
    /// The contract account that owns the table.
    pub code: String,
    /// The scope within the contract (often an account name).
    pub scope: String,
    /// The table name.
    pub table: String,
    /// Inclusive lower bound, or empty for unbounded.
    pub lower_bound: String,
    /// Inclusive upper bound, or empty for unbounded.
    pub upper_bound: String,
    /// Maximum number of rows to return.
    pub limit: u32,
}

impl TableRowsQuery {
    /// Create a query over the full table range with the default limit.
    pub fn new(
        code: impl Into<String>,
        scope: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            scope: scope.into(),
            table: table.into(),
            lower_bound: String::new(),
            upper_bound: String::new(),
            limit: DEFAULT_TABLE_LIMIT,
        }
    }

    /// Set the inclusive lower bound.
    pub fn lower_bound(mut self, bound: impl Into<String>) -> Self {
        self.lower_bound = bound.into();
        self
    }

    /// Set the inclusive upper bound.
    pub fn upper_bound(mut self, bound: impl Into<String>) -> Self {
        self.upper_bound = bound.into();
        self
    }

    /// Set the row limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Result of a table range scan.
#[derive(Clone, Debug, Deserialize)]
pub struct TableRows {
    /// Contract-defined rows; no invariant on shape.
    pub rows: Vec<serde_json::Value>,
    /// True when more rows exist past `limit` — the caller paginates.
    #[serde(default)]
    pub more: bool,
}

/// Response from `/v1/history/get_key_accounts`.
#[derive(Clone, Debug, Deserialize)]
pub struct KeyAccounts {
    /// Accounts whose permissions reference the queried key.
    pub account_names: Vec<AccountName>,
}

/// Response from `/v1/chain/get_currency_stats`, one entry per symbol.
#[derive(Clone, Debug, Deserialize)]
pub struct CurrencyStats {
    /// Circulating supply.
    pub supply: Asset,
    /// Maximum supply.
    pub max_supply: Asset,
    /// The account that issued the token.
    pub issuer: AccountName,
}

/// Response from `/v1/chain/get_info` (subset this client uses).
#[derive(Clone, Debug, Deserialize)]
pub struct ChainInfo {
    /// Chain identifier, 32 bytes hex-encoded.
    pub chain_id: String,
    /// Current head block number.
    pub head_block_num: u32,
    /// Latest irreversible block number.
    pub last_irreversible_block_num: u32,
    #[serde(default)]
    pub head_block_id: String,
    #[serde(default)]
    pub head_block_time: String,
    #[serde(default)]
    pub server_version: String,
}

impl ChainInfo {
    /// Decode the chain id into the 32 raw bytes used in signing digests.
    pub fn chain_id_bytes(&self) -> Result<[u8; 32], Error> {
        let bytes =
            hex::decode(&self.chain_id).map_err(|_| Error::MalformedChainId(self.chain_id.clone()))?;
        bytes
            .try_into()
            .map_err(|_| Error::MalformedChainId(self.chain_id.clone()))
    }
}

/// Response from `/v1/chain/get_block` (subset this client uses).
#[derive(Clone, Debug, Deserialize)]
pub struct BlockInfo {
    /// The block number.
    pub block_num: u32,
    /// The block id, 32 bytes hex-encoded.
    pub id: String,
    /// TAPOS prefix for transactions referencing this block.
    pub ref_block_prefix: u32,
    #[serde(default)]
    pub timestamp: String,
}

/// Receipt returned by `/v1/chain/push_transaction`.
#[derive(Clone, Debug, Deserialize)]
pub struct TransactionReceipt {
    /// Id of the accepted transaction.
    pub transaction_id: String,
    /// Node-reported execution trace, left untyped.
    #[serde(default)]
    pub processed: serde_json::Value,
}

/// Response from `/v1/history/get_transaction`.
///
/// Different node versions report the id under different field names, so
/// both are kept and [`TransactionInfo::id`] resolves whichever is present.
/// A response carrying neither fails deserialization, which classifies it
/// as a malformed answer from that node.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "RawTransactionInfo")]
pub struct TransactionInfo {
    pub id: Option<String>,
    pub transaction_id: Option<String>,
    pub block_num: Option<u32>,
    /// Full transaction trace, left untyped.
    pub trx: serde_json::Value,
}

#[derive(Deserialize)]
struct RawTransactionInfo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    transaction_id: Option<String>,
    #[serde(default)]
    block_num: Option<u32>,
    #[serde(default)]
    trx: serde_json::Value,
}

impl TryFrom<RawTransactionInfo> for TransactionInfo {
    type Error = String;

    fn try_from(raw: RawTransactionInfo) -> Result<Self, Self::Error> {
        if raw.id.is_none() && raw.transaction_id.is_none() {
            return Err("unknown response format: transaction id missing".to_string());
        }
        Ok(Self {
            id: raw.id,
            transaction_id: raw.transaction_id,
            block_num: raw.block_num,
            trx: raw.trx,
        })
    }
}

impl TransactionInfo {
    /// The transaction id, whichever field the node used.
    pub fn id(&self) -> &str {
        self.transaction_id
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_default()
    }
}
