//! Core value types: names, assets, keys, wire schemas, transactions.

mod asset;
mod key;
mod name;
mod rpc;
mod transaction;

pub use asset::{Asset, Symbol};
pub use key::{PrivateKey, PublicKey, Signature};
pub use name::AccountName;
pub use rpc::{
    BlockInfo, ChainInfo, CurrencyStats, KeyAccounts, TableRows, TableRowsQuery,
    TransactionInfo, TransactionReceipt, DEFAULT_TABLE_LIMIT,
};
pub use transaction::{Action, PermissionLevel, SignedTransaction, Transaction};
