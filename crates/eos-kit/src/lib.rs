//! An ergonomic Rust client for EOS mainnet.
//!
//! **eos-kit** talks to the chain through a pool of public RPC endpoints,
//! none of which are individually reliable. Every operation picks a random
//! endpoint and rotates to another on transport-level failures, so flaky
//! nodes cost a retry instead of an error.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use eos_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), eos_kit::Error> {
//!     // Read-only client over the default mainnet pool
//!     let eos = Eos::mainnet();
//!
//!     let balance = eos.balance("eoscafeblock", "EOS").await?;
//!     println!("Balance: {balance} EOS");
//!
//!     Ok(())
//! }
//! ```
//!
//! Transfers need a signer:
//!
//! ```rust,no_run
//! use eos_kit::*;
//!
//! # async fn run(wif: &str) -> Result<(), eos_kit::Error> {
//! let eos = Eos::builder().credentials(wif).build()?;
//! let receipt = eos.transfer("alice", "bob", "1.0000", "EOS", "thanks").await?;
//! println!("tx: {}", receipt.transaction_id);
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//!
//! 1. **Single entry point**: Everything hangs off the [`Eos`] client
//! 2. **Configure once**: Endpoint pool, signer, and tokens set at creation;
//!    the pool is immutable — [`Eos::at`] gives a pinned *copy*, it never
//!    mutates shared state
//! 3. **Validate locally, fail fast**: Account names, public keys, and
//!    quantities parse into typed values before any network round trip
//! 4. **Typed failures**: [`RpcError`] distinguishes endpoint problems
//!    (retried elsewhere) from chain rejections (terminal)
//!
//! # Core Types
//!
//! - [`AccountName`] - Validated chain account name (base-32, 64-bit packed)
//! - [`Asset`], [`Symbol`] - Token quantities with fixed decimal precision
//! - [`PublicKey`], [`PrivateKey`], [`Signature`] - K1 (secp256k1) crypto

mod client;
mod error;
mod tokens;
mod types;

pub use client::{
    assemble, sign_and_push, EndpointPool, Eos, EosBuilder, HttpTransport, InMemorySigner,
    RpcClient, Signer, Transport, BLOCKS_BEHIND, EXPIRE_SECONDS, KNOWN_BAD_ENDPOINTS,
    MAINNET_ENDPOINTS, MAX_ATTEMPTS,
};
pub use error::{
    Error, ParseAssetError, ParseKeyError, ParseNameError, RpcError, SignerError,
};
pub use tokens::{Token, TokenRegistry};
pub use types::{
    AccountName, Action, Asset, BlockInfo, ChainInfo, CurrencyStats, KeyAccounts, PermissionLevel,
    PrivateKey, PublicKey, SignedTransaction, Signature, Symbol, TableRows, TableRowsQuery,
    Transaction, TransactionInfo, TransactionReceipt, DEFAULT_TABLE_LIMIT,
};
