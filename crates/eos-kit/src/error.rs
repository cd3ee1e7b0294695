//! Error types for eos-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by most operations
//!   - [`RpcError`] — RPC-specific errors, classified by how the endpoint
//!     failed (transport, capability, chain-level)
//!   - [`ParseNameError`] — Invalid account name
//!   - [`ParseAssetError`] — Invalid asset quantity or symbol
//!   - [`ParseKeyError`] — Invalid key or signature encoding
//!   - [`SignerError`] — Signing operation failures
//!
//! # Retry Classification
//!
//! [`RpcError::is_retryable`] is the single source of truth for whether a
//! failure is worth retrying against a *different* endpoint. Transport-level
//! failures (garbage instead of JSON, connection errors) and missing-plugin
//! failures (`Unknown Endpoint`) are retryable; anything the chain itself
//! rejected is terminal and surfaces verbatim.
//!
//! ```rust,no_run
//! use eos_kit::{Error, Eos, RpcError};
//!
//! # async fn example() -> Result<(), Error> {
//! let eos = Eos::mainnet();
//!
//! match eos.account_exists("cryptoforest").await {
//!     Ok(exists) => println!("exists: {exists}"),
//!     Err(Error::Rpc(RpcError::Chain { what, .. })) => {
//!         println!("node rejected the query: {what}");
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Error parsing an account name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseNameError {
    #[error("Account name is empty")]
    Empty,

    #[error("Account name '{0}' is too long (max 13 characters)")]
    TooLong(String),

    #[error("Account name '{0}' contains invalid character '{1}' (allowed: a-z, 1-5, '.')")]
    InvalidChar(String, char),

    #[error("Account name '{0}' has an invalid 13th character (must be one of '.12345a-j')")]
    InvalidThirteenth(String),

    #[error("Account name '{0}' must not end with '.'")]
    TrailingDot(String),
}

/// Error parsing an asset quantity or symbol.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAssetError {
    #[error("Invalid asset format: '{0}'. Use '<amount> <SYMBOL>' like '1.0000 EOS'")]
    InvalidFormat(String),

    #[error("Invalid number in asset: '{0}'")]
    InvalidNumber(String),

    #[error("Invalid symbol code: '{0}' (1-7 uppercase letters A-Z)")]
    InvalidSymbol(String),

    #[error("Symbol precision {0} is too large (max 18)")]
    PrecisionTooLarge(u8),

    #[error("Quantity '{quantity}' has the wrong number of decimal places for {symbol} (expected {expected})")]
    PrecisionMismatch {
        quantity: String,
        symbol: String,
        expected: u8,
    },

    #[error("Asset amount overflow: value too large")]
    Overflow,
}

/// Error parsing a public key, private key, or signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid key format: expected 'EOS...', 'PUB_K1_...', a WIF key, or 'PVT_K1_...'")]
    InvalidFormat,

    #[error("Unknown key type: '{0}'")]
    UnknownKeyType(String),

    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Checksum mismatch: key material is corrupt or mistyped")]
    BadChecksum,

    #[error("Invalid curve point: key bytes do not represent a valid point on the curve")]
    InvalidCurvePoint,
}

/// Error during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Invalid private key scalar")]
    InvalidSecretKey,

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

// ============================================================================
// RPC Errors
// ============================================================================

/// RPC-specific errors.
///
/// Every variant that originates from a node carries the endpoint URL that
/// was attempted, so callers can tell which node failed and why.
#[derive(Debug, Error)]
pub enum RpcError {
    // ─── Transport class (retryable on another endpoint) ───
    #[error("HTTP error from {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    // ─── Capability class (retryable on another endpoint) ───
    #[error("Endpoint {endpoint} does not support {path}: {message}")]
    EndpointUnsupported {
        endpoint: String,
        path: String,
        message: String,
    },

    // ─── Chain class (terminal, surfaced verbatim) ───
    #[error("Chain error from {endpoint}: {name}: {what} (code: {code})")]
    Chain {
        endpoint: String,
        code: i64,
        name: String,
        what: String,
        details: Option<serde_json::Value>,
    },
}

impl RpcError {
    /// Check if this error is worth retrying against a different endpoint.
    ///
    /// Transport failures and unsupported-method failures say something about
    /// the *node*; chain errors say something about the *request* and are
    /// never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Http { .. } => true,
            RpcError::Transport { .. } => true,
            RpcError::EndpointUnsupported { .. } => true,
            RpcError::Chain { .. } => false,
        }
    }

    /// The endpoint URL that produced this error.
    pub fn endpoint(&self) -> &str {
        match self {
            RpcError::Http { endpoint, .. }
            | RpcError::Transport { endpoint, .. }
            | RpcError::EndpointUnsupported { endpoint, .. }
            | RpcError::Chain { endpoint, .. } => endpoint,
        }
    }

    /// Create a malformed-response error.
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        RpcError::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("No signer configured. Call .signer() or .credentials() on EosBuilder.")]
    NoSigner,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Token {0} is not registered. Call .token() on EosBuilder or TokenRegistry::register.")]
    TokenNotRegistered(String),

    // ─── Parsing ───
    #[error(transparent)]
    ParseName(#[from] ParseNameError),

    #[error(transparent)]
    ParseAsset(#[from] ParseAssetError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    // ─── RPC ───
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Malformed chain id in get_info response: {0}")]
    MalformedChainId(String),

    // ─── Signing ───
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    // ─── Serialization ───
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
