//! High-level client: string-friendly operations over the RPC layer.
//!
//! [`Eos`] is the front door. It owns the endpoint pool, an optional signer,
//! and the token registry, and exposes operations that take plain strings
//! and validate them locally before any network round trip.

use std::sync::Arc;

use crate::error::Error;
use crate::tokens::TokenRegistry;
use crate::types::{
    AccountName, Action, Asset, BlockInfo, ChainInfo, CurrencyStats, PublicKey, TableRows,
    TableRowsQuery, TransactionInfo, TransactionReceipt,
};

use super::endpoints::EndpointPool;
use super::rpc::RpcClient;
use super::signer::{InMemorySigner, Signer};
use super::transaction;
use super::transport::{HttpTransport, Transport};

/// EOS client: reads, history queries, and token transfers.
#[derive(Clone)]
pub struct Eos<T: Transport = HttpTransport> {
    rpc: RpcClient<T>,
    signer: Option<Arc<dyn Signer>>,
    tokens: TokenRegistry,
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for Eos<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Eos")
            .field("rpc", &self.rpc)
            .field("signer", &self.signer.as_ref().map(|_| "dyn Signer"))
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl Eos<HttpTransport> {
    /// A read-only client over the default mainnet pool.
    pub fn mainnet() -> Self {
        Self {
            rpc: RpcClient::mainnet(),
            signer: None,
            tokens: TokenRegistry::default(),
        }
    }

    /// A read-only client pinned to a single custom endpoint, e.g. a local
    /// node.
    pub fn custom(url: impl Into<String>) -> Self {
        Self {
            rpc: RpcClient::new(EndpointPool::single(url)),
            signer: None,
            tokens: TokenRegistry::default(),
        }
    }

    /// Start building a configured client.
    pub fn builder() -> EosBuilder {
        EosBuilder::default()
    }
}

impl<T: Transport> Eos<T> {
    /// Assemble a client from explicit parts. This is the injection point
    /// for a non-HTTP transport.
    pub fn from_parts(
        rpc: RpcClient<T>,
        signer: Option<Arc<dyn Signer>>,
        tokens: TokenRegistry,
    ) -> Self {
        Self { rpc, signer, tokens }
    }

    /// The underlying RPC client.
    pub fn rpc(&self) -> &RpcClient<T> {
        &self.rpc
    }

    /// A clone of this client pinned to a single endpoint.
    pub fn at(&self, url: impl Into<String>) -> Self
    where
        T: Clone,
    {
        Self {
            rpc: self.rpc.at(url),
            signer: self.signer.clone(),
            tokens: self.tokens.clone(),
        }
    }

    /// Chain info from one of the pool's nodes.
    pub async fn get_info(&self) -> Result<ChainInfo, Error> {
        Ok(self.rpc.get_info().await?)
    }

    /// Block header fields by block number.
    pub async fn get_block(&self, block_num: u32) -> Result<BlockInfo, Error> {
        Ok(self.rpc.get_block(block_num).await?)
    }

    /// Range-scan a contract table.
    pub async fn table_rows(&self, query: &TableRowsQuery) -> Result<TableRows, Error> {
        Ok(self.rpc.get_table_rows(query).await?)
    }

    /// Whether `name` is a created account. A malformed name is an error,
    /// not a "no".
    pub async fn account_exists(&self, name: &str) -> Result<bool, Error> {
        let name: AccountName = name.parse()?;
        Ok(self.rpc.account_exists(&name).await?)
    }

    /// Account names controlled by `public_key`. The key is validated
    /// locally; an invalid key fails without touching the network.
    pub async fn key_accounts(&self, public_key: &str) -> Result<Vec<AccountName>, Error> {
        let key: PublicKey = public_key.parse()?;
        Ok(self.rpc.get_key_accounts(&key).await?)
    }

    /// Balance of `account` in a registered token, as a float. Zero when the
    /// account holds none.
    pub async fn balance(&self, account: &str, symbol: &str) -> Result<f64, Error> {
        let token = self.tokens.resolve(symbol)?;
        let account: AccountName = account.parse()?;
        Ok(self
            .rpc
            .get_currency_balance(&token.contract, &account, symbol)
            .await?)
    }

    /// Supply statistics for a registered token.
    pub async fn currency_stats(&self, symbol: &str) -> Result<CurrencyStats, Error> {
        let token = self.tokens.resolve(symbol)?;
        Ok(self.rpc.get_currency_stats(&token.contract, symbol).await?)
    }

    /// Look up a transaction by id.
    pub async fn transaction(
        &self,
        txid: &str,
        block_num_hint: Option<u32>,
    ) -> Result<TransactionInfo, Error> {
        Ok(self.rpc.get_transaction(txid, block_num_hint).await?)
    }

    /// Transfer `quantity` of a registered token from `from` to `to`.
    ///
    /// `quantity` is a decimal string and must carry exactly the token's
    /// registered precision (`"1.0000"` for EOS, not `"1.0"`). All inputs
    /// are validated before the first network call.
    pub async fn transfer(
        &self,
        from: &str,
        to: &str,
        quantity: &str,
        symbol: &str,
        memo: &str,
    ) -> Result<TransactionReceipt, Error> {
        let signer = self.signer.as_ref().ok_or(Error::NoSigner)?;
        let token = self.tokens.resolve(symbol)?;
        let from: AccountName = from.parse()?;
        let to: AccountName = to.parse()?;
        let quantity = Asset::from_quantity(quantity, token.symbol)?;

        let action = Action::transfer(token.contract, from, to, quantity, memo);
        transaction::sign_and_push(&self.rpc, signer.as_ref(), vec![action]).await
    }
}

/// Builder for [`Eos`]. Configuration errors (bad keys, bad names) surface
/// at [`EosBuilder::build`].
#[derive(Default)]
pub struct EosBuilder {
    endpoints: Vec<String>,
    pool: Option<EndpointPool>,
    signer: Option<Arc<dyn Signer>>,
    wif: Option<String>,
    extra_tokens: Vec<(String, String, u8)>,
}

impl EosBuilder {
    /// Add one endpoint URL to the pool.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoints.push(url.into());
        self
    }

    /// Add several endpoint URLs to the pool.
    pub fn endpoints<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints.extend(urls.into_iter().map(Into::into));
        self
    }

    /// Use a prebuilt pool, ignoring any individually added endpoints.
    pub fn pool(mut self, pool: EndpointPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Use an explicit signer.
    pub fn signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Sign with a private key given as WIF or `PVT_K1_` text.
    pub fn credentials(mut self, wif: impl Into<String>) -> Self {
        self.wif = Some(wif.into());
        self
    }

    /// Register a token beyond the core one.
    pub fn token(mut self, code: impl Into<String>, contract: impl Into<String>, precision: u8) -> Self {
        self.extra_tokens.push((code.into(), contract.into(), precision));
        self
    }

    pub fn build(self) -> Result<Eos<HttpTransport>, Error> {
        let pool = match self.pool {
            Some(pool) => pool,
            None if self.endpoints.is_empty() => EndpointPool::mainnet(),
            None => EndpointPool::new(self.endpoints)?,
        };

        let signer: Option<Arc<dyn Signer>> = match (self.signer, self.wif) {
            (Some(signer), _) => Some(signer),
            (None, Some(wif)) => Some(Arc::new(InMemorySigner::from_wif(&wif)?)),
            (None, None) => None,
        };

        let mut tokens = TokenRegistry::default();
        for (code, contract, precision) in self.extra_tokens {
            let contract: AccountName = contract.parse()?;
            tokens.register(&code, contract, precision)?;
        }

        Ok(Eos {
            rpc: RpcClient::new(pool),
            signer,
            tokens,
        })
    }
}
