//! Token registry: symbol code → issuing contract and precision.
//!
//! Token transfers need two facts the chain cannot be asked for cheaply: the
//! contract that issues a symbol and the symbol's decimal precision. The
//! registry holds those facts. It seeds the core token (`EOS` on
//! `eosio.token`, precision 4) and callers register anything else they trade.

use std::collections::HashMap;

use crate::error::{Error, ParseAssetError};
use crate::types::{AccountName, Symbol};

/// A registered token: its symbol and the contract that issues it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// The token symbol (code + precision).
    pub symbol: Symbol,
    /// The issuing contract account.
    pub contract: AccountName,
}

/// Lookup table from symbol code to [`Token`].
#[derive(Clone, Debug)]
pub struct TokenRegistry {
    tokens: HashMap<String, Token>,
}

impl TokenRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    /// Register a token by code, contract, and precision.
    pub fn register(
        &mut self,
        code: &str,
        contract: AccountName,
        precision: u8,
    ) -> Result<(), ParseAssetError> {
        let symbol = Symbol::new(code, precision)?;
        self.tokens.insert(code.to_string(), Token { symbol, contract });
        Ok(())
    }

    /// Look up a token by its symbol code.
    pub fn get(&self, code: &str) -> Option<Token> {
        self.tokens.get(code).copied()
    }

    /// Look up a token, erroring if the code was never registered.
    pub fn resolve(&self, code: &str) -> Result<Token, Error> {
        self.get(code)
            .ok_or_else(|| Error::TokenNotRegistered(code.to_string()))
    }
}

impl Default for TokenRegistry {
    /// A registry seeded with the core token.
    fn default() -> Self {
        let mut registry = Self::empty();
        // "eosio.token" is a valid name and "EOS"/4 a valid symbol
        let contract = AccountName::from_value(6138663591592764928);
        registry
            .register("EOS", contract, 4)
            .unwrap_or_else(|_| unreachable!("core token is valid"));
        registry
    }
}
