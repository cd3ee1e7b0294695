//! Endpoint pool: the set of candidate RPC nodes.
//!
//! Public EOS endpoints are independently operated and individually
//! unreliable, so the client spreads load across a pool and rotates away
//! from nodes that misbehave. The pool itself is a plain immutable value
//! owned by each client; overriding it means building a client with a
//! different pool, never mutating shared state.

use rand::Rng;

use crate::error::Error;

/// Mainnet seed endpoints known to serve the chain API.
pub const MAINNET_ENDPOINTS: &[&str] = &[
    "http://eos.infstones.io",
    "https://eos.infstones.io",
    "http://eos.eoscafeblock.com",
    "https://eos.eoscafeblock.com",
    "https://node.betdice.one",
    "http://api.main.alohaeos.com",
    "https://api.main.alohaeos.com",
    "http://api-mainnet.starteos.io",
    "https://api-mainnet.starteos.io",
    "https://bp.whaleex.com",
    "https://api.zbeos.com",
    "https://node1.zbeos.com",
    "https://api.eoslaomao.com",
    "http://peer1.eoshuobipool.com:8181",
    "http://peer2.eoshuobipool.com:8181",
    "https://api.redpacketeos.com",
    "https://mainnet.eoscannon.io",
];

/// Endpoints observed returning malformed responses or rejecting standard
/// requests. Kept for diagnostics and connectivity probing only; never
/// merged into a default pool.
pub const KNOWN_BAD_ENDPOINTS: &[&str] = &[
    "https://api1.eosasia.one",
    "http://api.hkeos.com",
    "https://mainnet.eoscanada.com",
    "https://api.eosnewyork.io",
];

/// An immutable, non-empty set of candidate endpoint URLs.
#[derive(Clone, Debug)]
pub struct EndpointPool {
    endpoints: Vec<String>,
}

impl EndpointPool {
    /// The default mainnet pool.
    pub fn mainnet() -> Self {
        Self {
            endpoints: MAINNET_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The known-bad pool, for probing and failure-path testing.
    pub fn known_bad() -> Self {
        Self {
            endpoints: KNOWN_BAD_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// A pool over the given URLs. Fails on an empty list — a client with
    /// nowhere to send requests is a configuration error.
    pub fn new(endpoints: Vec<String>) -> Result<Self, Error> {
        if endpoints.is_empty() {
            return Err(Error::Config("endpoint pool must not be empty".into()));
        }
        Ok(Self { endpoints })
    }

    /// A single-endpoint pool: every selection returns `url`.
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            endpoints: vec![url.into()],
        }
    }

    /// Pick one endpoint uniformly at random.
    pub fn select(&self) -> &str {
        // non-empty by construction
        let idx = rand::thread_rng().gen_range(0..self.endpoints.len());
        &self.endpoints[idx]
    }

    /// All endpoints in the pool.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Number of endpoints in the pool.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always false: empty pools cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_pool_is_populated() {
        let pool = EndpointPool::mainnet();
        assert!(pool.len() >= 10);
        assert!(pool.endpoints().iter().all(|e| e.starts_with("http")));
    }

    #[test]
    fn test_good_and_bad_sets_are_disjoint() {
        for bad in KNOWN_BAD_ENDPOINTS {
            assert!(!MAINNET_ENDPOINTS.contains(bad), "{bad} in both sets");
        }
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(
            EndpointPool::new(vec![]).unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_single_pool_always_selects_same() {
        let pool = EndpointPool::single("http://localhost:8888");
        for _ in 0..10 {
            assert_eq!(pool.select(), "http://localhost:8888");
        }
    }

    #[test]
    fn test_select_stays_in_pool() {
        let pool = EndpointPool::mainnet();
        for _ in 0..50 {
            let chosen = pool.select();
            assert!(pool.endpoints().iter().any(|e| e == chosen));
        }
    }

    #[test]
    fn test_select_covers_pool_eventually() {
        let pool =
            EndpointPool::new(vec!["http://a".into(), "http://b".into(), "http://c".into()])
                .unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pool.select().to_string());
        }
        assert_eq!(seen.len(), 3, "uniform selection should hit every endpoint");
    }
}
