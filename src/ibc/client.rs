//! Balance sources
//!
//! `LcdClient` queries a chain's bank module over its REST (LCD) endpoint and
//! walks every page. `StaticBalances` serves fixed balances, for tests and for
//! replaying a saved snapshot file.

use super::types::{Chain, ChainName, Coin};
use crate::error::{TrackerError, TrackerResult};
use crate::log_debug;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

/// Default HTTP timeout for balance queries
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Page size requested from the bank module
pub const PAGE_LIMIT: u32 = 500;

/// Source of complete balance sets
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Every `(denom, amount)` held by `address` on `chain`
    async fn all_balances(&self, chain: &Chain, address: &str) -> TrackerResult<Vec<Coin>>;
}

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    #[serde(default)]
    balances: Vec<Coin>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next_key: Option<String>,
}

/// Bank module client over LCD REST endpoints
pub struct LcdClient {
    http: reqwest::Client,
    page_limit: u32,
}

impl LcdClient {
    /// Create a client with the given request timeout
    pub fn new(timeout: Duration) -> TrackerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ibc-denom-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrackerError::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            page_limit: PAGE_LIMIT,
        })
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    fn page_url(&self, chain: &Chain, address: &str, key: Option<&str>) -> String {
        let mut url = format!(
            "{}/cosmos/bank/v1beta1/balances/{}?pagination.limit={}",
            chain.rest_endpoint.trim_end_matches('/'),
            address,
            self.page_limit
        );
        if let Some(key) = key {
            url.push_str("&pagination.key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }
}

/// Next pagination key to request, or `None` once the listing is exhausted.
/// A key seen before means the endpoint is cycling.
fn next_page_key(
    chain: ChainName,
    seen: &mut HashSet<String>,
    pagination: Option<Pagination>,
) -> TrackerResult<Option<String>> {
    match pagination.and_then(|p| p.next_key).filter(|k| !k.is_empty()) {
        Some(key) if !seen.insert(key.clone()) => Err(TrackerError::network(
            chain,
            format!("pagination key {} returned twice", key),
        )),
        next => Ok(next),
    }
}

#[async_trait]
impl BalanceSource for LcdClient {
    async fn all_balances(&self, chain: &Chain, address: &str) -> TrackerResult<Vec<Coin>> {
        let mut coins = Vec::new();
        let mut next_key: Option<String> = None;
        let mut seen_keys = HashSet::new();
        let mut pages = 0usize;

        loop {
            let url = self.page_url(chain, address, next_key.as_deref());
            let resp = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| TrackerError::network(chain.name, e))?;

            let status = resp.status();
            if !status.is_success() {
                return Err(TrackerError::network(
                    chain.name,
                    format!("HTTP {} from {}", status.as_u16(), chain.rest_endpoint),
                ));
            }

            let page: BalancesResponse = resp.json().await.map_err(|e| {
                TrackerError::parse_error(format!("balances response from {}: {}", chain.name, e))
            })?;
            pages += 1;
            coins.extend(page.balances);

            next_key = next_page_key(chain.name, &mut seen_keys, page.pagination)?;
            if next_key.is_none() {
                break;
            }
        }

        log_debug!(
            "client",
            "Fetched balances",
            chain = chain.name,
            address = address,
            pages = pages,
            denoms = coins.len(),
        );

        Ok(coins)
    }
}

/// Fixed balances per chain
#[derive(Debug, Clone, Default)]
pub struct StaticBalances {
    balances: HashMap<ChainName, Vec<Coin>>,
    failing: HashSet<ChainName>,
}

impl StaticBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a balance on a chain
    pub fn with_balance(mut self, chain: ChainName, denom: impl Into<String>, amount: impl Into<String>) -> Self {
        self.balances
            .entry(chain)
            .or_default()
            .push(Coin::new(denom, amount));
        self
    }

    /// Make every query against `chain` fail
    pub fn failing_on(mut self, chain: ChainName) -> Self {
        self.failing.insert(chain);
        self
    }

    /// Load balances from a JSON object of `chain -> [{denom, amount}]`
    pub fn load(path: impl AsRef<Path>) -> TrackerResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> TrackerResult<Self> {
        let balances: HashMap<ChainName, Vec<Coin>> = serde_json::from_str(raw)?;
        Ok(Self {
            balances,
            failing: HashSet::new(),
        })
    }
}

#[async_trait]
impl BalanceSource for StaticBalances {
    async fn all_balances(&self, chain: &Chain, _address: &str) -> TrackerResult<Vec<Coin>> {
        if self.failing.contains(&chain.name) {
            return Err(TrackerError::network(chain.name, "balance query failed"));
        }
        Ok(self.balances.get(&chain.name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let client = LcdClient::new(Duration::from_secs(1)).unwrap();
        let mut chain = Chain::builtin(ChainName::Osmosis);
        chain.rest_endpoint = "http://localhost:1317/".to_string();

        assert_eq!(
            client.page_url(&chain, "osmo1abc", None),
            "http://localhost:1317/cosmos/bank/v1beta1/balances/osmo1abc?pagination.limit=500"
        );
        assert_eq!(
            client.page_url(&chain, "osmo1abc", Some("AB/+=")),
            "http://localhost:1317/cosmos/bank/v1beta1/balances/osmo1abc?pagination.limit=500&pagination.key=AB%2F%2B%3D"
        );
    }

    #[test]
    fn test_parse_balances_page() {
        let page: BalancesResponse = serde_json::from_str(
            r#"{
                "balances": [{"denom": "untrn", "amount": "42"}],
                "pagination": {"next_key": "AAE=", "total": "0"}
            }"#,
        )
        .unwrap();
        assert_eq!(page.balances, vec![Coin::new("untrn", "42")]);
        assert_eq!(page.pagination.unwrap().next_key.as_deref(), Some("AAE="));

        let last: BalancesResponse =
            serde_json::from_str(r#"{"balances": [], "pagination": {"next_key": null}}"#).unwrap();
        assert!(last.pagination.unwrap().next_key.is_none());
    }

    #[test]
    fn test_next_page_key_stops_on_repeat() {
        let page = |key: Option<&str>| {
            Some(Pagination {
                next_key: key.map(str::to_string),
            })
        };
        let mut seen = HashSet::new();

        let first = next_page_key(ChainName::Osmosis, &mut seen, page(Some("AAE="))).unwrap();
        assert_eq!(first.as_deref(), Some("AAE="));
        let second = next_page_key(ChainName::Osmosis, &mut seen, page(Some("AAI="))).unwrap();
        assert_eq!(second.as_deref(), Some("AAI="));

        let repeated = next_page_key(ChainName::Osmosis, &mut seen, page(Some("AAE=")));
        assert!(matches!(repeated, Err(TrackerError::Network { .. })));

        assert!(next_page_key(ChainName::Osmosis, &mut seen, page(Some("")))
            .unwrap()
            .is_none());
        assert!(next_page_key(ChainName::Osmosis, &mut seen, page(None)).unwrap().is_none());
        assert!(next_page_key(ChainName::Osmosis, &mut seen, None).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_static_balances() {
        let source = StaticBalances::new()
            .with_balance(ChainName::Neutron, "untrn", "10")
            .failing_on(ChainName::Stride);

        let neutron = source
            .all_balances(&Chain::builtin(ChainName::Neutron), "neutron1x")
            .await
            .unwrap();
        assert_eq!(neutron, vec![Coin::new("untrn", "10")]);

        let osmosis = source
            .all_balances(&Chain::builtin(ChainName::Osmosis), "osmo1x")
            .await
            .unwrap();
        assert!(osmosis.is_empty());

        let stride = source
            .all_balances(&Chain::builtin(ChainName::Stride), "stride1x")
            .await;
        assert!(matches!(stride, Err(TrackerError::Network { .. })));
    }

    #[test]
    fn test_static_balances_from_json() {
        let source = StaticBalances::from_json(
            r#"{"osmosis": [{"denom": "ibc/ABC", "amount": "7"}]}"#,
        )
        .unwrap();
        assert_eq!(source.balances[&ChainName::Osmosis][0].amount, "7");

        assert!(StaticBalances::from_json(r#"{"juno": []}"#).is_err());
    }
}
