//! IBC Types and Data Structures
//!
//! Core types for denom tracking: chains, denom traces, balances and records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chains of the built-in topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainName {
    Neutron,
    Osmosis,
    CosmosHub,
    Stride,
    Celestia,
    Noble,
}

impl ChainName {
    /// Number of built-in chains
    pub const COUNT: usize = 6;

    /// Dense index, used by the channel table
    pub fn index(&self) -> usize {
        match self {
            ChainName::Neutron => 0,
            ChainName::Osmosis => 1,
            ChainName::CosmosHub => 2,
            ChainName::Stride => 3,
            ChainName::Celestia => 4,
            ChainName::Noble => 5,
        }
    }

    /// Registry key of the chain
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainName::Neutron => "neutron",
            ChainName::Osmosis => "osmosis",
            ChainName::CosmosHub => "cosmoshub",
            ChainName::Stride => "stride",
            ChainName::Celestia => "celestia",
            ChainName::Noble => "noble",
        }
    }

    /// Get the chain ID
    pub fn chain_id(&self) -> &'static str {
        match self {
            ChainName::Neutron => "neutron-1",
            ChainName::Osmosis => "osmosis-1",
            ChainName::CosmosHub => "cosmoshub-4",
            ChainName::Stride => "stride-1",
            ChainName::Celestia => "celestia",
            ChainName::Noble => "noble-1",
        }
    }

    /// Get Bech32 address prefix
    pub fn bech32_prefix(&self) -> &'static str {
        match self {
            ChainName::Neutron => "neutron",
            ChainName::Osmosis => "osmo",
            ChainName::CosmosHub => "cosmos",
            ChainName::Stride => "stride",
            ChainName::Celestia => "celestia",
            ChainName::Noble => "noble",
        }
    }

    /// Get RPC endpoint
    pub fn rpc_endpoint(&self) -> &'static str {
        match self {
            ChainName::Neutron => "https://neutron-rpc.polkachu.com",
            ChainName::Osmosis => "https://osmosis-rpc.polkachu.com",
            ChainName::CosmosHub => "https://cosmos-rpc.polkachu.com",
            ChainName::Stride => "https://stride-rpc.polkachu.com",
            ChainName::Celestia => "https://celestia-rpc.polkachu.com",
            ChainName::Noble => "https://noble-rpc.polkachu.com",
        }
    }

    /// Get REST API endpoint
    pub fn rest_endpoint(&self) -> &'static str {
        match self {
            ChainName::Neutron => "https://neutron-api.polkachu.com",
            ChainName::Osmosis => "https://osmosis-api.polkachu.com",
            ChainName::CosmosHub => "https://cosmos-api.polkachu.com",
            ChainName::Stride => "https://stride-api.polkachu.com",
            ChainName::Celestia => "https://celestia-api.polkachu.com",
            ChainName::Noble => "https://noble-api.polkachu.com",
        }
    }

    /// Get all built-in chains, in registry order
    pub fn all() -> Vec<ChainName> {
        vec![
            ChainName::Neutron,
            ChainName::Osmosis,
            ChainName::CosmosHub,
            ChainName::Stride,
            ChainName::Celestia,
            ChainName::Noble,
        ]
    }
}

impl fmt::Display for ChainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ChainName::all()
            .into_iter()
            .find(|c| c.as_str() == lower || c.chain_id() == lower)
            .ok_or_else(|| format!("unknown chain '{}'", s))
    }
}

/// Chain registry record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub name: ChainName,
    pub chain_id: String,
    pub rpc_endpoint: String,
    /// LCD endpoint serving the bank module queries
    pub rest_endpoint: String,
    pub bech32_prefix: String,
    /// Fixed address used on this chain instead of a re-encoded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_override: Option<String>,
}

impl Chain {
    /// Built-in record for a chain
    pub fn builtin(name: ChainName) -> Self {
        Self {
            name,
            chain_id: name.chain_id().to_string(),
            rpc_endpoint: name.rpc_endpoint().to_string(),
            rest_endpoint: name.rest_endpoint().to_string(),
            bech32_prefix: name.bech32_prefix().to_string(),
            address_override: None,
        }
    }
}

/// A denom together with the hop path it was derived from.
///
/// For a native denom `denom == trace`. After one or more hops, `trace` is
/// `transfer/<channel>/.../<base>` and `denom` is `ibc/<SHA256(trace)>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DenomTrace {
    pub denom: String,
    pub trace: String,
}

impl DenomTrace {
    /// Zero-hop trace of a denom on its origin chain
    pub fn native(base_denom: &str) -> Self {
        Self {
            denom: base_denom.to_string(),
            trace: base_denom.to_string(),
        }
    }

    /// Check if this is a native denom (not IBC)
    pub fn is_native(&self) -> bool {
        !self.denom.starts_with("ibc/")
    }
}

/// Coin representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// A positive balance of a wrapped (or native) form of a tracked denom,
/// reached through `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub denom: String,
    pub origin_denom: String,
    #[serde(with = "amount_string")]
    pub balance: u128,
    /// Chains crossed, starting at the origin and ending where the balance sits
    pub path: Vec<ChainName>,
}

impl BalanceRecord {
    /// Chain the balance sits on
    pub fn chain(&self) -> Option<ChainName> {
        self.path.last().copied()
    }

    /// Render the path as `a, b, c`
    pub fn path_display(&self) -> String {
        self.path
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Cosmos amounts are integers serialized as strings
pub(crate) mod amount_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
