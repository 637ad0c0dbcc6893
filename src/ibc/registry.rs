//! Chain Topology Registry
//!
//! Immutable chain records plus the channel table, validated for completeness
//! when built. Can be loaded from a JSON file that narrows the chain set or
//! overrides endpoints and channels of the built-in topology.

use super::address::convert_address_prefix;
use super::channels::ChannelTable;
use super::types::{Chain, ChainName};
use crate::error::{TrackerError, TrackerResult};
use crate::log_warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Origin chain of the built-in registry
pub const DEFAULT_ORIGIN: ChainName = ChainName::Neutron;

/// Registry of chains and the channels between them
#[derive(Debug, Clone)]
pub struct Registry {
    origin: ChainName,
    chains: Vec<Chain>,
    channels: ChannelTable,
}

impl Registry {
    /// Build and validate a registry.
    ///
    /// Fails when the origin is not configured, a chain is listed twice, an
    /// endpoint is not a valid URL, or any ordered pair of distinct chains
    /// lacks a channel.
    pub fn new(origin: ChainName, chains: Vec<Chain>, channels: ChannelTable) -> TrackerResult<Self> {
        let mut seen = HashSet::new();
        for chain in &chains {
            if !seen.insert(chain.name) {
                return Err(TrackerError::configuration(format!(
                    "chain {} registered twice",
                    chain.name
                )));
            }
            if chain.bech32_prefix.trim().is_empty() {
                return Err(TrackerError::configuration(format!(
                    "chain {} has no address prefix",
                    chain.name
                )));
            }
            Url::parse(&chain.rest_endpoint).map_err(|e| {
                TrackerError::configuration(format!(
                    "invalid REST endpoint for {}: {}",
                    chain.name, e
                ))
            })?;
        }

        if !seen.contains(&origin) {
            return Err(TrackerError::configuration(format!(
                "origin chain {} is not registered",
                origin
            )));
        }

        let names: Vec<ChainName> = chains.iter().map(|c| c.name).collect();
        channels.validate_complete(&names)?;

        Ok(Self {
            origin,
            chains,
            channels,
        })
    }

    /// Registry of every built-in chain and channel
    pub fn builtin() -> TrackerResult<Self> {
        Self::new(
            DEFAULT_ORIGIN,
            ChainName::all().into_iter().map(Chain::builtin).collect(),
            ChannelTable::builtin(),
        )
    }

    /// Build a registry from a parsed configuration file
    pub fn from_config(config: RegistryConfig) -> TrackerResult<Self> {
        let origin = config.origin.unwrap_or(DEFAULT_ORIGIN);

        let chains: Vec<Chain> = if config.chains.is_empty() {
            ChainName::all().into_iter().map(Chain::builtin).collect()
        } else {
            config.chains.into_iter().map(ChainConfig::into_chain).collect()
        };

        let mut channels = ChannelTable::builtin();
        for channel in config.channels {
            channels.insert(channel.destination, channel.source, channel.channel_id);
        }

        Self::new(origin, chains, channels)
    }

    /// Load a registry from a JSON file
    pub fn load(path: impl AsRef<Path>) -> TrackerResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: RegistryConfig = serde_json::from_str(&raw)?;
        Self::from_config(config)
    }

    pub fn origin(&self) -> ChainName {
        self.origin
    }

    /// Chains in registry order
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain_names(&self) -> Vec<ChainName> {
        self.chains.iter().map(|c| c.name).collect()
    }

    pub fn origin_chain(&self) -> TrackerResult<&Chain> {
        self.chain(self.origin)
    }

    /// Look up a chain record
    pub fn chain(&self, name: ChainName) -> TrackerResult<&Chain> {
        self.chains
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TrackerError::configuration(format!("chain {} is not registered", name)))
    }

    /// Channel `destination` uses to reach `source`
    pub fn channel(&self, destination: ChainName, source: ChainName) -> TrackerResult<&str> {
        self.chain(destination)?;
        self.chain(source)?;
        self.channels.require(destination, source)
    }

    /// Address of `account` on `chain`.
    ///
    /// Re-encodes the account under the chain's prefix unless the chain carries
    /// an explicit `address_override`, which is used verbatim.
    pub fn address_for(&self, name: ChainName, account: &str) -> TrackerResult<String> {
        let chain = self.chain(name)?;
        match &chain.address_override {
            Some(fixed) => {
                log_warn!(
                    "registry",
                    "Using configured address override instead of re-encoding",
                    chain = name,
                    address = fixed,
                );
                Ok(fixed.clone())
            }
            None => convert_address_prefix(account, &chain.bech32_prefix),
        }
    }
}

/// Registry file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub origin: Option<ChainName>,
    /// Chains to track; empty means every built-in chain
    pub chains: Vec<ChainConfig>,
    /// Channels added on top of the built-in table
    pub channels: Vec<ChannelConfig>,
}

/// A chain entry; unset fields fall back to the built-in values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: ChainName,
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(default)]
    pub rpc_endpoint: Option<String>,
    #[serde(default)]
    pub rest_endpoint: Option<String>,
    #[serde(default)]
    pub bech32_prefix: Option<String>,
    #[serde(default)]
    pub address_override: Option<String>,
}

impl ChainConfig {
    fn into_chain(self) -> Chain {
        let base = Chain::builtin(self.name);
        Chain {
            name: self.name,
            chain_id: self.chain_id.unwrap_or(base.chain_id),
            rpc_endpoint: self.rpc_endpoint.unwrap_or(base.rpc_endpoint),
            rest_endpoint: self.rest_endpoint.unwrap_or(base.rest_endpoint),
            bech32_prefix: self.bech32_prefix.unwrap_or(base.bech32_prefix),
            address_override: self.address_override,
        }
    }
}

/// A channel entry: the channel `destination` uses to reach `source`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub destination: ChainName,
    pub source: ChainName,
    pub channel_id: String,
}
