//! IBC Channel Table
//!
//! Transfer channels between the built-in chains, and the dense
//! `(destination, source)` lookup used when deriving denom traces.

use super::types::ChainName;
use crate::error::{TrackerError, TrackerResult};

/// Known transfer channels.
///
/// Each entry is `(chain, counterparty, channel_id)`: the channel `chain` uses
/// to reach `counterparty`. A token arriving on `chain` from `counterparty`
/// gains the `transfer/<channel_id>/` prefix.
pub const KNOWN_CHANNELS: &[(ChainName, ChainName, &str)] = &[
    // Neutron <-> Osmosis
    (ChainName::Neutron, ChainName::Osmosis, "channel-10"),
    (ChainName::Osmosis, ChainName::Neutron, "channel-874"),
    // Neutron <-> Cosmos Hub
    (ChainName::Neutron, ChainName::CosmosHub, "channel-1"),
    (ChainName::CosmosHub, ChainName::Neutron, "channel-569"),
    // Neutron <-> Stride
    (ChainName::Neutron, ChainName::Stride, "channel-8"),
    (ChainName::Stride, ChainName::Neutron, "channel-123"),
    // Neutron <-> Celestia
    (ChainName::Neutron, ChainName::Celestia, "channel-35"),
    (ChainName::Celestia, ChainName::Neutron, "channel-8"),
    // Neutron <-> Noble
    (ChainName::Neutron, ChainName::Noble, "channel-30"),
    (ChainName::Noble, ChainName::Neutron, "channel-18"),
    // Osmosis <-> Cosmos Hub
    (ChainName::Osmosis, ChainName::CosmosHub, "channel-0"),
    (ChainName::CosmosHub, ChainName::Osmosis, "channel-141"),
    // Osmosis <-> Stride
    (ChainName::Osmosis, ChainName::Stride, "channel-326"),
    (ChainName::Stride, ChainName::Osmosis, "channel-5"),
    // Osmosis <-> Celestia
    (ChainName::Osmosis, ChainName::Celestia, "channel-6994"),
    (ChainName::Celestia, ChainName::Osmosis, "channel-2"),
    // Osmosis <-> Noble
    (ChainName::Osmosis, ChainName::Noble, "channel-750"),
    (ChainName::Noble, ChainName::Osmosis, "channel-1"),
    // Cosmos Hub <-> Stride
    (ChainName::CosmosHub, ChainName::Stride, "channel-391"),
    (ChainName::Stride, ChainName::CosmosHub, "channel-0"),
    // Cosmos Hub <-> Celestia
    (ChainName::CosmosHub, ChainName::Celestia, "channel-617"),
    (ChainName::Celestia, ChainName::CosmosHub, "channel-0"),
    // Cosmos Hub <-> Noble
    (ChainName::CosmosHub, ChainName::Noble, "channel-536"),
    (ChainName::Noble, ChainName::CosmosHub, "channel-4"),
    // Stride <-> Celestia
    (ChainName::Stride, ChainName::Celestia, "channel-162"),
    (ChainName::Celestia, ChainName::Stride, "channel-4"),
    // Stride <-> Noble
    (ChainName::Stride, ChainName::Noble, "channel-197"),
    (ChainName::Noble, ChainName::Stride, "channel-29"),
    // Celestia <-> Noble
    (ChainName::Celestia, ChainName::Noble, "channel-6"),
    (ChainName::Noble, ChainName::Celestia, "channel-12"),
];

/// Dense channel lookup indexed by `(destination, source)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable {
    cells: Vec<Option<String>>,
}

impl Default for ChannelTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            cells: vec![None; ChainName::COUNT * ChainName::COUNT],
        }
    }

    /// Table holding every known channel
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (destination, source, channel_id) in KNOWN_CHANNELS {
            table.insert(*destination, *source, *channel_id);
        }
        table
    }

    fn slot(destination: ChainName, source: ChainName) -> usize {
        destination.index() * ChainName::COUNT + source.index()
    }

    /// Register the channel `destination` uses to reach `source`
    pub fn insert(&mut self, destination: ChainName, source: ChainName, channel_id: impl Into<String>) {
        self.cells[Self::slot(destination, source)] = Some(channel_id.into());
    }

    /// Get channel between two chains
    pub fn get(&self, destination: ChainName, source: ChainName) -> Option<&str> {
        self.cells[Self::slot(destination, source)].as_deref()
    }

    /// Get channel between two chains, failing on a registry gap
    pub fn require(&self, destination: ChainName, source: ChainName) -> TrackerResult<&str> {
        self.get(destination, source)
            .ok_or_else(|| TrackerError::missing_channel(destination, source))
    }

    /// Check that every ordered pair of distinct `chains` has a non-empty channel
    pub fn validate_complete(&self, chains: &[ChainName]) -> TrackerResult<()> {
        let mut missing = Vec::new();
        for destination in chains {
            for source in chains {
                if destination == source {
                    continue;
                }
                match self.get(*destination, *source) {
                    Some(id) if !id.trim().is_empty() => {}
                    _ => missing.push(format!("{} <- {}", destination, source)),
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TrackerError::configuration(format!(
                "channel table incomplete, missing: {}",
                missing.join(", ")
            )))
        }
    }

    /// Number of registered channels
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
