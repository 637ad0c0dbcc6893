//! IBC denom tracking
//!
//! Derives the wrapped (`ibc/...`) forms of a token along every path through a
//! fixed chain topology and matches them against an account's balances.

pub mod types;
pub mod channels;
pub mod registry;
pub mod address;
pub mod denom;
pub mod client;
pub mod tracker;


pub use types::*;
pub use channels::ChannelTable;
pub use registry::{Registry, RegistryConfig};
pub use address::{convert_address_prefix, validate_address};
pub use denom::{get_denom, hash_trace, trace_hops};
pub use client::{BalanceSource, LcdClient, StaticBalances};
pub use tracker::{explore, BalanceSnapshot, BalanceTracker, ChainRecords, SnapshotSet};
