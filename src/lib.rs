//! IBC Denom Tracker Library
//!
//! Reconstructs where an account holds a token across interconnected Cosmos
//! chains, including every wrapped `ibc/...` form reached through transfer
//! hops.
//!
//! # Architecture
//!
//! This crate provides:
//! - **ibc**: chain registry, denom trace derivation, address translation,
//!   balance sources and the path-exploring tracker
//! - **balances**: merging of tracking runs into reports
//! - **utils**: structured logging
//!
//! # Example
//!
//! ```rust,ignore
//! use ibc_denom_tracker::{BalanceTracker, LcdClient, Registry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(Registry::builtin()?);
//! let tracker = BalanceTracker::new(registry, LcdClient::new(Duration::from_secs(15))?);
//! let records = tracker.track_balances("untrn", "neutron1...").await?;
//! ```

pub mod error;
pub mod ibc;
pub mod balances;
pub mod utils;

// Re-export key types for convenience
pub use error::{TrackerError, TrackerResult};
pub use ibc::{
    convert_address_prefix, explore, get_denom, hash_trace, BalanceRecord, BalanceSource,
    BalanceTracker, Chain, ChainName, ChainRecords, DenomTrace, LcdClient, Registry,
    StaticBalances, trace_hops,
};
pub use balances::{Report, ReportFormat};
