//! Balance Reporting Module
//!
//! Merges tracking runs into a per-chain report with totals.

pub mod report;

pub use report::*;
