//! Balance Report
//!
//! Merges the per-chain records of several tracked denoms, totals them per
//! tracked denom and renders the result as text or JSON.

use crate::error::{TrackerError, TrackerResult};
use crate::ibc::tracker::ChainRecords;
use crate::ibc::types::{BalanceRecord, ChainName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Merged records and totals for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub account: String,
    pub generated_at: String,
    /// Tracked denoms, in run order
    pub denoms: Vec<String>,
    pub chains: BTreeMap<ChainName, Vec<BalanceRecord>>,
    /// Sum of every record per tracked denom, as decimal strings
    pub totals: BTreeMap<String, String>,
}

impl Report {
    /// Union the records of each run per chain and total them per denom.
    ///
    /// Records of one chain keep run order, then traversal order. Every
    /// tracked denom gets a total, zero when nothing was found. A repeated
    /// run for an already merged denom is ignored.
    pub fn merge(account: &str, runs: Vec<(String, ChainRecords)>) -> TrackerResult<Self> {
        let mut denoms = Vec::with_capacity(runs.len());
        let mut chains: BTreeMap<ChainName, Vec<BalanceRecord>> = BTreeMap::new();
        let mut sums: BTreeMap<String, u128> = BTreeMap::new();

        for (denom, records) in runs {
            if denoms.contains(&denom) {
                continue;
            }
            sums.entry(denom.clone()).or_insert(0);
            denoms.push(denom);

            for (chain, chain_records) in records {
                for record in &chain_records {
                    let total = sums.entry(record.origin_denom.clone()).or_insert(0);
                    *total = total.checked_add(record.balance).ok_or_else(|| {
                        TrackerError::AmountOverflow {
                            denom: record.origin_denom.clone(),
                        }
                    })?;
                }
                chains.entry(chain).or_default().extend(chain_records);
            }
        }

        Ok(Self {
            account: account.to_string(),
            generated_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            denoms,
            chains,
            totals: sums.into_iter().map(|(d, v)| (d, v.to_string())).collect(),
        })
    }

    /// Number of records across all chains
    pub fn record_count(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }

    /// Plain text rendering: one `denom, origin, balance, [path]` line per
    /// record grouped by chain, followed by totals
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Account: {}", self.account);
        let _ = writeln!(out, "Generated: {}", self.generated_at);

        for (chain, records) in &self.chains {
            let _ = writeln!(out);
            let _ = writeln!(out, "[{}]", chain);
            for record in records {
                let _ = writeln!(
                    out,
                    "{}, {}, {}, [{}]",
                    record.denom,
                    record.origin_denom,
                    record.balance,
                    record.path_display()
                );
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Totals:");
        for denom in &self.denoms {
            let total = self.totals.get(denom).map(String::as_str).unwrap_or("0");
            let _ = writeln!(out, "{}: {}", denom, total);
        }
        out
    }

    pub fn to_json(&self) -> TrackerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: ReportFormat) -> TrackerResult<String> {
        match format {
            ReportFormat::Text => Ok(self.to_text()),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Write the rendered report to `path`
    pub fn write_to(&self, path: impl AsRef<Path>, format: ReportFormat) -> TrackerResult<()> {
        std::fs::write(path.as_ref(), self.render(format)?)?;
        Ok(())
    }
}
