//! Balance Tracker
//!
//! Enumerates every path a token can take from the origin chain through the
//! registered topology, deriving its wrapped denom hop by hop, and records
//! each path whose denom has a positive balance on the chain it ends at.
//!
//! A path may not revisit a chain, except the origin which may reappear as a
//! hub once. With `k` chains this explores at most `(k-1)!` leaf paths, which
//! is only reasonable for small fixed topologies.

use super::address::validate_address;
use super::client::BalanceSource;
use super::denom::get_denom;
use super::registry::Registry;
use super::types::{BalanceRecord, ChainName, Coin, DenomTrace};
use crate::error::{TrackerError, TrackerResult};
use crate::{log_debug, log_info};
use futures::future::try_join_all;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Records grouped by the chain they sit on. Chains without hits are absent.
pub type ChainRecords = BTreeMap<ChainName, Vec<BalanceRecord>>;

/// Balances of one chain, fetched once per run
#[derive(Debug, Clone, Default)]
pub struct BalanceSnapshot {
    amounts: HashMap<String, String>,
}

impl BalanceSnapshot {
    /// Index coins by denom; the first occurrence of a denom wins
    pub fn from_coins(coins: Vec<Coin>) -> Self {
        let mut amounts = HashMap::with_capacity(coins.len());
        for coin in coins {
            amounts.entry(coin.denom).or_insert(coin.amount);
        }
        Self { amounts }
    }

    /// Raw amount held for `denom`
    pub fn amount(&self, denom: &str) -> Option<&str> {
        self.amounts.get(denom).map(String::as_str)
    }

    /// Amount of `denom` if it parses to a positive integer
    pub fn positive_amount(&self, denom: &str) -> Option<u128> {
        self.amount(denom)
            .and_then(|a| a.trim().parse::<u128>().ok())
            .filter(|a| *a > 0)
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Snapshots of every registered chain for one run
#[derive(Debug, Clone, Default)]
pub struct SnapshotSet {
    snapshots: HashMap<ChainName, BalanceSnapshot>,
}

impl SnapshotSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chain: ChainName, snapshot: BalanceSnapshot) {
        self.snapshots.insert(chain, snapshot);
    }

    pub fn get(&self, chain: ChainName) -> TrackerResult<&BalanceSnapshot> {
        self.snapshots
            .get(&chain)
            .ok_or_else(|| TrackerError::configuration(format!("no balance snapshot for {}", chain)))
    }
}

/// One pending node of the traversal
struct Frame {
    path: Vec<ChainName>,
    trace: DenomTrace,
}

/// Walk every eligible path from the origin and collect balance hits.
///
/// Synchronous and read-only over `snapshots`. Frames are popped in the same
/// order a recursive depth-first walk would visit them.
pub fn explore(
    registry: &Registry,
    snapshots: &SnapshotSet,
    base_denom: &str,
) -> TrackerResult<ChainRecords> {
    let chains = registry.chain_names();
    let mut records = ChainRecords::new();
    let mut visited_paths = 0usize;

    let mut stack = vec![Frame {
        path: vec![registry.origin()],
        trace: DenomTrace::native(base_denom),
    }];

    while let Some(Frame { path, trace }) = stack.pop() {
        visited_paths += 1;
        let current = *path
            .last()
            .ok_or_else(|| TrackerError::configuration("empty traversal path"))?;

        if let Some(balance) = snapshots.get(current)?.positive_amount(&trace.denom) {
            records.entry(current).or_default().push(BalanceRecord {
                denom: trace.denom.clone(),
                origin_denom: base_denom.to_string(),
                balance,
                path: path.clone(),
            });
        }

        // Reverse so the first registered chain is popped first
        for &next in chains.iter().rev() {
            if next == current || path[1..].contains(&next) {
                continue;
            }
            let mut next_path = path.clone();
            next_path.push(next);
            stack.push(Frame {
                path: next_path,
                trace: get_denom(registry, current, next, &trace)?,
            });
        }
    }

    log_debug!(
        "tracker",
        "Traversal finished",
        denom = base_denom,
        paths = visited_paths,
        chains_with_hits = records.len(),
    );

    Ok(records)
}

/// Fetches balances and runs the traversal for tracked denoms
pub struct BalanceTracker<S> {
    registry: Arc<Registry>,
    source: S,
}

impl<S: BalanceSource> BalanceTracker<S> {
    pub fn new(registry: Arc<Registry>, source: S) -> Self {
        Self { registry, source }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Fetch a snapshot of every registered chain concurrently.
    ///
    /// `account` must be a valid address under the origin's prefix. Any failed
    /// query fails the whole set.
    pub async fn fetch_snapshots(&self, account: &str) -> TrackerResult<SnapshotSet> {
        let origin = self.registry.origin_chain()?;
        validate_address(account, &origin.bech32_prefix)?;

        let queries = self
            .registry
            .chains()
            .iter()
            .map(|chain| async move {
                let address = self.registry.address_for(chain.name, account)?;
                let coins = self.source.all_balances(chain, &address).await?;
                Ok::<_, TrackerError>((chain.name, BalanceSnapshot::from_coins(coins)))
            });

        let mut set = SnapshotSet::new();
        for (chain, snapshot) in try_join_all(queries).await? {
            set.insert(chain, snapshot);
        }
        Ok(set)
    }

    /// Reconstruct where `base_denom` is held by `account`, per chain
    pub async fn track_balances(&self, base_denom: &str, account: &str) -> TrackerResult<ChainRecords> {
        log_info!(
            "tracker",
            "Tracking balances",
            denom = base_denom,
            account = account,
            origin = self.registry.origin(),
        );

        let snapshots = self.fetch_snapshots(account).await?;
        explore(&self.registry, &snapshots, base_denom)
    }

    /// Run independent tracking runs for several denoms concurrently.
    /// A denom listed more than once is tracked once, at its first position.
    pub async fn track_many(
        &self,
        base_denoms: &[String],
        account: &str,
    ) -> TrackerResult<Vec<(String, ChainRecords)>> {
        let mut seen = HashSet::new();
        let unique: Vec<&String> = base_denoms
            .iter()
            .filter(|denom| seen.insert(denom.as_str()))
            .collect();

        let runs = unique.into_iter().map(|denom| async move {
            let records = self.track_balances(denom, account).await?;
            Ok::<_, TrackerError>((denom.clone(), records))
        });
        try_join_all(runs).await
    }
}
