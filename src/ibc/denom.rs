//! IBC denom trace derivation
//!
//! Each hop prepends `transfer/<channel>/` to the trace, where `<channel>` is
//! the channel on the receiving chain, then the whole trace is hashed:
//! `ibc/ + UPPERHEX(SHA256(trace))`.

use super::registry::Registry;
use super::types::{ChainName, DenomTrace};
use crate::error::{TrackerError, TrackerResult};
use sha2::{Digest, Sha256};

/// Port of the fungible token transfer application
pub const TRANSFER_PORT: &str = "transfer";

/// Hash a full trace into its `ibc/` denom
pub fn hash_trace(trace: &str) -> String {
    format!("ibc/{}", hex::encode_upper(Sha256::digest(trace.as_bytes())))
}

/// Denom trace after moving `base` from `src` to `dest`
pub fn get_denom(
    registry: &Registry,
    src: ChainName,
    dest: ChainName,
    base: &DenomTrace,
) -> TrackerResult<DenomTrace> {
    let channel_id = registry.channel(dest, src)?;
    let trace = format!("{}/{}/{}", TRANSFER_PORT, channel_id, base.trace);

    Ok(DenomTrace {
        denom: hash_trace(&trace),
        trace,
    })
}

/// Apply a sequence of hops starting from a native denom.
///
/// Each hop must leave from the chain the previous hop arrived on.
pub fn trace_hops(
    registry: &Registry,
    base_denom: &str,
    hops: &[(ChainName, ChainName)],
) -> TrackerResult<Vec<DenomTrace>> {
    let mut current = DenomTrace::native(base_denom);
    let mut traces = Vec::with_capacity(hops.len());
    let mut arrived: Option<ChainName> = None;

    for &(src, dest) in hops {
        if let Some(previous) = arrived {
            if previous != src {
                return Err(TrackerError::configuration(format!(
                    "hop {} -> {} does not leave from {}",
                    src, dest, previous
                )));
            }
        }
        current = get_denom(registry, src, dest, &current)?;
        traces.push(current.clone());
        arrived = Some(dest);
    }

    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ibc::channels::ChannelTable;
    use crate::ibc::types::Chain;

    fn registry() -> Registry {
        Registry::builtin().unwrap()
    }

    #[test]
    fn test_known_atom_on_osmosis() {
        // uatom on Osmosis through channel-0
        assert_eq!(
            hash_trace("transfer/channel-0/uatom"),
            "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
        );
    }

    #[test]
    fn test_single_hop() {
        let trace = get_denom(
            &registry(),
            ChainName::Neutron,
            ChainName::Osmosis,
            &DenomTrace::native("denomX"),
        )
        .unwrap();

        assert_eq!(trace.trace, "transfer/channel-874/denomX");
        assert_eq!(trace.denom, hash_trace("transfer/channel-874/denomX"));
        assert!(!trace.is_native());
    }

    #[test]
    fn test_hops_prepend() {
        let registry = registry();
        let traces = trace_hops(
            &registry,
            "untrn",
            &[
                (ChainName::Neutron, ChainName::CosmosHub),
                (ChainName::CosmosHub, ChainName::Osmosis),
            ],
        )
        .unwrap();

        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].trace, "transfer/channel-569/untrn");
        assert_eq!(traces[1].trace, "transfer/channel-0/transfer/channel-569/untrn");
    }

    #[test]
    fn test_hops_must_connect() {
        let err = trace_hops(
            &registry(),
            "untrn",
            &[
                (ChainName::Neutron, ChainName::Osmosis),
                (ChainName::Stride, ChainName::Noble),
            ],
        )
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("stride -> noble"));
    }

    #[test]
    fn test_deterministic() {
        let registry = registry();
        let base = DenomTrace::native("untrn");
        let a = get_denom(&registry, ChainName::Stride, ChainName::Noble, &base).unwrap();
        let b = get_denom(&registry, ChainName::Stride, ChainName::Noble, &base).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_denom_format() {
        let registry = registry();
        let base = DenomTrace::native("untrn");
        for src in ChainName::all() {
            for dest in ChainName::all() {
                if src == dest {
                    continue;
                }
                let trace = get_denom(&registry, src, dest, &base).unwrap();
                let hash = trace.denom.strip_prefix("ibc/").unwrap();
                assert_eq!(hash.len(), 64);
                assert!(hash.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
            }
        }
    }

    #[test]
    fn test_missing_edge() {
        let chains = vec![Chain::builtin(ChainName::Neutron), Chain::builtin(ChainName::Osmosis)];
        let registry = Registry::new(ChainName::Neutron, chains, ChannelTable::builtin()).unwrap();

        let err = get_denom(
            &registry,
            ChainName::Neutron,
            ChainName::Celestia,
            &DenomTrace::native("untrn"),
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }
}
