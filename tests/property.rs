use bech32::{ToBase32, Variant};
use ibc_denom_tracker::ibc::{BalanceSnapshot, SnapshotSet};
use ibc_denom_tracker::{
    convert_address_prefix, explore, get_denom, hash_trace, trace_hops, ChainName, DenomTrace,
    Registry,
};
use proptest::prelude::*;

fn any_chain() -> impl Strategy<Value = ChainName> {
    prop::sample::select(ChainName::all())
}

fn any_base_denom() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9/]{1,30}"
}

/// Extend `walk` from the origin, keeping only hops the tracker would take
fn valid_path(registry: &Registry, walk: &[ChainName]) -> Vec<ChainName> {
    let mut path = vec![registry.origin()];
    for &next in walk {
        let current = *path.last().unwrap();
        if next != current && !path[1..].contains(&next) {
            path.push(next);
        }
    }
    path
}

fn is_ibc_denom(denom: &str) -> bool {
    match denom.strip_prefix("ibc/") {
        Some(hash) => {
            hash.len() == 64 && hash.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        }
        None => false,
    }
}

proptest! {
    #[test]
    fn derived_denoms_are_canonical(
        base in any_base_denom(),
        src in any_chain(),
        dest in any_chain(),
    ) {
        prop_assume!(src != dest);
        let registry = Registry::builtin().unwrap();
        let native = DenomTrace::native(&base);

        let first = get_denom(&registry, src, dest, &native).unwrap();
        let second = get_denom(&registry, src, dest, &native).unwrap();
        prop_assert_eq!(&first, &second);

        prop_assert!(is_ibc_denom(&first.denom));
        prop_assert_eq!(first.denom.clone(), hash_trace(&first.trace));

        let channel = registry.channel(dest, src).unwrap();
        prop_assert_eq!(first.trace, format!("transfer/{}/{}", channel, base));
    }

    #[test]
    fn address_round_trips(payload in prop::array::uniform20(any::<u8>()), chain in any_chain()) {
        let original = bech32::encode("neutron", payload.to_base32(), Variant::Bech32).unwrap();

        let moved = convert_address_prefix(&original, chain.bech32_prefix()).unwrap();
        let expected_hrp = format!("{}1", chain.bech32_prefix());
        prop_assert!(moved.starts_with(&expected_hrp), "{} lacks {}", moved, expected_hrp);
        prop_assert_eq!(convert_address_prefix(&moved, "neutron").unwrap(), original);
    }

    #[test]
    fn held_balances_are_found_along_their_path(
        walk in prop::collection::vec(any_chain(), 0..7),
        amount in 0u64..1_000_000,
    ) {
        let registry = Registry::builtin().unwrap();
        let path = valid_path(&registry, &walk);
        let hops: Vec<_> = path.windows(2).map(|w| (w[0], w[1])).collect();
        let denom = trace_hops(&registry, "untrn", &hops)
            .unwrap()
            .pop()
            .map(|t| t.denom)
            .unwrap_or_else(|| "untrn".to_string());
        let holder = *path.last().unwrap();

        let mut snapshots = SnapshotSet::new();
        for chain in registry.chain_names() {
            let coins = if chain == holder {
                vec![ibc_denom_tracker::ibc::Coin::new(denom.clone(), amount.to_string())]
            } else {
                Vec::new()
            };
            snapshots.insert(chain, BalanceSnapshot::from_coins(coins));
        }

        let records = explore(&registry, &snapshots, "untrn").unwrap();
        if amount == 0 {
            prop_assert!(records.is_empty());
        } else {
            prop_assert_eq!(records.len(), 1);
            let hits = &records[&holder];
            prop_assert_eq!(hits.len(), 1);
            prop_assert_eq!(&hits[0].path, &path);
            prop_assert_eq!(hits[0].balance, amount as u128);
            prop_assert_eq!(&hits[0].origin_denom, "untrn");
        }
    }
}
