//! Bech32 address prefix translation
//!
//! The tracked chains derive addresses from the same key material
//! (coin type 118), so an account's address on another chain is the same
//! payload re-encoded under that chain's prefix. This is not a generic
//! cross-chain derivation.

use crate::error::{TrackerError, TrackerResult};

/// Human readable part of a bech32 address
pub fn address_prefix(address: &str) -> TrackerResult<String> {
    let (hrp, _, _) = bech32::decode(address).map_err(|e| TrackerError::decoding(address, e))?;
    Ok(hrp)
}

/// Re-encode `address` under `new_prefix`, keeping payload and checksum variant
pub fn convert_address_prefix(address: &str, new_prefix: &str) -> TrackerResult<String> {
    let (_, data, variant) =
        bech32::decode(address).map_err(|e| TrackerError::decoding(address, e))?;

    bech32::encode(new_prefix, data, variant).map_err(|e| TrackerError::decoding(address, e))
}

/// Check that `address` is a valid bech32 address with `expected_prefix`
pub fn validate_address(address: &str, expected_prefix: &str) -> TrackerResult<()> {
    let hrp = address_prefix(address)?;
    if hrp != expected_prefix {
        return Err(TrackerError::decoding(
            address,
            format!("expected prefix '{}', found '{}'", expected_prefix, hrp),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bech32::{ToBase32, Variant};

    fn encode(hrp: &str, payload: &[u8]) -> String {
        bech32::encode(hrp, payload.to_base32(), Variant::Bech32).unwrap()
    }

    #[test]
    fn test_convert_prefix_keeps_payload() {
        let payload = [0xABu8; 20];
        let neutron = encode("neutron", &payload);

        let osmo = convert_address_prefix(&neutron, "osmo").unwrap();
        assert_eq!(osmo, encode("osmo", &payload));
        assert!(osmo.starts_with("osmo1"));
    }

    #[test]
    fn test_round_trip() {
        let neutron = encode("neutron", &[7u8; 20]);
        let cosmos = convert_address_prefix(&neutron, "cosmos").unwrap();
        assert_eq!(convert_address_prefix(&cosmos, "neutron").unwrap(), neutron);
        assert_eq!(convert_address_prefix(&neutron, "neutron").unwrap(), neutron);
    }

    #[test]
    fn test_bad_checksum() {
        let mut addr = encode("neutron", &[1u8; 20]);
        let last = addr.pop().unwrap();
        addr.push(if last == 'q' { 'p' } else { 'q' });

        let err = convert_address_prefix(&addr, "osmo").unwrap_err();
        assert!(matches!(err, TrackerError::Decoding { .. }));
    }

    #[test]
    fn test_not_bech32() {
        assert!(convert_address_prefix("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045", "osmo").is_err());
        assert!(convert_address_prefix("", "osmo").is_err());
    }

    #[test]
    fn test_validate_address() {
        let addr = encode("neutron", &[9u8; 20]);
        assert!(validate_address(&addr, "neutron").is_ok());

        let err = validate_address(&addr, "osmo").unwrap_err();
        assert!(err.to_string().contains("expected prefix 'osmo'"));
    }
}
