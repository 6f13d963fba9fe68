//! Destination validation and payment-ID resolution.
//!
//! A submission names its recipients as raw address and amount strings, plus
//! an optional manually entered payment ID. Resolution decodes everything,
//! then settles where the payment ID actually lives: inside an integrated
//! address (embedded or synthesized here) or as a submission-level ID packed
//! into tx_extra at construction time. At most one integrated destination
//! may survive, and when one does the submission-level ID must be empty.

use crate::error::SendError;
use xmrlite_types::address::{parse_address, to_integrated, ParsedAddress};
use xmrlite_types::amount::parse_amount;
use xmrlite_types::constants::Network;
use xmrlite_types::payment_id;

/// Final recipient list entering construction.
#[derive(Debug, Clone)]
pub struct ResolvedDestinations {
    /// Addresses to pay, possibly containing one synthesized integrated
    /// address. Parallel to `amounts`.
    pub addresses: Vec<String>,
    /// Atomic units per destination; a single placeholder zero when sweeping.
    pub amounts: Vec<u64>,
    pub is_integrated: bool,
    /// Payment ID shown to the user in the success record.
    pub display_payment_id: Option<String>,
    /// Submission-level payment ID handed to construction. Always `None`
    /// when any destination is integrated.
    pub payment_id: Option<String>,
}

/// Validate raw destination input and resolve payment-ID placement.
pub fn resolve_destinations(
    destinations: &[String],
    amounts: &[String],
    is_sweeping: bool,
    manual_payment_id: Option<&str>,
    network: Network,
) -> Result<ResolvedDestinations, SendError> {
    if is_sweeping {
        if destinations.len() != 1 {
            return Err(SendError::CountMismatch);
        }
    } else if destinations.is_empty() || destinations.len() != amounts.len() {
        return Err(SendError::CountMismatch);
    }

    let parsed_amounts = if is_sweeping {
        vec![0]
    } else {
        let mut parsed = Vec::with_capacity(amounts.len());
        for raw in amounts {
            let amount = parse_amount(raw)?;
            if amount == 0 {
                return Err(SendError::ZeroAmount);
            }
            parsed.push(amount);
        }
        parsed
    };

    let mut decoded = Vec::with_capacity(destinations.len());
    for destination in destinations {
        let parsed = parse_address(destination)
            .map_err(|e| SendError::InvalidAddress(e.to_string()))?;
        if parsed.network != network {
            return Err(SendError::InvalidAddress(format!(
                "address is not for {network:?}"
            )));
        }
        decoded.push(parsed);
    }

    if !payment_id::is_valid_or_absent(manual_payment_id) {
        return Err(SendError::InvalidPaymentId);
    }

    let mut addresses = Vec::with_capacity(destinations.len());
    let mut is_integrated = false;
    let mut display_payment_id: Option<String> = None;
    let mut submission_payment_id = manual_payment_id.map(str::to_owned);

    for (destination, parsed) in destinations.iter().zip(&decoded) {
        match resolve_one(destination, parsed, manual_payment_id)? {
            Resolution::Integrated { address, display } => {
                if is_integrated {
                    return Err(SendError::MultipleIntegratedAddresses);
                }
                is_integrated = true;
                display_payment_id = Some(display);
                submission_payment_id = None;
                addresses.push(address);
            }
            Resolution::Plain(address) => addresses.push(address),
        }
    }

    Ok(ResolvedDestinations {
        addresses,
        amounts: parsed_amounts,
        is_integrated,
        display_payment_id,
        payment_id: submission_payment_id,
    })
}

enum Resolution {
    Integrated { address: String, display: String },
    Plain(String),
}

/// Settle one destination, in priority order: an embedded payment ID wins,
/// then a short manual ID fuses with any non-subaddress, otherwise the
/// address passes through untouched.
fn resolve_one(
    destination: &str,
    parsed: &ParsedAddress,
    manual_payment_id: Option<&str>,
) -> Result<Resolution, SendError> {
    if let Some(embedded) = parsed.payment_id {
        return Ok(Resolution::Integrated {
            address: destination.to_owned(),
            display: hex::encode(embedded),
        });
    }

    if let Some(manual) = manual_payment_id {
        if payment_id::is_short_payment_id(manual) && !parsed.is_subaddress() {
            let pid = payment_id::parse_short(manual)
                .map_err(|_| SendError::InvalidPaymentId)?;
            let fused = to_integrated(destination, &pid)
                .map_err(|_| SendError::IntegratedAddressConstruction)?;
            return Ok(Resolution::Integrated {
                address: fused,
                display: manual.to_owned(),
            });
        }
    }

    Ok(Resolution::Plain(destination.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmrlite_types::address::create_address;
    use xmrlite_types::constants::{AddressType, COIN, PAYMENT_ID_SIZE};

    fn standard(tag: u8) -> String {
        create_address(
            Network::Mainnet,
            AddressType::Standard,
            &[tag; 32],
            &[tag.wrapping_add(1); 32],
            None,
        )
        .unwrap()
    }

    fn subaddress(tag: u8) -> String {
        create_address(
            Network::Mainnet,
            AddressType::Subaddress,
            &[tag; 32],
            &[tag.wrapping_add(1); 32],
            None,
        )
        .unwrap()
    }

    fn integrated(tag: u8, pid: [u8; PAYMENT_ID_SIZE]) -> String {
        create_address(
            Network::Mainnet,
            AddressType::Integrated,
            &[tag; 32],
            &[tag.wrapping_add(1); 32],
            Some(&pid),
        )
        .unwrap()
    }

    fn resolve(
        destinations: &[String],
        amounts: &[&str],
        manual: Option<&str>,
    ) -> Result<ResolvedDestinations, SendError> {
        let amounts: Vec<String> = amounts.iter().map(|s| s.to_string()).collect();
        resolve_destinations(destinations, &amounts, false, manual, Network::Mainnet)
    }

    #[test]
    fn test_count_mismatch_checked_before_parsing() {
        // Garbage addresses never get decoded when the counts are off.
        let err = resolve(&["x".into(), "y".into()], &["1"], None).unwrap_err();
        assert!(matches!(err, SendError::CountMismatch));
    }

    #[test]
    fn test_sweep_requires_exactly_one_destination() {
        let dests = vec![standard(0x10), standard(0x20)];
        let err =
            resolve_destinations(&dests, &[], true, None, Network::Mainnet).unwrap_err();
        assert!(matches!(err, SendError::CountMismatch));
    }

    #[test]
    fn test_sweep_uses_placeholder_amount() {
        let dests = vec![standard(0x10)];
        let resolved =
            resolve_destinations(&dests, &[], true, None, Network::Mainnet).unwrap();
        assert_eq!(resolved.amounts, vec![0]);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let err = resolve(&[standard(0x10)], &["0"], None).unwrap_err();
        assert!(matches!(err, SendError::ZeroAmount));
    }

    #[test]
    fn test_malformed_amount_rejected() {
        let err = resolve(&[standard(0x10)], &["1.2.3"], None).unwrap_err();
        assert!(matches!(err, SendError::AmountParse(_)));
    }

    #[test]
    fn test_garbled_address_rejected() {
        let err = resolve(&["4notanaddress".into()], &["1"], None).unwrap_err();
        assert!(matches!(err, SendError::InvalidAddress(_)));
    }

    #[test]
    fn test_wrong_network_rejected() {
        let testnet = create_address(
            Network::Testnet,
            AddressType::Standard,
            &[0x10; 32],
            &[0x11; 32],
            None,
        )
        .unwrap();
        let err = resolve(&[testnet], &["1"], None).unwrap_err();
        assert!(matches!(err, SendError::InvalidAddress(_)));
    }

    #[test]
    fn test_malformed_payment_id_rejected() {
        let err = resolve(&[standard(0x10)], &["1"], Some("nope")).unwrap_err();
        assert!(matches!(err, SendError::InvalidPaymentId));
    }

    #[test]
    fn test_plain_destination_passes_through() {
        let dest = standard(0x10);
        let resolved = resolve(&[dest.clone()], &["1"], None).unwrap();
        assert_eq!(resolved.addresses, vec![dest]);
        assert_eq!(resolved.amounts, vec![COIN]);
        assert!(!resolved.is_integrated);
        assert!(resolved.payment_id.is_none());
        assert!(resolved.display_payment_id.is_none());
    }

    #[test]
    fn test_embedded_id_wins_and_clears_submission_id() {
        let pid = [0x5A; PAYMENT_ID_SIZE];
        let dest = integrated(0x10, pid);
        let long_manual = "ab".repeat(32);
        let resolved = resolve(&[dest.clone()], &["1"], Some(&long_manual)).unwrap();
        assert!(resolved.is_integrated);
        assert_eq!(resolved.addresses, vec![dest]);
        assert_eq!(resolved.display_payment_id.as_deref(), Some("5a5a5a5a5a5a5a5a"));
        assert!(resolved.payment_id.is_none());
    }

    #[test]
    fn test_short_manual_id_synthesizes_integrated() {
        let dest = standard(0x10);
        let resolved = resolve(&[dest.clone()], &["1"], Some("0123456789abcdef")).unwrap();
        assert!(resolved.is_integrated);
        assert_ne!(resolved.addresses[0], dest);

        let fused = parse_address(&resolved.addresses[0]).unwrap();
        assert!(fused.is_integrated());
        assert_eq!(fused.payment_id, Some([0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]));
        assert_eq!(resolved.display_payment_id.as_deref(), Some("0123456789abcdef"));
        assert!(resolved.payment_id.is_none());
    }

    #[test]
    fn test_short_manual_id_with_subaddress_rides_through() {
        let dest = subaddress(0x10);
        let resolved = resolve(&[dest.clone()], &["1"], Some("0123456789abcdef")).unwrap();
        assert!(!resolved.is_integrated);
        assert_eq!(resolved.addresses, vec![dest]);
        assert_eq!(resolved.payment_id.as_deref(), Some("0123456789abcdef"));
        assert!(resolved.display_payment_id.is_none());
    }

    #[test]
    fn test_long_manual_id_never_synthesizes() {
        let dest = standard(0x10);
        let long_manual = "cd".repeat(32);
        let resolved = resolve(&[dest.clone()], &["1"], Some(&long_manual)).unwrap();
        assert!(!resolved.is_integrated);
        assert_eq!(resolved.addresses, vec![dest]);
        assert_eq!(resolved.payment_id.as_deref(), Some(long_manual.as_str()));
    }

    #[test]
    fn test_second_embedded_integrated_rejected() {
        let dests = vec![integrated(0x10, [1; 8]), integrated(0x20, [2; 8])];
        let err = resolve(&dests, &["1", "2"], None).unwrap_err();
        assert!(matches!(err, SendError::MultipleIntegratedAddresses));
    }

    #[test]
    fn test_embedded_then_synthesized_rejected() {
        let dests = vec![integrated(0x10, [1; 8]), standard(0x20)];
        let err = resolve(&dests, &["1", "2"], Some("0123456789abcdef")).unwrap_err();
        assert!(matches!(err, SendError::MultipleIntegratedAddresses));
    }

    #[test]
    fn test_two_synthesized_rejected() {
        let dests = vec![standard(0x10), standard(0x20)];
        let err = resolve(&dests, &["1", "2"], Some("0123456789abcdef")).unwrap_err();
        assert!(matches!(err, SendError::MultipleIntegratedAddresses));
    }
}
