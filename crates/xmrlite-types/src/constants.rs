//! Monero network constants and address prefixes.
//!
//! Reference: monero/src/cryptonote_config.h

use serde::{Deserialize, Serialize};

// =============================================================================
// Network Types
// =============================================================================

/// Network type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mainnet,
    Testnet,
    Stagenet,
}

/// Address type within a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    Standard,
    Integrated,
    Subaddress,
}

// =============================================================================
// Address Prefixes
// =============================================================================

/// Address prefix entry: the varint prefix value and what it denotes.
#[derive(Debug, Clone, Copy)]
pub struct PrefixInfo {
    pub prefix: u64,
    pub network: Network,
    pub address_type: AddressType,
}

/// All 9 address prefix entries (3 networks × 3 types).
pub static ALL_PREFIXES: [PrefixInfo; 9] = [
    // Mainnet
    PrefixInfo { prefix: 18, network: Network::Mainnet,  address_type: AddressType::Standard },
    PrefixInfo { prefix: 19, network: Network::Mainnet,  address_type: AddressType::Integrated },
    PrefixInfo { prefix: 42, network: Network::Mainnet,  address_type: AddressType::Subaddress },
    // Testnet
    PrefixInfo { prefix: 53, network: Network::Testnet,  address_type: AddressType::Standard },
    PrefixInfo { prefix: 54, network: Network::Testnet,  address_type: AddressType::Integrated },
    PrefixInfo { prefix: 63, network: Network::Testnet,  address_type: AddressType::Subaddress },
    // Stagenet
    PrefixInfo { prefix: 24, network: Network::Stagenet, address_type: AddressType::Standard },
    PrefixInfo { prefix: 25, network: Network::Stagenet, address_type: AddressType::Integrated },
    PrefixInfo { prefix: 36, network: Network::Stagenet, address_type: AddressType::Subaddress },
];

/// Look up prefix info by varint prefix value.
pub fn prefix_info(prefix: u64) -> Option<&'static PrefixInfo> {
    ALL_PREFIXES.iter().find(|p| p.prefix == prefix)
}

/// Get the prefix value for a network/type combination.
pub fn get_prefix(network: Network, addr_type: AddressType) -> u64 {
    match (network, addr_type) {
        (Network::Mainnet,  AddressType::Standard)   => 18,
        (Network::Mainnet,  AddressType::Integrated) => 19,
        (Network::Mainnet,  AddressType::Subaddress) => 42,
        (Network::Testnet,  AddressType::Standard)   => 53,
        (Network::Testnet,  AddressType::Integrated) => 54,
        (Network::Testnet,  AddressType::Subaddress) => 63,
        (Network::Stagenet, AddressType::Standard)   => 24,
        (Network::Stagenet, AddressType::Integrated) => 25,
        (Network::Stagenet, AddressType::Subaddress) => 36,
    }
}

// =============================================================================
// Key and Data Sizes
// =============================================================================

/// Size of a public/private key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the address checksum in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Size of the short payment ID embedded in integrated addresses.
pub const PAYMENT_ID_SIZE: usize = 8;

/// Size of a legacy standalone payment ID carried in tx extra.
pub const LEGACY_PAYMENT_ID_SIZE: usize = 32;

/// Address data size (without prefix or checksum), by address type.
pub fn address_data_size(addr_type: AddressType) -> usize {
    match addr_type {
        AddressType::Standard   => KEY_SIZE * 2,                   // 64 bytes
        AddressType::Integrated => KEY_SIZE * 2 + PAYMENT_ID_SIZE, // 72 bytes
        AddressType::Subaddress => KEY_SIZE * 2,                   // 64 bytes
    }
}

// =============================================================================
// Amount Units
// =============================================================================

/// Atomic units per coin (10^12).
pub const COIN: u64 = 1_000_000_000_000;

/// Number of decimal places for display.
pub const DISPLAY_DECIMAL_POINT: u32 = 12;

/// Outputs below this are dust once RingCT rules apply (pre-RingCT outputs
/// this small cannot be mixed and are skipped during selection).
pub const DEFAULT_DUST_THRESHOLD: u64 = 2_000_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_lookup() {
        let info = prefix_info(18).unwrap();
        assert_eq!(info.network, Network::Mainnet);
        assert_eq!(info.address_type, AddressType::Standard);

        let info = prefix_info(25).unwrap();
        assert_eq!(info.network, Network::Stagenet);
        assert_eq!(info.address_type, AddressType::Integrated);

        assert!(prefix_info(20).is_none());
    }

    #[test]
    fn test_get_prefix() {
        assert_eq!(get_prefix(Network::Mainnet, AddressType::Subaddress), 42);
        assert_eq!(get_prefix(Network::Testnet, AddressType::Standard), 53);
        assert_eq!(get_prefix(Network::Stagenet, AddressType::Integrated), 25);
    }

    #[test]
    fn test_address_data_size() {
        assert_eq!(address_data_size(AddressType::Standard), 64);
        assert_eq!(address_data_size(AddressType::Integrated), 72);
        assert_eq!(address_data_size(AddressType::Subaddress), 64);
    }
}
