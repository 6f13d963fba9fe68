//! Monero address parsing, validation, and creation.
//!
//! Covers standard, integrated, and subaddress forms across all three
//! networks. An integrated address carries an 8-byte payment ID between the
//! view key and the checksum; subaddresses can never carry one.

use crate::base58;
use crate::constants::{
    address_data_size, get_prefix, prefix_info, AddressType, Network, KEY_SIZE, PAYMENT_ID_SIZE,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("address must be a non-empty string")]
    Empty,

    #[error("invalid address length ({0})")]
    InvalidLength(usize),

    #[error("base58 decode error: {0}")]
    Base58(#[from] base58::Base58Error),

    #[error("unknown address prefix {0}")]
    UnknownPrefix(u64),

    #[error("invalid payload length: expected {expected} bytes, got {actual}")]
    InvalidDataLength { expected: usize, actual: usize },

    #[error("key must be {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    #[error("integrated addresses require a payment ID")]
    MissingPaymentId,

    #[error("payment ID must be {expected} bytes, got {actual}")]
    InvalidPaymentIdSize { expected: usize, actual: usize },

    #[error("address must be a standard address, got {0:?}")]
    NotStandard(AddressType),

    #[error("address must be an integrated address, got {0:?}")]
    NotIntegrated(AddressType),
}

/// Result of parsing an address.
#[derive(Debug, Clone)]
pub struct ParsedAddress {
    pub network: Network,
    pub address_type: AddressType,
    pub spend_public_key: [u8; KEY_SIZE],
    pub view_public_key: [u8; KEY_SIZE],
    pub payment_id: Option<[u8; PAYMENT_ID_SIZE]>,
}

impl ParsedAddress {
    pub fn is_integrated(&self) -> bool {
        self.address_type == AddressType::Integrated
    }

    pub fn is_subaddress(&self) -> bool {
        self.address_type == AddressType::Subaddress
    }
}

/// Parse and validate a Monero address string.
pub fn parse_address(address: &str) -> Result<ParsedAddress, AddressError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AddressError::Empty);
    }

    // Standard and subaddresses encode to 95 chars, integrated to 106.
    if address.len() < 95 || address.len() > 106 {
        return Err(AddressError::InvalidLength(address.len()));
    }

    let (tag, data) = base58::decode_address(address)?;
    let info = prefix_info(tag).ok_or(AddressError::UnknownPrefix(tag))?;

    let expected = address_data_size(info.address_type);
    if data.len() != expected {
        return Err(AddressError::InvalidDataLength { expected, actual: data.len() });
    }

    let mut spend_public_key = [0u8; KEY_SIZE];
    spend_public_key.copy_from_slice(&data[..KEY_SIZE]);

    let mut view_public_key = [0u8; KEY_SIZE];
    view_public_key.copy_from_slice(&data[KEY_SIZE..KEY_SIZE * 2]);

    let payment_id = if info.address_type == AddressType::Integrated {
        let mut pid = [0u8; PAYMENT_ID_SIZE];
        pid.copy_from_slice(&data[KEY_SIZE * 2..KEY_SIZE * 2 + PAYMENT_ID_SIZE]);
        Some(pid)
    } else {
        None
    };

    Ok(ParsedAddress {
        network: info.network,
        address_type: info.address_type,
        spend_public_key,
        view_public_key,
        payment_id,
    })
}

/// Validate a Monero address string.
pub fn is_valid_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

/// Create an address string from components.
pub fn create_address(
    network: Network,
    addr_type: AddressType,
    spend_public_key: &[u8],
    view_public_key: &[u8],
    payment_id: Option<&[u8]>,
) -> Result<String, AddressError> {
    if spend_public_key.len() != KEY_SIZE {
        return Err(AddressError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: spend_public_key.len(),
        });
    }
    if view_public_key.len() != KEY_SIZE {
        return Err(AddressError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: view_public_key.len(),
        });
    }

    let mut data = Vec::with_capacity(address_data_size(addr_type));
    data.extend_from_slice(spend_public_key);
    data.extend_from_slice(view_public_key);

    if addr_type == AddressType::Integrated {
        let pid = payment_id.ok_or(AddressError::MissingPaymentId)?;
        if pid.len() != PAYMENT_ID_SIZE {
            return Err(AddressError::InvalidPaymentIdSize {
                expected: PAYMENT_ID_SIZE,
                actual: pid.len(),
            });
        }
        data.extend_from_slice(pid);
    }

    Ok(base58::encode_address(get_prefix(network, addr_type), &data))
}

/// Fuse a standard address and a short payment ID into an integrated address.
pub fn to_integrated(address: &str, payment_id: &[u8; PAYMENT_ID_SIZE]) -> Result<String, AddressError> {
    let parsed = parse_address(address)?;
    if parsed.address_type != AddressType::Standard {
        return Err(AddressError::NotStandard(parsed.address_type));
    }

    create_address(
        parsed.network,
        AddressType::Integrated,
        &parsed.spend_public_key,
        &parsed.view_public_key,
        Some(payment_id),
    )
}

/// Project an integrated address back onto its standard address.
pub fn to_standard(address: &str) -> Result<String, AddressError> {
    let parsed = parse_address(address)?;
    if parsed.address_type != AddressType::Integrated {
        return Err(AddressError::NotIntegrated(parsed.address_type));
    }

    create_address(
        parsed.network,
        AddressType::Standard,
        &parsed.spend_public_key,
        &parsed.view_public_key,
        None,
    )
}
