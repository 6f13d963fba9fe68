//! Payment ID validation and parsing.
//!
//! Two forms exist: the short 8-byte ID (16 hex chars) that can be fused into
//! an integrated address, and the legacy standalone 32-byte ID (64 hex chars)
//! carried in tx extra.

use crate::constants::{LEGACY_PAYMENT_ID_SIZE, PAYMENT_ID_SIZE};
use thiserror::Error;

/// Hex length of a short payment ID.
pub const SHORT_PAYMENT_ID_HEX_LEN: usize = PAYMENT_ID_SIZE * 2;

/// Hex length of a legacy standalone payment ID.
pub const LONG_PAYMENT_ID_HEX_LEN: usize = LEGACY_PAYMENT_ID_SIZE * 2;

#[derive(Debug, Error)]
pub enum PaymentIdError {
    #[error("payment ID must be {SHORT_PAYMENT_ID_HEX_LEN} or {LONG_PAYMENT_ID_HEX_LEN} hex chars, got {0}")]
    InvalidLength(usize),

    #[error("payment ID contains non-hex characters")]
    InvalidHex,
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// True for a well-formed short (fusible) payment ID.
pub fn is_short_payment_id(s: &str) -> bool {
    s.len() == SHORT_PAYMENT_ID_HEX_LEN && is_hex(s)
}

/// True for a well-formed legacy standalone payment ID.
pub fn is_long_payment_id(s: &str) -> bool {
    s.len() == LONG_PAYMENT_ID_HEX_LEN && is_hex(s)
}

/// True for any well-formed payment ID, short or long.
pub fn is_valid_payment_id(s: &str) -> bool {
    is_short_payment_id(s) || is_long_payment_id(s)
}

/// The single validity predicate for externally supplied payment IDs:
/// absent is fine, present must be well-formed.
pub fn is_valid_or_absent(payment_id: Option<&str>) -> bool {
    match payment_id {
        None => true,
        Some(s) => is_valid_payment_id(s),
    }
}

/// Parse a short payment ID into its 8 bytes.
pub fn parse_short(s: &str) -> Result<[u8; PAYMENT_ID_SIZE], PaymentIdError> {
    if s.len() != SHORT_PAYMENT_ID_HEX_LEN {
        return Err(PaymentIdError::InvalidLength(s.len()));
    }
    let bytes = hex::decode(s).map_err(|_| PaymentIdError::InvalidHex)?;
    let mut pid = [0u8; PAYMENT_ID_SIZE];
    pid.copy_from_slice(&bytes);
    Ok(pid)
}
