//! Atomic-unit amount parsing and formatting.
//!
//! One coin is 10^12 atomic units. User-entered amount strings are decimal
//! with at most twelve fractional digits; everything internal is u64 atomic
//! units.

use crate::constants::{COIN, DISPLAY_DECIMAL_POINT};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount string is empty")]
    Empty,

    #[error("amount is not a decimal number")]
    Malformed,

    #[error("amount has more than {DISPLAY_DECIMAL_POINT} fractional digits")]
    TooManyDecimals,

    #[error("amount exceeds the representable range")]
    Overflow,
}

/// Parse a user-entered decimal amount string into atomic units.
pub fn parse_amount(s: &str) -> Result<u64, AmountError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole_str, frac_str) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(AmountError::Malformed);
    }
    if !whole_str.bytes().all(|b| b.is_ascii_digit()) || !frac_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AmountError::Malformed);
    }
    if frac_str.len() > DISPLAY_DECIMAL_POINT as usize {
        return Err(AmountError::TooManyDecimals);
    }

    let whole: u64 = if whole_str.is_empty() {
        0
    } else {
        whole_str.parse().map_err(|_| AmountError::Overflow)?
    };

    let mut frac: u64 = 0;
    if !frac_str.is_empty() {
        frac = frac_str.parse().map_err(|_| AmountError::Overflow)?;
        for _ in frac_str.len()..DISPLAY_DECIMAL_POINT as usize {
            frac *= 10;
        }
    }

    whole
        .checked_mul(COIN)
        .and_then(|w| w.checked_add(frac))
        .ok_or(AmountError::Overflow)
}

/// Format atomic units as a zero-padded 12-decimal string.
pub fn format_amount(atomic: u64) -> String {
    format!(
        "{}.{:012}",
        atomic / COIN,
        atomic % COIN
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_coins() {
        assert_eq!(parse_amount("1"), Ok(COIN));
        assert_eq!(parse_amount("0"), Ok(0));
        assert_eq!(parse_amount("100"), Ok(100 * COIN));
        assert_eq!(parse_amount(" 2 "), Ok(2 * COIN));
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(parse_amount("0.5"), Ok(COIN / 2));
        assert_eq!(parse_amount(".5"), Ok(COIN / 2));
        assert_eq!(parse_amount("1.000000000001"), Ok(COIN + 1));
        assert_eq!(parse_amount("3."), Ok(3 * COIN));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_amount(""), Err(AmountError::Empty));
        assert_eq!(parse_amount("."), Err(AmountError::Malformed));
        assert_eq!(parse_amount("-1"), Err(AmountError::Malformed));
        assert_eq!(parse_amount("1e3"), Err(AmountError::Malformed));
        assert_eq!(parse_amount("1.2.3"), Err(AmountError::Malformed));
        assert_eq!(parse_amount("xyz"), Err(AmountError::Malformed));
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert_eq!(parse_amount("0.0000000000001"), Err(AmountError::TooManyDecimals));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert_eq!(parse_amount("18446745"), Err(AmountError::Overflow));
        assert_eq!(parse_amount("99999999999999999999"), Err(AmountError::Overflow));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_amount(0), "0.000000000000");
        assert_eq!(format_amount(COIN), "1.000000000000");
        assert_eq!(format_amount(COIN + 1), "1.000000000001");
        assert_eq!(format_amount(COIN / 2), "0.500000000000");
    }

    #[test]
    fn test_roundtrip() {
        for &v in &[0u64, 1, COIN, COIN * 7 + 3, 2_000_000_000] {
            assert_eq!(parse_amount(&format_amount(v)), Ok(v));
        }
    }
}
