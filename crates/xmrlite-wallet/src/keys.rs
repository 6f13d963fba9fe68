//! Account key material for a submission.

use crate::error::SendError;
use xmrlite_types::constants::KEY_SIZE;

/// The three keys a light wallet holds for spending.
#[derive(Debug, Clone)]
pub struct AccountKeys {
    pub sec_view_key: [u8; KEY_SIZE],
    pub sec_spend_key: [u8; KEY_SIZE],
    pub pub_spend_key: [u8; KEY_SIZE],
}

impl AccountKeys {
    /// Decode the three keys from hex. Each key fails distinctly so a host
    /// can tell the user which credential is wrong.
    pub fn from_hex(
        sec_view_key: &str,
        sec_spend_key: &str,
        pub_spend_key: &str,
    ) -> Result<Self, SendError> {
        Ok(Self {
            sec_view_key: decode_key(sec_view_key).ok_or(SendError::InvalidViewKey)?,
            sec_spend_key: decode_key(sec_spend_key).ok_or(SendError::InvalidSpendKey)?,
            pub_spend_key: decode_key(pub_spend_key).ok_or(SendError::InvalidPublicSpendKey)?,
        })
    }
}

fn decode_key(raw: &str) -> Option<[u8; KEY_SIZE]> {
    let bytes = hex::decode(raw.trim()).ok()?;
    <[u8; KEY_SIZE]>::try_from(bytes).ok()
}
