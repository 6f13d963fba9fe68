//! Light-wallet send-funds core.
//!
//! Drives one send submission end to end: destination and payment-ID
//! resolution, account-key decoding, unspent-output ingestion, the bounded
//! fee-negotiation loop against a pluggable construction primitive, and the
//! terminal success record. Network transport stays with the caller; the
//! session suspends with a typed request whenever it needs fetched data.

pub mod dest;
pub mod error;
pub mod keys;
pub mod send;

pub use dest::{resolve_destinations, ResolvedDestinations};
pub use error::SendError;
pub use keys::AccountKeys;
pub use send::{
    SendParams, SendProgress, SendSession, SendSuccess, UnspentOutputSet,
    MAX_CONSTRUCTION_ATTEMPTS,
};
