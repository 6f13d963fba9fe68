//! Core types and constants for the xmrlite Monero light-wallet stack.
//!
//! This crate provides the foundation used across all xmrlite crates:
//! CryptoNote base58, address encoding/decoding, payment IDs, atomic-unit
//! amounts, and consensus fork rules.

pub mod address;
pub mod amount;
pub mod base58;
pub mod consensus;
pub mod constants;
pub mod payment_id;

pub use address::ParsedAddress;
pub use consensus::ForkRules;
pub use constants::{AddressType, Network};
