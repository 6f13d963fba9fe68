//! Construction request assembly and pre-flight validation.
//!
//! The actual signing and serialization live behind [`TransactionConstructor`]
//! so the negotiation loop can be driven against any backend. Everything a
//! backend would reject late is checked here first, with the same error
//! vocabulary a rejection would use.

use crate::decoy::DecoyMember;
use crate::fee::{estimate_tx_weight, upper_transaction_weight_limit, FeePriority, FeeRates};
use crate::plan::SpendableOutput;
use crate::TxError;
use xmrlite_types::address::parse_address;
use xmrlite_types::constants::{AddressType, Network, KEY_SIZE};
use xmrlite_types::consensus::ForkRules;
use xmrlite_types::payment_id;

/// Everything one construction attempt needs.
///
/// Amounts are balanced by the caller: the inputs must carry exactly
/// `sending_amounts + change_amount + fee`.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub from_address: String,
    pub sec_view_key: [u8; KEY_SIZE],
    pub sec_spend_key: [u8; KEY_SIZE],
    pub pub_spend_key: [u8; KEY_SIZE],
    /// Resolved recipient addresses, parallel to `sending_amounts`.
    pub destinations: Vec<String>,
    /// Standalone payment ID destined for tx_extra, if any. Absent when the
    /// ID travels inside an integrated destination.
    pub payment_id: Option<String>,
    pub sending_amounts: Vec<u64>,
    pub change_amount: u64,
    pub fee: u64,
    pub unlock_time: u64,
    pub priority: FeePriority,
    pub network: Network,
    pub fork: ForkRules,
    pub rates: FeeRates,
    pub using_outs: Vec<SpendableOutput>,
    /// One ring per entry of `using_outs`, in the same order.
    pub rings: Vec<Vec<DecoyMember>>,
}

/// A fully constructed transaction, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTransaction {
    pub signed_serialized_tx: String,
    pub tx_hash: String,
    pub tx_key: String,
    pub tx_pub_key: String,
}

/// What a construction attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Built(BuiltTransaction),
    /// The serialized transaction came out heavier than the fee paid for.
    /// The caller re-plans at the reported fee and constructs again.
    FeeTooLow { fee_actually_needed: u64 },
}

/// Backend that signs and serializes one balanced [`BuildRequest`].
pub trait TransactionConstructor {
    fn construct(&self, req: &BuildRequest) -> Result<BuildOutcome, TxError>;
}

/// Checks a request the way a backend would, before any key work happens.
pub fn validate_build_request(req: &BuildRequest) -> Result<(), TxError> {
    if req.destinations.is_empty() {
        return Err(TxError::NoDestinations);
    }

    let from = parse_address(&req.from_address).map_err(|_| TxError::CouldntDecodeToAddress)?;
    if from.network != req.network {
        return Err(TxError::CouldntDecodeToAddress);
    }

    if let Some(pid) = req.payment_id.as_deref() {
        if !payment_id::is_valid_payment_id(pid) {
            return Err(TxError::InvalidPid);
        }
    }

    for destination in &req.destinations {
        let parsed =
            parse_address(destination).map_err(|_| TxError::InvalidDestinationAddress)?;
        if parsed.network != req.network {
            return Err(TxError::InvalidDestinationAddress);
        }
        if req.payment_id.is_some() {
            match parsed.address_type {
                AddressType::Integrated => {
                    return Err(TxError::NonZeroPidWithIntegratedAddress);
                }
                AddressType::Subaddress => return Err(TxError::CantUsePidWithSubaddress),
                AddressType::Standard => {}
            }
        }
    }

    if req.rings.len() != req.using_outs.len() {
        return Err(TxError::WrongNumberOfMixOutsProvided);
    }

    let mixin = req.fork.default_mixin() as usize;
    for (out, ring) in req.using_outs.iter().zip(&req.rings) {
        if !is_hex_key(&out.public_key) {
            return Err(TxError::GivenAnInvalidPubKey);
        }
        let mut usable = 0usize;
        for member in ring {
            if !is_hex_key(&member.public_key) {
                return Err(TxError::GivenAnInvalidPubKey);
            }
            if out.rct.is_some() && member.rct.is_none() {
                return Err(TxError::MixRctOutsMissingCommit);
            }
            if member.global_index != out.global_index {
                usable += 1;
            }
        }
        if usable < mixin {
            return Err(TxError::NotEnoughUsableDecoysFound);
        }
    }

    let mut total_outgoing = req.change_amount;
    for amount in &req.sending_amounts {
        total_outgoing =
            total_outgoing.checked_add(*amount).ok_or(TxError::OutputAmountOverflow)?;
    }
    total_outgoing = total_outgoing.checked_add(req.fee).ok_or(TxError::OutputAmountOverflow)?;

    let mut total_incoming = 0u64;
    for out in &req.using_outs {
        total_incoming =
            total_incoming.checked_add(out.amount).ok_or(TxError::InputAmountOverflow)?;
    }

    if total_incoming < total_outgoing {
        return Err(TxError::NeedMoreMoneyThanFound {
            required: total_outgoing,
            found: total_incoming,
        });
    }
    if total_incoming > total_outgoing {
        // The inputs imply a different fee than the one requested.
        return Err(TxError::ResultFeeNotEqualToGiven);
    }

    let weight = estimate_tx_weight(
        req.using_outs.len(),
        req.fork.default_mixin(),
        req.destinations.len() + 1,
        0,
        &req.fork,
    );
    if weight as u64 > upper_transaction_weight_limit(&req.fork) {
        return Err(TxError::TransactionTooBig);
    }

    Ok(())
}

// ─── Internal helpers ───────────────────────────────────────────────────────

fn is_hex_key(s: &str) -> bool {
    s.len() == 2 * KEY_SIZE && hex::decode(s).is_ok()
}
