//! Decoy requests and ring binding.
//!
//! A construction attempt needs `mixin + 1` candidate ring members per real
//! output, bucketed by denomination. Rings committed during an earlier
//! attempt are reused verbatim so a reconstruction lands on the fee the
//! rejection reported; only outputs the carried map does not cover get
//! fresh buckets.

use crate::plan::SpendableOutput;
use crate::TxError;
use std::collections::HashMap;

/// Ring members already bound to real outputs, keyed by the real output's
/// public key. Carried across construction attempts within one submission.
pub type DecoyMap = HashMap<String, Vec<DecoyMember>>;

/// One candidate ring member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoyMember {
    pub global_index: u64,
    pub public_key: String,
    pub rct: Option<String>,
}

/// Decoy candidates fetched for one denomination.
#[derive(Debug, Clone)]
pub struct DecoyBucket {
    pub amount: u64,
    pub outputs: Vec<DecoyMember>,
}

/// What to fetch from the decoy source before an attempt can resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoyRequest {
    /// One denomination per uncovered output, as decimal strings.
    pub amounts: Vec<String>,
    /// Candidates wanted per denomination (the ring size).
    pub count: u64,
}

impl DecoyRequest {
    /// True when the carried map already covers every selected output.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Build the decoy request for `outs`, skipping outputs `prior` already
/// covers.
pub fn decoy_request_for(outs: &[SpendableOutput], prior: &DecoyMap, mixin: u32) -> DecoyRequest {
    let amounts = outs
        .iter()
        .filter(|out| !prior.contains_key(&out.public_key))
        .map(|out| out.decoy_amount().to_string())
        .collect();
    DecoyRequest { amounts, count: u64::from(mixin) + 1 }
}

/// Rings bound to the attempt's outputs, parallel to the planned selection,
/// plus the updated carry map for any later attempt.
#[derive(Debug, Clone)]
pub struct TiedRings {
    pub rings: Vec<Vec<DecoyMember>>,
    pub map: DecoyMap,
}

/// Bind each selected output to a ring.
///
/// Prior associations are reused without consuming a fetched bucket; each
/// uncovered output consumes one fresh bucket of its denomination. Any
/// mismatch between what was fetched and what the selection needs fails.
pub fn tie_outs_to_decoys(
    outs: &[SpendableOutput],
    fetched: Vec<DecoyBucket>,
    prior: &DecoyMap,
) -> Result<TiedRings, TxError> {
    let mut fresh = fetched;
    let mut map = prior.clone();
    let mut rings = Vec::with_capacity(outs.len());

    for out in outs {
        let ring = match map.get(&out.public_key) {
            Some(existing) => existing.clone(),
            None => {
                let want = out.decoy_amount();
                let pos = fresh
                    .iter()
                    .position(|bucket| bucket.amount == want)
                    .ok_or(TxError::WrongNumberOfMixOutsProvided)?;
                let bucket = fresh.swap_remove(pos);
                if bucket.outputs.is_empty() {
                    return Err(TxError::NotEnoughOutputsForMixing);
                }
                map.insert(out.public_key.clone(), bucket.outputs.clone());
                bucket.outputs
            }
        };
        rings.push(ring);
    }

    if !fresh.is_empty() {
        return Err(TxError::TooManyDecoysRemaining);
    }

    Ok(TiedRings { rings, map })
}
