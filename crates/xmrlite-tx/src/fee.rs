//! Fee estimation and transaction weight calculation.
//!
//! Estimates transaction size/weight from structural parameters (input
//! count, mixin, output count) for the proof shapes each fork uses, then
//! prices the weight with the network's per-byte and per-output rates,
//! rounded up to the fee quantization mask.
//!
//! Reference: monero wallet2 fee estimation

use xmrlite_types::consensus::ForkRules;

/// Serialized bytes assumed per input for pre-RingCT transactions.
const APPROXIMATE_INPUT_BYTES: usize = 80;

/// Block reward zones, keyed by the fork that raised them.
const FULL_REWARD_ZONE_V1: u64 = 20_000;
const FULL_REWARD_ZONE_V2: u64 = 60_000;
const FULL_REWARD_ZONE_V5: u64 = 300_000;

/// Space reserved for the miner transaction when deriving the weight limit.
const COINBASE_BLOB_RESERVED_SIZE: u64 = 600;

/// Fee priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePriority {
    Low,
    Normal,
    High,
    Highest,
}

impl FeePriority {
    /// Priority multiplier applied to the per-byte fee.
    pub fn multiplier(&self) -> u64 {
        match self {
            FeePriority::Low => 1,
            FeePriority::Normal => 5,
            FeePriority::High => 25,
            FeePriority::Highest => 1000,
        }
    }
}

/// Network fee parameters, normalized from the unspent-outputs response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRates {
    pub per_byte: u64,
    pub per_output: u64,
    pub quantization_mask: u64,
}

/// Estimate the serialized byte size of a transaction.
pub fn estimate_tx_size(
    n_inputs: usize,
    mixin: u32,
    n_outputs: usize,
    extra_size: usize,
    fork: &ForkRules,
) -> usize {
    if !fork.use_rct() {
        return n_inputs * (mixin as usize + 1) * APPROXIMATE_INPUT_BYTES + extra_size;
    }

    let ring_size = mixin as usize + 1;
    let bulletproof = fork.use_bulletproofs();
    let bulletproof_plus = fork.use_bulletproof_plus();

    let mut size = 0usize;

    // Prefix: version, unlock time, in/out counts.
    size += 1 + 6;

    // Inputs: type tag, amount varint, key offsets, key image.
    size += n_inputs * (1 + 6 + ring_size * 2 + 32);

    // Outputs: amount varint plus one-time key.
    size += n_outputs * (6 + 32);
    if fork.use_view_tags() {
        size += n_outputs;
    }

    size += extra_size;

    // RCT type tag.
    size += 1;

    // Range proofs.
    if bulletproof || bulletproof_plus {
        let mut log_padded_outputs = 0usize;
        while (1usize << log_padded_outputs) < n_outputs {
            log_padded_outputs += 1;
        }
        let fixed_elements = if bulletproof_plus { 6 } else { 4 + 5 };
        size += (2 * (6 + log_padded_outputs) + fixed_elements) * 32 + 3;
    } else {
        size += (2 * 64 * 32 + 32 + 64 * 32) * n_outputs;
    }

    // Ring signatures: CLSAG or MLSAG per input.
    if fork.use_clsag() {
        size += n_inputs * (32 * ring_size + 64);
    } else {
        size += n_inputs * (64 * ring_size + 32);
    }

    // Pseudo-outputs: 32 bytes per input.
    size += 32 * n_inputs;

    // ecdhInfo: compact encrypted amounts.
    size += 8 * n_outputs;

    // outPk: only the commitment is serialized.
    size += 32 * n_outputs;

    // txnFee varint.
    size += 4;

    size
}

/// Estimate the weight of a transaction (size plus bulletproof clawback).
pub fn estimate_tx_weight(
    n_inputs: usize,
    mixin: u32,
    n_outputs: usize,
    extra_size: usize,
    fork: &ForkRules,
) -> usize {
    let mut weight = estimate_tx_size(n_inputs, mixin, n_outputs, extra_size, fork);

    let bulletproof_plus = fork.use_bulletproof_plus();
    if fork.use_rct() && (fork.use_bulletproofs() || bulletproof_plus) && n_outputs > 2 {
        weight += bp_clawback(n_outputs, bulletproof_plus);
    }

    weight
}

/// Round a fee up to the next multiple of the quantization mask.
pub fn quantize_fee(fee: u64, mask: u64) -> u64 {
    let mask = mask.max(1);
    fee.saturating_add(mask - 1) / mask * mask
}

/// Price a transaction weight with the network rates and priority.
pub fn calculate_fee_from_weight(
    rates: &FeeRates,
    weight: usize,
    n_outputs: usize,
    priority: FeePriority,
) -> u64 {
    let byte_component = (weight as u64)
        .saturating_mul(rates.per_byte)
        .saturating_mul(priority.multiplier());
    let output_component = (n_outputs as u64).saturating_mul(rates.per_output);
    quantize_fee(
        byte_component.saturating_add(output_component),
        rates.quantization_mask,
    )
}

/// Estimate the fee for a transaction of the given structural shape.
pub fn estimate_fee(
    rates: &FeeRates,
    n_inputs: usize,
    mixin: u32,
    n_outputs: usize,
    extra_size: usize,
    fork: &ForkRules,
    priority: FeePriority,
) -> u64 {
    let weight = estimate_tx_weight(n_inputs, mixin, n_outputs, extra_size, fork);
    calculate_fee_from_weight(rates, weight, n_outputs, priority)
}

/// Largest transaction weight the network relays.
pub fn upper_transaction_weight_limit(fork: &ForkRules) -> u64 {
    let full_reward_zone = if fork.enabled(5) {
        FULL_REWARD_ZONE_V5
    } else if fork.enabled(2) {
        FULL_REWARD_ZONE_V2
    } else {
        FULL_REWARD_ZONE_V1
    };
    if fork.use_per_byte_fee() {
        full_reward_zone / 2 - COINBASE_BLOB_RESERVED_SIZE
    } else {
        full_reward_zone - COINBASE_BLOB_RESERVED_SIZE
    }
}

// ─── Internal helpers ────────────────────────────────────────────────────────

/// Bulletproof weight clawback for more than two outputs.
///
/// Batched proofs grow sub-linearly; the clawback charges back 4/5 of the
/// difference against naive per-output proofs so large batches do not get
/// an effective fee discount.
fn bp_clawback(n_outputs: usize, bulletproof_plus: bool) -> usize {
    let fixed_elements = if bulletproof_plus { 6 } else { 9 };
    // Notional size of a two-output proof, normalized to one output.
    let bp_base = (32 * (fixed_elements + 7 * 2)) / 2;
    let mut log_padded_outputs = 2usize;
    while (1usize << log_padded_outputs) < n_outputs {
        log_padded_outputs += 1;
    }
    let nlr = 2 * (6 + log_padded_outputs);
    let bp_size = 32 * (fixed_elements + nlr);
    (bp_base * (1usize << log_padded_outputs)).saturating_sub(bp_size) * 4 / 5
}
