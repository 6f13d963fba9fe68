//! Spend planning: output selection and the provisional fee.
//!
//! One planning pass picks the real outputs a construction attempt will
//! spend and the fee it will offer. The fee starts from a two-input
//! estimate, is re-derived as inputs accumulate, and never drops below the
//! corrected fee a prior rejected attempt reported. Every pass builds its
//! selection from scratch; nothing carries over between attempts except
//! that floor.

use crate::fee::{self, FeePriority, FeeRates};
use crate::TxError;
use log::debug;
use rand::seq::SliceRandom;
use xmrlite_types::consensus::ForkRules;
use xmrlite_types::constants::DEFAULT_DUST_THRESHOLD;

/// A spendable output owned by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendableOutput {
    /// Amount in atomic units (cleartext, even for RingCT outputs).
    pub amount: u64,
    /// One-time output public key, hex.
    pub public_key: String,
    /// Index of this output within its transaction.
    pub index: u64,
    /// Global chain index of this output.
    pub global_index: u64,
    /// RingCT commitment blob, hex; `None` on pre-RingCT outputs.
    pub rct: Option<String>,
    /// Public key of the transaction that created this output, hex.
    pub tx_pub_key: String,
}

impl SpendableOutput {
    /// Denomination decoys for this output are drawn from: 0 for RingCT
    /// outputs, the cleartext amount otherwise.
    pub fn decoy_amount(&self) -> u64 {
        if self.rct.is_some() {
            0
        } else {
            self.amount
        }
    }
}

/// Result of one planning pass.
#[derive(Debug, Clone)]
pub struct SpendPlan {
    /// Total amount the destinations receive, excluding the fee.
    pub final_total_wo_fee: u64,
    /// Fee this attempt offers.
    pub using_fee: u64,
    /// Amount returned to the sender.
    pub change_amount: u64,
    /// Decoys per ring.
    pub mixin: u32,
    /// Real outputs selected to fund the attempt.
    pub using_outs: Vec<SpendableOutput>,
}

/// Select outputs covering `sending_amounts` plus the fee.
///
/// `prior_fee` is the corrected fee a rejected construction attempt
/// reported; when present it both seeds the selection target and floors
/// the fee this plan offers. Sweeps take every usable output and send the
/// remainder after the fee.
pub fn plan_spend(
    unspent: &[SpendableOutput],
    sending_amounts: &[u64],
    is_sweeping: bool,
    priority: FeePriority,
    rates: &FeeRates,
    fork: &ForkRules,
    prior_fee: Option<u64>,
) -> Result<SpendPlan, TxError> {
    let mixin = fork.default_mixin();
    // Destinations plus the change output.
    let n_outputs = if is_sweeping { 2 } else { sending_amounts.len() + 1 };

    let mut total_wo_fee: u64 = 0;
    if !is_sweeping {
        for &amount in sending_amounts {
            total_wo_fee = total_wo_fee
                .checked_add(amount)
                .ok_or(TxError::OutputAmountOverflow)?;
        }
    }

    let mut remaining: Vec<&SpendableOutput> =
        unspent.iter().filter(|out| is_usable(out, fork)).collect();
    remaining.shuffle(&mut rand::thread_rng());

    let estimated_fee = fee::estimate_fee(rates, 2, mixin, n_outputs, 0, fork, priority);
    let bootstrap_fee = prior_fee.unwrap_or(estimated_fee);

    let mut using_outs: Vec<SpendableOutput> = Vec::new();
    let mut using_amount: u64 = 0;

    if is_sweeping {
        for out in remaining.drain(..) {
            using_amount = using_amount
                .checked_add(out.amount)
                .ok_or(TxError::InputAmountOverflow)?;
            using_outs.push(out.clone());
        }
    } else {
        let target = total_wo_fee
            .checked_add(bootstrap_fee)
            .ok_or(TxError::OutputAmountOverflow)?;
        while using_amount < target {
            let Some(out) = remaining.pop() else { break };
            using_amount = using_amount
                .checked_add(out.amount)
                .ok_or(TxError::InputAmountOverflow)?;
            using_outs.push(out.clone());
        }
    }

    // Re-derive the fee for the input count actually selected, pulling in
    // more outputs while the growing fee uncovers the target.
    let mut needed_fee =
        fee::estimate_fee(rates, using_outs.len().max(1), mixin, n_outputs, 0, fork, priority);
    if !is_sweeping {
        loop {
            let target = total_wo_fee
                .checked_add(needed_fee)
                .ok_or(TxError::OutputAmountOverflow)?;
            if using_amount >= target {
                break;
            }
            let Some(out) = remaining.pop() else {
                return Err(TxError::NeedMoreMoneyThanFound {
                    required: target,
                    found: using_amount,
                });
            };
            using_amount = using_amount
                .checked_add(out.amount)
                .ok_or(TxError::InputAmountOverflow)?;
            using_outs.push(out.clone());
            needed_fee =
                fee::estimate_fee(rates, using_outs.len(), mixin, n_outputs, 0, fork, priority);
        }
    }

    let using_fee = match prior_fee {
        Some(floor) => needed_fee.max(floor),
        None => needed_fee,
    };

    let plan = if is_sweeping {
        if using_amount <= using_fee {
            return Err(if using_outs.is_empty() {
                TxError::NeedMoreMoneyThanFound { required: using_fee, found: 0 }
            } else {
                TxError::EnteredAmountTooLow
            });
        }
        SpendPlan {
            final_total_wo_fee: using_amount - using_fee,
            using_fee,
            change_amount: 0,
            mixin,
            using_outs,
        }
    } else {
        let total_incl_fee = total_wo_fee
            .checked_add(using_fee)
            .ok_or(TxError::OutputAmountOverflow)?;
        if using_amount < total_incl_fee {
            return Err(TxError::NeedMoreMoneyThanFound {
                required: total_incl_fee,
                found: using_amount,
            });
        }
        SpendPlan {
            final_total_wo_fee: total_wo_fee,
            using_fee,
            change_amount: using_amount - total_incl_fee,
            mixin,
            using_outs,
        }
    };

    debug!(
        "planned spend: {} inputs totaling {}, sending {}, fee {}, change {}",
        plan.using_outs.len(),
        using_amount,
        plan.final_total_wo_fee,
        plan.using_fee,
        plan.change_amount
    );

    Ok(plan)
}

/// Pre-RingCT outputs below the dust threshold cannot be spent once RingCT
/// rules are active; everything else is fair game.
fn is_usable(out: &SpendableOutput, fork: &ForkRules) -> bool {
    if !fork.use_rct() {
        return true;
    }
    out.rct.is_some() || out.amount >= DEFAULT_DUST_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmrlite_types::constants::COIN;

    fn rct_out(amount: u64, seed: u64) -> SpendableOutput {
        SpendableOutput {
            amount,
            public_key: format!("{:064x}", seed),
            index: seed % 4,
            global_index: 7_000_000 + seed,
            rct: Some(format!("{:064x}", seed.wrapping_mul(31))),
            tx_pub_key: format!("{:064x}", seed.wrapping_mul(17)),
        }
    }

    fn plain_out(amount: u64, seed: u64) -> SpendableOutput {
        SpendableOutput { rct: None, ..rct_out(amount, seed) }
    }

    fn flat_rates() -> FeeRates {
        FeeRates { per_byte: 1, per_output: 0, quantization_mask: 1 }
    }

    fn v15() -> ForkRules {
        ForkRules::from_version(15)
    }

    #[test]
    fn test_plan_selects_covering_inputs() {
        let unspent = vec![rct_out(COIN, 1), rct_out(COIN, 2), rct_out(COIN, 3)];
        let plan = plan_spend(
            &unspent,
            &[COIN + COIN / 2],
            false,
            FeePriority::Low,
            &flat_rates(),
            &v15(),
            None,
        )
        .unwrap();

        let selected: u64 = plan.using_outs.iter().map(|o| o.amount).sum();
        assert_eq!(plan.final_total_wo_fee, COIN + COIN / 2);
        assert!(selected >= plan.final_total_wo_fee + plan.using_fee);
        assert_eq!(
            selected,
            plan.final_total_wo_fee + plan.using_fee + plan.change_amount
        );
        assert_eq!(plan.mixin, 15);
    }

    #[test]
    fn test_plan_mixin_tracks_fork() {
        let unspent = vec![rct_out(COIN, 1)];
        let plan = plan_spend(
            &unspent,
            &[COIN / 2],
            false,
            FeePriority::Low,
            &flat_rates(),
            &ForkRules::from_version(13),
            None,
        )
        .unwrap();
        assert_eq!(plan.mixin, 10);
    }

    #[test]
    fn test_plan_insufficient_balance() {
        let unspent = vec![rct_out(COIN, 1), rct_out(COIN, 2)];
        let err = plan_spend(
            &unspent,
            &[3 * COIN],
            false,
            FeePriority::Low,
            &flat_rates(),
            &v15(),
            None,
        )
        .unwrap_err();
        match err {
            TxError::NeedMoreMoneyThanFound { required, found } => {
                assert_eq!(found, 2 * COIN);
                assert!(required > 3 * COIN);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plan_respects_prior_fee_floor() {
        let unspent = vec![rct_out(COIN, 1), rct_out(COIN, 2), rct_out(COIN, 3)];
        let floor = 50_000_000;
        let plan = plan_spend(
            &unspent,
            &[COIN],
            false,
            FeePriority::Low,
            &flat_rates(),
            &v15(),
            Some(floor),
        )
        .unwrap();
        assert_eq!(plan.using_fee, floor);
        let selected: u64 = plan.using_outs.iter().map(|o| o.amount).sum();
        assert!(selected >= COIN + floor);
    }

    #[test]
    fn test_plan_builds_selection_fresh_each_call() {
        let unspent = vec![rct_out(COIN, 1), rct_out(COIN, 2)];
        for _ in 0..2 {
            let plan = plan_spend(
                &unspent,
                &[COIN / 4],
                false,
                FeePriority::Low,
                &flat_rates(),
                &v15(),
                None,
            )
            .unwrap();
            let mut keys: Vec<&str> =
                plan.using_outs.iter().map(|o| o.public_key.as_str()).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), plan.using_outs.len(), "no duplicate selections");
        }
    }

    #[test]
    fn test_sweep_takes_all_usable_outputs() {
        let unspent = vec![rct_out(COIN, 1), rct_out(2 * COIN, 2), rct_out(COIN / 2, 3)];
        let plan = plan_spend(
            &unspent,
            &[],
            true,
            FeePriority::Low,
            &flat_rates(),
            &v15(),
            None,
        )
        .unwrap();
        assert_eq!(plan.using_outs.len(), 3);
        assert_eq!(plan.change_amount, 0);
        assert_eq!(plan.final_total_wo_fee + plan.using_fee, 3 * COIN + COIN / 2);
    }

    #[test]
    fn test_sweep_below_fee_is_amount_too_low() {
        // One output worth less than any plausible fee.
        let unspent = vec![rct_out(10, 1)];
        let err = plan_spend(
            &unspent,
            &[],
            true,
            FeePriority::Low,
            &flat_rates(),
            &v15(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, TxError::EnteredAmountTooLow);
    }

    #[test]
    fn test_dust_excluded_under_rct_rules() {
        // A pre-RingCT output under the dust threshold is unusable at v15.
        let unspent = vec![plain_out(DEFAULT_DUST_THRESHOLD - 1, 1)];
        let err = plan_spend(
            &unspent,
            &[1_000],
            false,
            FeePriority::Low,
            &flat_rates(),
            &v15(),
            None,
        )
        .unwrap_err();
        match err {
            TxError::NeedMoreMoneyThanFound { found, .. } => assert_eq!(found, 0),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plain_output_above_dust_usable_under_rct_rules() {
        let unspent = vec![plain_out(COIN, 1)];
        let plan = plan_spend(
            &unspent,
            &[COIN / 2],
            false,
            FeePriority::Low,
            &flat_rates(),
            &v15(),
            None,
        )
        .unwrap();
        assert_eq!(plan.using_outs.len(), 1);
        assert_eq!(plan.using_outs[0].decoy_amount(), COIN);
    }

    #[test]
    fn test_amount_sum_overflow() {
        let unspent = vec![rct_out(COIN, 1)];
        let err = plan_spend(
            &unspent,
            &[u64::MAX, 2],
            false,
            FeePriority::Low,
            &flat_rates(),
            &v15(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, TxError::OutputAmountOverflow);
    }
}
