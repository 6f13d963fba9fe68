//! The send-funds submission state machine.
//!
//! A submission is a negotiation. The wallet plans a spend against an
//! estimated fee, fetches decoys for the selected inputs, and asks the
//! construction primitive to build. When the serialized transaction comes
//! out heavier than the estimate paid for, the primitive reports the fee it
//! actually needs and the session re-plans at that floor and builds again,
//! up to a bounded number of attempts. The session owns that loop and
//! suspends whenever it needs data only the caller's transport can fetch.

use crate::dest::{resolve_destinations, ResolvedDestinations};
use crate::error::SendError;
use crate::keys::AccountKeys;
use log::{debug, info, warn};
use serde::Serialize;
use xmrlite_lws::{RandomOutsResponse, UnspentOutsResponse};
use xmrlite_tx::{
    decoy_request_for, plan_spend, tie_outs_to_decoys, validate_build_request, BuildOutcome,
    BuildRequest, BuiltTransaction, DecoyBucket, DecoyMap, DecoyMember, DecoyRequest, FeePriority,
    FeeRates, SpendPlan, SpendableOutput, TransactionConstructor,
};
use xmrlite_types::consensus::{ForkRules, DEFAULT_FEE_QUANTIZATION_MASK};
use xmrlite_types::constants::Network;

/// Construction attempts one submission may spend before giving up.
pub const MAX_CONSTRUCTION_ATTEMPTS: u32 = 16;

/// Everything a host supplies to open a submission.
#[derive(Debug, Clone)]
pub struct SendParams {
    pub from_address: String,
    pub sec_view_key: String,
    pub sec_spend_key: String,
    pub pub_spend_key: String,
    /// Recipient addresses, parallel to `amounts`.
    pub destinations: Vec<String>,
    /// Amounts as decimal coin strings ("0.35"); ignored when sweeping.
    pub amounts: Vec<String>,
    pub is_sweeping: bool,
    pub priority: FeePriority,
    pub payment_id: Option<String>,
    pub network: Network,
}

/// Spendable outputs and network fee parameters, normalized once per
/// ingestion and read-only afterwards.
#[derive(Debug, Clone)]
pub struct UnspentOutputSet {
    pub outputs: Vec<SpendableOutput>,
    pub rates: FeeRates,
    pub fork: ForkRules,
}

/// Negotiation bookkeeping carried between construction attempts.
#[derive(Debug, Clone)]
struct AttemptState {
    /// Construction attempts performed so far.
    attempts: u32,
    /// Fee floor reported by the last rejected attempt.
    prior_fee: Option<u64>,
    /// Rings already committed to real outputs.
    decoy_map: DecoyMap,
}

impl AttemptState {
    fn fresh() -> Self {
        Self { attempts: 0, prior_fee: None, decoy_map: DecoyMap::new() }
    }
}

/// A planning pass waiting on its decoy fetch.
#[derive(Debug, Clone)]
struct PendingDecoys {
    keys: AccountKeys,
    outputs: UnspentOutputSet,
    state: AttemptState,
    plan: SpendPlan,
}

/// Where the session stands. Transitions replace the whole value, so fields
/// from an abandoned planning pass cannot leak into the next one.
#[derive(Debug, Clone)]
enum Phase {
    AwaitingOutputs,
    AwaitingDecoys(Box<PendingDecoys>),
    Succeeded,
    Failed,
}

/// What a resumption produced: either another decoy fetch or the finished
/// transaction.
#[derive(Debug, Clone)]
pub enum SendProgress {
    NeedDecoys(DecoyRequest),
    Complete(SendSuccess),
}

/// Terminal success payload, serialized in the JSON shape hosts consume.
/// Amounts stringify because JavaScript callers cannot hold a full u64.
#[derive(Debug, Clone, Serialize)]
pub struct SendSuccess {
    #[serde(serialize_with = "xmrlite_lws::de::u64_as_string")]
    pub used_fee: u64,
    #[serde(serialize_with = "xmrlite_lws::de::u64_as_string")]
    pub total_sent: u64,
    #[serde(serialize_with = "xmrlite_lws::de::u64_as_string")]
    pub final_total_wo_fee: u64,
    pub mixin: u32,
    pub serialized_signed_tx: String,
    pub tx_hash: String,
    pub tx_key: String,
    pub tx_pub_key: String,
    pub target_address: String,
    #[serde(rename = "isXMRAddressIntegrated")]
    pub is_integrated: bool,
    #[serde(
        rename = "integratedAddressPIDForDisplay",
        skip_serializing_if = "Option::is_none"
    )]
    pub integrated_address_pid: Option<String>,
}

/// One send submission from validation to a signed transaction.
pub struct SendSession {
    params: SendParams,
    resolved: ResolvedDestinations,
    max_attempts: u32,
    phase: Phase,
}

impl SendSession {
    /// Validate the submission and resolve its destinations. No network
    /// data is needed yet; bad input fails here.
    pub fn new(params: SendParams) -> Result<Self, SendError> {
        let resolved = resolve_destinations(
            &params.destinations,
            &params.amounts,
            params.is_sweeping,
            params.payment_id.as_deref(),
            params.network,
        )?;
        Ok(Self { params, resolved, max_attempts: MAX_CONSTRUCTION_ATTEMPTS, phase: Phase::AwaitingOutputs })
    }

    /// Override the construction attempt bound for this session.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Feed the wallet's unspent outputs and start a fresh negotiation,
    /// discarding any negotiation already in flight. Returns the decoy
    /// request the caller must satisfy before the first attempt can build.
    pub fn ingest_unspent_outs(
        &mut self,
        response: UnspentOutsResponse,
    ) -> Result<DecoyRequest, SendError> {
        if matches!(self.phase, Phase::Succeeded | Phase::Failed) {
            return Err(SendError::InternalState("session already finished"));
        }
        self.phase = Phase::Failed;

        let keys = AccountKeys::from_hex(
            &self.params.sec_view_key,
            &self.params.sec_spend_key,
            &self.params.pub_spend_key,
        )?;
        let outputs = normalize_response(&response)?;
        let state = AttemptState::fresh();

        let plan = plan_spend(
            &outputs.outputs,
            &self.resolved.amounts,
            self.params.is_sweeping,
            self.params.priority,
            &outputs.rates,
            &outputs.fork,
            state.prior_fee,
        )?;
        debug!(
            "initial plan: {} inputs, fee {}, change {}",
            plan.using_outs.len(),
            plan.using_fee,
            plan.change_amount
        );

        let request = decoy_request_for(&plan.using_outs, &state.decoy_map, plan.mixin);
        self.phase = Phase::AwaitingDecoys(Box::new(PendingDecoys { keys, outputs, state, plan }));
        Ok(request)
    }

    /// Resume with the decoys the last request asked for and drive
    /// construction. Attempts whose decoys are already covered by rings
    /// committed earlier run back-to-back without yielding.
    pub fn resume_with_decoys(
        &mut self,
        response: RandomOutsResponse,
        constructor: &impl TransactionConstructor,
    ) -> Result<SendProgress, SendError> {
        let pending = match std::mem::replace(&mut self.phase, Phase::Failed) {
            Phase::AwaitingDecoys(pending) => pending,
            other => {
                self.phase = other;
                return Err(SendError::InternalState(
                    "resume_with_decoys requires a pending decoy request",
                ));
            }
        };
        let PendingDecoys { keys, outputs, mut state, mut plan } = *pending;
        let mut fetched = buckets_from(response);

        loop {
            let tied = tie_outs_to_decoys(&plan.using_outs, fetched, &state.decoy_map)?;
            state.decoy_map = tied.map;

            let request =
                build_request(&self.params, &self.resolved, &keys, &outputs, &plan, tied.rings);
            validate_build_request(&request)?;
            let outcome = constructor.construct(&request)?;
            state.attempts += 1;

            match outcome {
                BuildOutcome::Built(built) => {
                    info!(
                        "transaction constructed after {} attempt(s), fee {}",
                        state.attempts, plan.using_fee
                    );
                    let success = compose_success(&self.resolved, &plan, built);
                    self.phase = Phase::Succeeded;
                    return Ok(SendProgress::Complete(success));
                }
                BuildOutcome::FeeTooLow { fee_actually_needed } => {
                    if state.attempts >= self.max_attempts {
                        warn!("giving up after {} construction attempts", state.attempts);
                        return Err(SendError::ExceededConstructionAttempts {
                            attempts: state.attempts,
                        });
                    }
                    debug!(
                        "attempt {} fee {} too low, re-planning at {}",
                        state.attempts, plan.using_fee, fee_actually_needed
                    );
                    state.prior_fee = Some(fee_actually_needed);
                    plan = plan_spend(
                        &outputs.outputs,
                        &self.resolved.amounts,
                        self.params.is_sweeping,
                        self.params.priority,
                        &outputs.rates,
                        &outputs.fork,
                        state.prior_fee,
                    )?;

                    let request =
                        decoy_request_for(&plan.using_outs, &state.decoy_map, plan.mixin);
                    if request.is_empty() {
                        // Committed rings already cover the new selection.
                        fetched = Vec::new();
                        continue;
                    }
                    self.phase = Phase::AwaitingDecoys(Box::new(PendingDecoys {
                        keys,
                        outputs,
                        state,
                        plan,
                    }));
                    return Ok(SendProgress::NeedDecoys(request));
                }
            }
        }
    }
}

// =============================================================================
// Normalization and assembly helpers
// =============================================================================

fn normalize_response(response: &UnspentOutsResponse) -> Result<UnspentOutputSet, SendError> {
    let rates = FeeRates {
        per_byte: response.fee_per_byte()?,
        per_output: response.fee_per_output.unwrap_or(0),
        quantization_mask: response.fee_mask.unwrap_or(DEFAULT_FEE_QUANTIZATION_MASK),
    };
    let fork = ForkRules::from_version(response.fork_version.unwrap_or(0));
    let outputs = response
        .outputs
        .iter()
        .map(|row| SpendableOutput {
            amount: row.amount,
            public_key: row.public_key.clone(),
            index: row.index,
            global_index: row.global_index,
            rct: row.rct.clone(),
            tx_pub_key: row.tx_pub_key.clone(),
        })
        .collect();
    Ok(UnspentOutputSet { outputs, rates, fork })
}

fn buckets_from(response: RandomOutsResponse) -> Vec<DecoyBucket> {
    response
        .amount_outs
        .into_iter()
        .map(|bucket| DecoyBucket {
            amount: bucket.amount,
            outputs: bucket
                .outputs
                .into_iter()
                .map(|member| DecoyMember {
                    global_index: member.global_index,
                    public_key: member.public_key,
                    rct: member.rct,
                })
                .collect(),
        })
        .collect()
}

fn build_request(
    params: &SendParams,
    resolved: &ResolvedDestinations,
    keys: &AccountKeys,
    outputs: &UnspentOutputSet,
    plan: &SpendPlan,
    rings: Vec<Vec<DecoyMember>>,
) -> BuildRequest {
    let sending_amounts = if params.is_sweeping {
        vec![plan.final_total_wo_fee]
    } else {
        resolved.amounts.clone()
    };
    BuildRequest {
        from_address: params.from_address.clone(),
        sec_view_key: keys.sec_view_key,
        sec_spend_key: keys.sec_spend_key,
        pub_spend_key: keys.pub_spend_key,
        destinations: resolved.addresses.clone(),
        payment_id: resolved.payment_id.clone(),
        sending_amounts,
        change_amount: plan.change_amount,
        fee: plan.using_fee,
        unlock_time: 0,
        priority: params.priority,
        network: params.network,
        fork: outputs.fork,
        rates: outputs.rates,
        using_outs: plan.using_outs.clone(),
        rings,
    }
}

fn compose_success(
    resolved: &ResolvedDestinations,
    plan: &SpendPlan,
    built: BuiltTransaction,
) -> SendSuccess {
    let target_address = if resolved.addresses.len() == 1 {
        resolved.addresses[0].clone()
    } else {
        format!("[{}]", resolved.addresses.join(", "))
    };
    SendSuccess {
        used_fee: plan.using_fee,
        total_sent: plan.final_total_wo_fee + plan.using_fee,
        final_total_wo_fee: plan.final_total_wo_fee,
        mixin: plan.mixin,
        serialized_signed_tx: built.signed_serialized_tx,
        tx_hash: built.tx_hash,
        tx_key: built.tx_key,
        tx_pub_key: built.tx_pub_key,
        target_address,
        is_integrated: resolved.is_integrated,
        integrated_address_pid: resolved.display_payment_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(raw: serde_json::Value) -> UnspentOutsResponse {
        UnspentOutsResponse::from_json(&raw.to_string()).unwrap()
    }

    #[test]
    fn test_normalize_applies_defaults() {
        let set = normalize_response(&response(serde_json::json!({
            "per_byte_fee": 8000,
            "outputs": [],
        })))
        .unwrap();
        assert_eq!(set.rates.per_byte, 8000);
        assert_eq!(set.rates.per_output, 0);
        assert_eq!(set.rates.quantization_mask, DEFAULT_FEE_QUANTIZATION_MASK);
        assert_eq!(set.fork.version(), 0);
    }

    #[test]
    fn test_normalize_requires_fee_information() {
        let err = normalize_response(&response(serde_json::json!({ "outputs": [] }))).unwrap_err();
        assert!(matches!(err, SendError::Lws(_)));
    }

    #[test]
    fn test_normalize_carries_output_fields() {
        let set = normalize_response(&response(serde_json::json!({
            "per_byte_fee": 8000,
            "fee_mask": 10000,
            "fork_version": 15,
            "outputs": [{
                "amount": "3000000000000",
                "public_key": "aa".repeat(32),
                "index": 1,
                "global_index": "5100200",
                "rct": "bb".repeat(32),
                "tx_pub_key": "cc".repeat(32),
            }],
        })))
        .unwrap();
        assert_eq!(set.fork.version(), 15);
        assert_eq!(set.outputs.len(), 1);
        assert_eq!(set.outputs[0].amount, 3_000_000_000_000);
        assert_eq!(set.outputs[0].global_index, 5_100_200);
        assert!(set.outputs[0].rct.is_some());
    }

    fn sample_success(addresses: Vec<String>) -> SendSuccess {
        let resolved = ResolvedDestinations {
            addresses,
            amounts: vec![10],
            is_integrated: false,
            display_payment_id: None,
            payment_id: None,
        };
        let plan = SpendPlan {
            final_total_wo_fee: 10,
            using_fee: 3,
            change_amount: 0,
            mixin: 15,
            using_outs: vec![],
        };
        let built = BuiltTransaction {
            signed_serialized_tx: "02deadbeef".into(),
            tx_hash: "11".repeat(32),
            tx_key: "22".repeat(32),
            tx_pub_key: "33".repeat(32),
        };
        compose_success(&resolved, &plan, built)
    }

    #[test]
    fn test_success_sums_fee_into_total() {
        let success = sample_success(vec!["A".into()]);
        assert_eq!(success.total_sent, 13);
        assert_eq!(success.target_address, "A");
    }

    #[test]
    fn test_multiple_targets_bracketed() {
        let success = sample_success(vec!["A".into(), "B".into()]);
        assert_eq!(success.target_address, "[A, B]");
    }

    #[test]
    fn test_success_serializes_amounts_as_strings() {
        let value = serde_json::to_value(sample_success(vec!["A".into()])).unwrap();
        assert_eq!(value["used_fee"], "3");
        assert_eq!(value["total_sent"], "13");
        assert_eq!(value["final_total_wo_fee"], "10");
        assert_eq!(value["mixin"], 15);
        assert_eq!(value["isXMRAddressIntegrated"], false);
        assert!(value.get("integratedAddressPIDForDisplay").is_none());
    }

    #[test]
    fn test_success_serializes_display_pid_when_present() {
        let mut success = sample_success(vec!["A".into()]);
        success.is_integrated = true;
        success.integrated_address_pid = Some("0123456789abcdef".into());
        let value = serde_json::to_value(&success).unwrap();
        assert_eq!(value["isXMRAddressIntegrated"], true);
        assert_eq!(value["integratedAddressPIDForDisplay"], "0123456789abcdef");
    }
}
