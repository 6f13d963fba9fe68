//! Light-wallet-server endpoint types.
//!
//! Typed request and response structures for the three endpoints the spend
//! flow touches: `get_unspent_outs`, `get_random_outs`, and `submit_raw_tx`.
//! Responses are parsed leniently because deployed servers differ in which
//! fields they emit and whether 64-bit values arrive as numbers or strings.
//!
//! Reference: MyMonero light-wallet-server API, openmonero API.md

use crate::de;
use crate::error::LwsError;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// get_unspent_outs
// =============================================================================

/// Request body for `get_unspent_outs`.
#[derive(Debug, Clone, Serialize)]
pub struct UnspentOutsRequest {
    pub address: String,
    pub view_key: String,
    #[serde(serialize_with = "de::u64_as_string")]
    pub amount: u64,
    pub mixin: u32,
    pub use_dust: bool,
    #[serde(serialize_with = "de::u64_as_string")]
    pub dust_threshold: u64,
}

impl UnspentOutsRequest {
    /// Request every output the server knows about, dust included; the
    /// planner filters locally.
    pub fn new(address: String, view_key: String, dust_threshold: u64) -> Self {
        Self {
            address,
            view_key,
            amount: 0,
            mixin: 0,
            use_dust: true,
            dust_threshold,
        }
    }

    pub fn to_json(&self) -> Result<String, LwsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One spendable output row from `get_unspent_outs.outputs[]`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnspentOutput {
    #[serde(deserialize_with = "de::u64_from_string_or_number")]
    pub amount: u64,
    pub public_key: String,
    /// Index of this output within its transaction.
    pub index: u64,
    #[serde(deserialize_with = "de::u64_from_string_or_number")]
    pub global_index: u64,
    /// RingCT commitment blob; absent or empty on pre-RingCT outputs.
    #[serde(default, deserialize_with = "de::opt_string_nonempty")]
    pub rct: Option<String>,
    pub tx_pub_key: String,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub tx_id: u64,
    #[serde(default)]
    pub spend_key_images: Vec<String>,
    #[serde(default)]
    pub height: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Response from `get_unspent_outs`.
///
/// Fee fields vary by server generation: modern servers send `per_byte_fee`,
/// older ones only `per_kb_fee`. `fee_per_output` and `fee_mask` may be
/// absent entirely; the caller applies its own defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct UnspentOutsResponse {
    #[serde(default, deserialize_with = "de::opt_u64_from_string_or_number")]
    pub per_byte_fee: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64_from_string_or_number")]
    pub per_kb_fee: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64_from_string_or_number")]
    pub fee_per_output: Option<u64>,
    #[serde(
        default,
        alias = "quantization_mask",
        deserialize_with = "de::opt_u64_from_string_or_number"
    )]
    pub fee_mask: Option<u64>,
    #[serde(default)]
    pub fork_version: Option<u8>,
    pub outputs: Vec<UnspentOutput>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UnspentOutsResponse {
    pub fn from_json(raw: &str) -> Result<Self, LwsError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Effective fee per byte, deriving it from the legacy per-kilobyte
    /// field when that is all the server sent.
    pub fn fee_per_byte(&self) -> Result<u64, LwsError> {
        if let Some(per_byte) = self.per_byte_fee {
            return Ok(per_byte);
        }
        if let Some(per_kb) = self.per_kb_fee {
            debug!("server sent legacy per_kb_fee {per_kb}, deriving per-byte rate");
            return Ok(per_kb / 1024);
        }
        Err(LwsError::MissingField("per_byte_fee"))
    }
}

// =============================================================================
// get_random_outs
// =============================================================================

/// Request body for `get_random_outs`. Amounts are decimal strings, one per
/// decoy ring wanted ("0" for RingCT rings); `count` is the ring size.
#[derive(Debug, Clone, Serialize)]
pub struct RandomOutsRequest {
    pub amounts: Vec<String>,
    pub count: u64,
}

impl RandomOutsRequest {
    pub fn new(amounts: Vec<String>, count: u64) -> Self {
        Self { amounts, count }
    }

    pub fn to_json(&self) -> Result<String, LwsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One decoy candidate inside an amount bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomOutput {
    #[serde(deserialize_with = "de::u64_from_string_or_number")]
    pub global_index: u64,
    pub public_key: String,
    #[serde(default, deserialize_with = "de::opt_string_nonempty")]
    pub rct: Option<String>,
}

/// Decoy candidates for one requested amount.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomAmountOutputs {
    #[serde(deserialize_with = "de::u64_from_string_or_number")]
    pub amount: u64,
    #[serde(default)]
    pub outputs: Vec<RandomOutput>,
}

/// Response from `get_random_outs`.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomOutsResponse {
    pub amount_outs: Vec<RandomAmountOutputs>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl RandomOutsResponse {
    pub fn from_json(raw: &str) -> Result<Self, LwsError> {
        Ok(serde_json::from_str(raw)?)
    }
}

// =============================================================================
// submit_raw_tx
// =============================================================================

/// Request body for `submit_raw_tx`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRawTxRequest {
    pub address: String,
    pub view_key: String,
    /// Hex of the signed serialized transaction.
    pub tx: String,
}

impl SubmitRawTxRequest {
    pub fn new(address: String, view_key: String, tx: String) -> Self {
        Self { address, view_key, tx }
    }

    pub fn to_json(&self) -> Result<String, LwsError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Response from `submit_raw_tx`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRawTxResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string_nonempty")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl SubmitRawTxResponse {
    pub fn from_json(raw: &str) -> Result<Self, LwsError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Collapse the server's status/error fields into a single result.
    pub fn into_result(self) -> Result<(), LwsError> {
        if let Some(err) = self.error {
            return Err(LwsError::Server(err));
        }
        match self.status.as_deref() {
            None | Some("OK") => Ok(()),
            Some(other) => Err(LwsError::Server(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_unspent_outs_response() {
        let raw = r#"{
            "per_byte_fee": 24658,
            "fee_mask": 10000,
            "fork_version": 16,
            "outputs": [
                {
                    "amount": "3000000000",
                    "public_key": "41be1978f58cabf69a9bed5b6cb3c8d588621ef9b67602328da42a213ee42271",
                    "index": 1,
                    "global_index": "7611174",
                    "rct": "86a2c9f1f8e66848cd99bfda7a14d4ac6c3525d06947e21e4e55fe42a368507e",
                    "tx_pub_key": "bd703d7f37995cc7071fb4d2929594b5e2a4c27d2b7c68a9064500ca7bc638b8",
                    "tx_hash": "9d37c7fdeab91abfd1e7e120f5c49eac17b7ac04a97a0c93b51c172115df21ea",
                    "height": 1716622
                }
            ]
        }"#;
        let res = UnspentOutsResponse::from_json(raw).unwrap();
        assert_eq!(res.fee_per_byte().unwrap(), 24658);
        assert_eq!(res.fee_mask, Some(10000));
        assert_eq!(res.fork_version, Some(16));
        assert_eq!(res.outputs.len(), 1);
        let out = &res.outputs[0];
        assert_eq!(out.amount, 3_000_000_000);
        assert_eq!(out.index, 1);
        assert_eq!(out.global_index, 7_611_174);
        assert!(out.rct.is_some());
    }

    #[test]
    fn test_per_kb_fee_fallback_divides_by_1024() {
        let res =
            UnspentOutsResponse::from_json(r#"{"per_kb_fee": "25248768", "outputs": []}"#).unwrap();
        assert_eq!(res.fee_per_byte().unwrap(), 24657);
    }

    #[test]
    fn test_per_byte_fee_wins_over_legacy_field() {
        let res = UnspentOutsResponse::from_json(
            r#"{"per_byte_fee": 100, "per_kb_fee": 999999, "outputs": []}"#,
        )
        .unwrap();
        assert_eq!(res.fee_per_byte().unwrap(), 100);
    }

    #[test]
    fn test_missing_fee_fields_is_an_error() {
        let res = UnspentOutsResponse::from_json(r#"{"outputs": []}"#).unwrap();
        assert!(matches!(
            res.fee_per_byte(),
            Err(LwsError::MissingField("per_byte_fee"))
        ));
    }

    #[test]
    fn test_missing_outputs_is_a_parse_error() {
        assert!(UnspentOutsResponse::from_json(r#"{"per_byte_fee": 1}"#).is_err());
    }

    #[test]
    fn test_quantization_mask_alias() {
        let res = UnspentOutsResponse::from_json(
            r#"{"per_byte_fee": 1, "quantization_mask": 10000, "outputs": []}"#,
        )
        .unwrap();
        assert_eq!(res.fee_mask, Some(10000));
    }

    #[test]
    fn test_parses_random_outs_buckets() {
        let raw = r#"{
            "amount_outs": [
                {
                    "amount": "0",
                    "outputs": [
                        {
                            "global_index": "7453099",
                            "public_key": "31f3a7fec0f6f09067e826b6c2904fd4b1684d7893dcf08c5b5d22e317e148bb",
                            "rct": "ea6bcb193a25ce2787dd6abaaeef1ee0c924b323c6a5873db1406261e86145fc"
                        },
                        {
                            "global_index": 7453214,
                            "public_key": "f409ebcea98a8c5632c9959476c63fd3b03c57a8921cd2ffae0b389aa7dd5e16",
                            "rct": ""
                        }
                    ]
                }
            ]
        }"#;
        let res = RandomOutsResponse::from_json(raw).unwrap();
        assert_eq!(res.amount_outs.len(), 1);
        let bucket = &res.amount_outs[0];
        assert_eq!(bucket.amount, 0);
        assert_eq!(bucket.outputs.len(), 2);
        assert_eq!(bucket.outputs[0].global_index, 7_453_099);
        assert!(bucket.outputs[0].rct.is_some());
        assert_eq!(bucket.outputs[1].global_index, 7_453_214);
        assert_eq!(bucket.outputs[1].rct, None);
    }

    #[test]
    fn test_random_outs_request_shape() {
        let req = RandomOutsRequest::new(vec!["0".into(), "0".into()], 16);
        assert_eq!(req.to_json().unwrap(), r#"{"amounts":["0","0"],"count":16}"#);
    }

    #[test]
    fn test_unspent_outs_request_stringifies_amounts() {
        let req = UnspentOutsRequest::new("addr".into(), "vk".into(), 2_000_000_000);
        let json = req.to_json().unwrap();
        assert!(json.contains(r#""amount":"0""#));
        assert!(json.contains(r#""dust_threshold":"2000000000""#));
        assert!(json.contains(r#""use_dust":true"#));
    }

    #[test]
    fn test_submit_result_classification() {
        let ok = SubmitRawTxResponse::from_json(r#"{"status": "OK"}"#).unwrap();
        assert!(ok.into_result().is_ok());

        let err = SubmitRawTxResponse::from_json(
            r#"{"status": "error", "error": "Failed to parse hex representation of transaction"}"#,
        )
        .unwrap();
        assert!(matches!(err.into_result(), Err(LwsError::Server(_))));

        let bad_status = SubmitRawTxResponse::from_json(r#"{"status": "error"}"#).unwrap();
        assert!(bad_status.into_result().is_err());
    }
}
