//! Light-wallet-server wire model.
//!
//! Typed serde structures for the MyMonero-compatible light-wallet-server
//! endpoints the spend flow exchanges data with, plus the lenient decoding
//! rules deployed servers require. This crate models the wire format only;
//! performing the HTTP calls is left to the embedding application.
//!
//! # Example
//!
//! ```
//! use xmrlite_lws::UnspentOutsResponse;
//!
//! let res = UnspentOutsResponse::from_json(
//!     r#"{"per_byte_fee": 24658, "fee_mask": 10000, "fork_version": 16, "outputs": []}"#,
//! ).unwrap();
//! assert_eq!(res.fee_per_byte().unwrap(), 24658);
//! ```

pub mod api;
pub mod de;
pub mod error;

pub use api::{
    RandomAmountOutputs, RandomOutput, RandomOutsRequest, RandomOutsResponse, SubmitRawTxRequest,
    SubmitRawTxResponse, UnspentOutput, UnspentOutsRequest, UnspentOutsResponse,
};
pub use error::LwsError;
