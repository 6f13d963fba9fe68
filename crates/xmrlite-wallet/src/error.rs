//! Submission error taxonomy.

use thiserror::Error;
use xmrlite_lws::LwsError;
use xmrlite_tx::TxError;
use xmrlite_types::amount::AmountError;

/// Every way one send submission can fail, from input validation through
/// the last construction attempt.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("amount count does not match destination count")]
    CountMismatch,

    #[error("invalid amount: {0}")]
    AmountParse(#[from] AmountError),

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("invalid destination address: {0}")]
    InvalidAddress(String),

    #[error("please enter a valid payment ID")]
    InvalidPaymentId,

    #[error("only one integrated address is allowed per transfer")]
    MultipleIntegratedAddresses,

    #[error("couldn't construct integrated address")]
    IntegratedAddressConstruction,

    #[error("invalid view key")]
    InvalidViewKey,

    #[error("invalid spend key")]
    InvalidSpendKey,

    #[error("invalid public spend key")]
    InvalidPublicSpendKey,

    #[error("server response error: {0}")]
    Lws(#[from] LwsError),

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error("exceeded construction attempts ({attempts})")]
    ExceededConstructionAttempts { attempts: u32 },

    #[error("internal state error: {0}")]
    InternalState(&'static str),
}
