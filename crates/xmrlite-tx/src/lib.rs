//! Transaction planning and fee negotiation primitives.
//!
//! Provides output selection against a provisional fee, decoy request and
//! binding logic for ring construction, fee estimation from structural
//! parameters, and the seam to the cryptographic construction primitive.
//! The signing and RingCT math itself lives behind the
//! [`TransactionConstructor`] trait.

pub mod construct;
pub mod decoy;
pub mod fee;
pub mod plan;

pub use construct::{
    validate_build_request, BuildOutcome, BuildRequest, BuiltTransaction, TransactionConstructor,
};
pub use decoy::{
    decoy_request_for, tie_outs_to_decoys, DecoyBucket, DecoyMap, DecoyMember, DecoyRequest,
    TiedRings,
};
pub use fee::{FeePriority, FeeRates};
pub use plan::{plan_spend, SpendPlan, SpendableOutput};

use thiserror::Error;

/// Stable failure codes of the construction pipeline.
///
/// Each variant carries the human-readable message hosts display verbatim,
/// so adding a code without a message does not compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    #[error("Couldn't decode address")]
    CouldntDecodeToAddress,

    #[error("No destinations provided")]
    NoDestinations,

    #[error("Wrong number of mix outputs provided")]
    WrongNumberOfMixOutsProvided,

    #[error("Not enough outputs for mixing")]
    NotEnoughOutputsForMixing,

    #[error("Invalid secret keys")]
    InvalidSecretKeys,

    #[error("Output amount overflow")]
    OutputAmountOverflow,

    #[error("Input amount overflow")]
    InputAmountOverflow,

    #[error("Mix RCT outs missing commit")]
    MixRctOutsMissingCommit,

    #[error("Result fee not equal to given fee")]
    ResultFeeNotEqualToGiven,

    #[error("Spendable balance too low (need {required}, found {found})")]
    NeedMoreMoneyThanFound { required: u64, found: u64 },

    #[error("Invalid destination address")]
    InvalidDestinationAddress,

    #[error("Payment ID must be blank when using an integrated address")]
    NonZeroPidWithIntegratedAddress,

    #[error("Payment ID must be blank when using a subaddress")]
    CantUsePidWithSubaddress,

    #[error("Couldn't add nonce to tx extra")]
    CouldntAddPidNonceToTxExtra,

    #[error("Invalid pub key")]
    GivenAnInvalidPubKey,

    #[error("Invalid commit or mask on output rct")]
    InvalidCommitOrMaskOnOutputRct,

    #[error("Transaction not constructed")]
    TransactionNotConstructed,

    #[error("Transaction too big")]
    TransactionTooBig,

    #[error("Not yet implemented")]
    NotYetImplemented,

    #[error("Invalid payment ID")]
    InvalidPid,

    #[error("The amount you've entered is too low")]
    EnteredAmountTooLow,

    #[error("Not enough usable decoys found")]
    NotEnoughUsableDecoysFound,

    #[error("Too many unused decoys remaining")]
    TooManyDecoysRemaining,

    #[error("Can't get decrypted mask from 'rct' hex")]
    CantGetDecryptedMaskFromRctHex,
}
