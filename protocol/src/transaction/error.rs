//! Errors raised while assembling and sending a transaction.

use thiserror::Error;

use crate::binary::OutputId;
use crate::client::ClientError;
use crate::codec::CodecError;
use crate::crypto::CryptoError;

/// Protocol violations caught before anything reaches the network, plus
/// the lower-layer errors that can interrupt a send.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("a transaction needs at least one input")]
    NoInputs,

    #[error("a transaction needs at least one output")]
    NoOutputs,

    /// The same output was listed as an input twice.
    #[error("output {output_id} is spent twice in one transaction")]
    DuplicateInput { output_id: OutputId },

    /// The selected inputs do not cover the requested outputs.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    /// Only Ed25519 addresses can receive outputs.
    #[error("unsupported address type {address_type}")]
    UnsupportedAddressType { address_type: u8 },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Client(#[from] ClientError),
}
