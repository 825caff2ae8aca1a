//! # Ledger Client Interfaces
//!
//! The engine talks to the network through two narrow async traits and
//! nothing else:
//!
//! - [`LedgerClient`] looks up addresses and outputs, fetches and submits
//!   messages, and hands out tips to use as parents.
//! - [`ProofOfWorkProvider`] finds a nonce for a finished message.
//!
//! Transports (HTTP, MQTT) implement these outside this crate. Errors from
//! them surface unchanged as [`ClientError`]; there is no retry or caching
//! here. [`InMemoryLedger`] is a self-contained implementation for tests and
//! offline tooling.

pub mod memory;
pub mod submit;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binary::{Address, Message, MessageId, Output, OutputId};
use crate::binary::serde_hex;
use crate::codec::CodecError;
use crate::config::TRANSACTION_ID_LENGTH;

pub use memory::InMemoryLedger;
pub use submit::{finalize_message, submit_message};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The node has no record of the requested object.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Any other transport or node-side failure, passed through verbatim.
    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("proof of work failed: {reason}")]
    PowFailed { reason: String },

    /// A message could not be encoded for submission.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBalance {
    pub address: Address,
    pub balance: u64,
    pub output_count: usize,
}

/// One output as the node reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputResponse {
    #[serde(with = "serde_hex")]
    pub transaction_id: [u8; TRANSACTION_ID_LENGTH],
    pub output_index: u16,
    pub is_spent: bool,
    pub output: Output,
}

impl OutputResponse {
    pub fn output_id(&self) -> OutputId {
        OutputId::new(self.transaction_id, self.output_index)
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn address(&self, address: &Address) -> Result<AddressBalance, ClientError>;

    /// Ids of outputs locked to `address`. Callers check `is_spent` on
    /// each one.
    async fn address_outputs(&self, address: &Address) -> Result<Vec<OutputId>, ClientError>;

    async fn output(&self, output_id: &OutputId) -> Result<OutputResponse, ClientError>;

    async fn message_submit(&self, message: &Message) -> Result<MessageId, ClientError>;

    async fn message(&self, message_id: &MessageId) -> Result<Message, ClientError>;

    /// Message ids suitable as parents for a new message.
    async fn tips(&self) -> Result<Vec<MessageId>, ClientError>;
}

#[async_trait]
pub trait ProofOfWorkProvider: Send + Sync {
    /// Returns a nonce that, written into the last eight bytes of `message`,
    /// lifts its score to at least `target_score`. `message` is the full
    /// serialization with a zero nonce.
    async fn pow(&self, message: &[u8], target_score: u32) -> Result<u64, ClientError>;
}
