//! # Protocol Configuration & Constants
//!
//! Every wire-format number the codecs rely on lives here: field lengths,
//! count limits and type tags. If a codec hardcodes one of these inline,
//! two implementations will eventually disagree about a byte, and then
//! every signature over that byte disagrees too.
//!
//! The second half of the file is [`ClientConfig`], the small amount of
//! runtime configuration the transaction engine needs (network id, PoW
//! target, input-search limits).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::crypto::hash::blake2b_256;

// ---------------------------------------------------------------------------
// Identifier Lengths
// ---------------------------------------------------------------------------

/// Message ids are Blake2b-256 digests of the serialized message.
pub const MESSAGE_ID_LENGTH: usize = 32;

/// Transaction ids are Blake2b-256 digests of the serialized transaction
/// payload.
pub const TRANSACTION_ID_LENGTH: usize = 32;

/// Output id = transaction id ‖ u16 output index.
pub const OUTPUT_ID_LENGTH: usize = TRANSACTION_ID_LENGTH + 2;

pub const MILESTONE_ID_LENGTH: usize = 32;

/// Ed25519 addresses are the Blake2b-256 hash of the public key.
pub const ED25519_ADDRESS_LENGTH: usize = 32;

pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

pub const ED25519_SIGNATURE_LENGTH: usize = 64;

pub const MERKLE_PROOF_LENGTH: usize = 32;

/// Legacy tail transaction hashes are 49 bytes (243 trits, packed).
pub const TAIL_TRANSACTION_HASH_LENGTH: usize = 49;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Largest message the node accepts, nonce included.
pub const MAX_MESSAGE_LENGTH: usize = 32_768;

pub const MIN_PARENT_COUNT: usize = 1;
pub const MAX_PARENT_COUNT: usize = 8;

pub const MIN_INPUT_COUNT: usize = 1;
pub const MAX_INPUT_COUNT: usize = 127;

pub const MIN_OUTPUT_COUNT: usize = 1;
pub const MAX_OUTPUT_COUNT: usize = 127;

/// Migrated funds entries per receipt.
pub const MAX_FUNDS_COUNT: usize = 127;

pub const MIN_INDEXATION_KEY_LENGTH: usize = 1;
pub const MAX_INDEXATION_KEY_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Type Tags
// ---------------------------------------------------------------------------

pub const ED25519_ADDRESS_TYPE: u8 = 0;

pub const ED25519_SIGNATURE_TYPE: u8 = 0;

pub const UTXO_INPUT_TYPE: u8 = 0;
pub const TREASURY_INPUT_TYPE: u8 = 1;

pub const SIG_LOCKED_SINGLE_OUTPUT_TYPE: u8 = 0;
pub const SIG_LOCKED_DUST_ALLOWANCE_OUTPUT_TYPE: u8 = 1;
pub const TREASURY_OUTPUT_TYPE: u8 = 2;

pub const SIGNATURE_UNLOCK_BLOCK_TYPE: u8 = 0;
pub const REFERENCE_UNLOCK_BLOCK_TYPE: u8 = 1;

pub const TRANSACTION_ESSENCE_TYPE: u8 = 0;

/// Payload tags are u32 on the wire, unlike every other tag.
pub const TRANSACTION_PAYLOAD_TYPE: u32 = 0;
pub const MILESTONE_PAYLOAD_TYPE: u32 = 1;
pub const INDEXATION_PAYLOAD_TYPE: u32 = 2;
pub const RECEIPT_PAYLOAD_TYPE: u32 = 3;
pub const TREASURY_TRANSACTION_PAYLOAD_TYPE: u32 = 4;

// ---------------------------------------------------------------------------
// Client Defaults
// ---------------------------------------------------------------------------

/// How many empty addresses input selection tolerates before giving up.
pub const DEFAULT_ZERO_BALANCE_LIMIT: usize = 5;

/// Proof-of-work score new messages must reach.
pub const DEFAULT_MIN_POW_SCORE: u32 = 4000;

// ---------------------------------------------------------------------------
// Client Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings for assembling and submitting messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Written into every message; nodes reject messages for other networks.
    pub network_id: u64,

    /// Target score handed to the proof-of-work provider.
    pub min_pow_score: u32,

    /// Empty addresses to skip before input selection stops searching.
    pub zero_balance_limit: usize,

    /// When false, the nonce is left at zero for the node to fill in.
    pub local_pow: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network_id: 0,
            min_pow_score: DEFAULT_MIN_POW_SCORE,
            zero_balance_limit: DEFAULT_ZERO_BALANCE_LIMIT,
            local_pow: false,
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Network id derived from a network name: the first eight bytes of
    /// Blake2b-256(name), little-endian.
    pub fn network_id_from_name(name: &str) -> u64 {
        let digest = blake2b_256(name.as_bytes());
        let mut first = [0u8; 8];
        first.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(first)
    }

    /// Builder-style helper for the common "configure by network name"
    /// case.
    pub fn for_network(name: &str) -> Self {
        Self {
            network_id: Self::network_id_from_name(name),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
