//! # Ledger Objects
//!
//! The binary object graph exchanged with nodes, each type with a
//! bit-exact [`Packable`](crate::codec::Packable) codec and a hex-flavoured
//! serde form.
//!
//! ```text
//! Message
//! └── Payload (u32 tag, length-framed)
//!     ├── Transaction ── Essence ── Inputs / Outputs / Indexation
//!     │               └─ Unlock blocks ── Signature | Reference
//!     ├── Milestone ──── Receipt ── Treasury transaction
//!     └── Indexation
//! ```
//!
//! Unions are plain enums dispatched on their wire tag; an unknown tag is
//! [`CodecError::UnrecognizedType`](crate::codec::CodecError::UnrecognizedType).
//! Count limits are checked in both directions. Minimum counts for inputs
//! and outputs are a protocol rule rather than a layout rule and live in the
//! assembler and validator.

pub mod address;
pub mod essence;
pub mod indexation;
pub mod input;
pub mod message;
pub mod milestone;
pub mod output;
pub mod payload;
pub mod receipt;
pub mod serde_hex;
pub mod signature;
pub mod transaction;
pub mod treasury;
pub mod unlock_block;

pub use address::Address;
pub use essence::TransactionEssence;
pub use indexation::IndexationPayload;
pub use input::{Input, OutputId, TreasuryInput, UtxoInput};
pub use message::{Message, MessageId};
pub use milestone::MilestonePayload;
pub use output::{Output, SigLockedOutput, TreasuryOutput};
pub use payload::Payload;
pub use receipt::{MigratedFunds, ReceiptPayload};
pub use signature::{Ed25519Signature, Signature};
pub use transaction::TransactionPayload;
pub use treasury::TreasuryTransactionPayload;
pub use unlock_block::UnlockBlock;
