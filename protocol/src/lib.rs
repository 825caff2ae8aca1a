// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tangle Protocol: Client Engine
//!
//! Everything a client needs to put value on the tangle without trusting
//! anyone else's code for the parts that matter: the bytes, the keys and the
//! signatures.
//!
//! ## Architecture
//!
//! Modules, leaf first:
//!
//! - **crypto**: Edwards-curve arithmetic, Ed25519 (strict and ZIP-215
//!   verification), Blake2b-256.
//! - **codec**: Cursor-based byte streams and the `Packable` contract.
//! - **binary**: Messages, payloads, transactions and their wire layouts.
//! - **client**: The async seams to the network: `LedgerClient` and
//!   `ProofOfWorkProvider`, plus an in-memory ledger.
//! - **transaction**: Input selection, assembly, signing, validation.
//! - **config**: Wire constants and client settings.
//! - **logging**: Optional `tracing` subscriber setup.
//!
//! ## Ground rules
//!
//! 1. Bit-exact wire format. Signatures cover these exact bytes, so two
//!    implementations must agree on every one of them.
//! 2. Codecs and crypto are synchronous and pure. Only the client traits
//!    are async.
//! 3. Fail fast everywhere except the validator, which reports every defect
//!    it finds.
//! 4. A bad signature is `false`, not an error.

pub mod binary;
pub mod client;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod logging;
pub mod transaction;
