//! # Transactions
//!
//! Building, sending and checking value transfers over the UTXO ledger.
//!
//! ```text
//! assembler.rs   sort, hash the essence, sign, produce unlock blocks, send
//! inputs.rs      pick unspent outputs to fund a transfer
//! validator.rs   re-derive validity of an untrusted transaction message
//! error.rs       TransactionError
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Select** inputs with [`calculate_inputs`] (or bring your own).
//! 2. **Assemble** with [`build_transaction_payload`]: canonical order,
//!    essence hash, one unlock block per input.
//! 3. **Send** with [`send_advanced`], which finalizes a message around the
//!    payload and submits it.
//! 4. **Validate** with [`validate_transaction`]. Anything the assembler
//!    produces from consistent inputs validates with zero defects.
//!
//! Each key signs at most once per transaction; later inputs owned by the
//! same key get a reference block pointing at the first signature.

pub mod assembler;
pub mod error;
pub mod inputs;
pub mod validator;

pub use assembler::{
    build_transaction_payload, send_advanced, IndexationSpec, InputWithKey, OutputSpec, SendResult,
};
pub use error::TransactionError;
pub use inputs::{calculate_inputs, send, InputSelection};
pub use validator::{validate_transaction, Defect, ValidationReport};
