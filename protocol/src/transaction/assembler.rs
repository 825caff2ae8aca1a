//! Assembling signed transactions.
//!
//! [`build_transaction_payload`] is pure: it canonicalizes the order of
//! inputs and outputs, hashes the essence and produces one unlock block per
//! input. [`send_advanced`] wraps the result in a message and submits it.
//!
//! Inputs and outputs are sorted by their serialized bytes so that any two
//! implementations arrive at the same essence, and therefore the same
//! essence hash, for the same logical transfer.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::TransactionError;
use crate::binary::{
    Address, Ed25519Signature, IndexationPayload, Input, Message, MessageId, Output, Payload,
    Signature, TransactionEssence, TransactionPayload, UnlockBlock, UtxoInput,
};
use crate::binary::serde_hex;
use crate::client::{submit_message, LedgerClient, ProofOfWorkProvider};
use crate::codec::Packable;
use crate::config::{
    ClientConfig, ED25519_ADDRESS_LENGTH, ED25519_ADDRESS_TYPE, MIN_INPUT_COUNT, MIN_OUTPUT_COUNT,
};
use crate::crypto::KeyPair;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// An output to spend and the key pair that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputWithKey {
    pub input: UtxoInput,
    pub key_pair: KeyPair,
}

/// A requested output: raw address bytes, their address type, and amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    #[serde(with = "serde_hex")]
    pub address: [u8; ED25519_ADDRESS_LENGTH],
    pub address_type: u8,
    pub amount: u64,
}

impl OutputSpec {
    pub fn new(address: Address, amount: u64) -> Self {
        let Address::Ed25519(hash) = address;
        Self {
            address: hash,
            address_type: ED25519_ADDRESS_TYPE,
            amount,
        }
    }

    fn to_output(self) -> Result<Output, TransactionError> {
        if self.address_type != ED25519_ADDRESS_TYPE {
            return Err(TransactionError::UnsupportedAddressType {
                address_type: self.address_type,
            });
        }
        Ok(Output::single(Address::Ed25519(self.address), self.amount))
    }
}

/// Key and data for an indexation payload inside the essence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexationSpec {
    pub key: String,
    #[serde(with = "serde_hex::bytes", default)]
    pub data: Vec<u8>,
}

/// What a successful send hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub message_id: MessageId,
    pub message: Message,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Builds and signs a transaction payload. No network access.
pub fn build_transaction_payload(
    inputs: &[InputWithKey],
    outputs: &[OutputSpec],
    indexation: Option<IndexationSpec>,
) -> Result<TransactionPayload, TransactionError> {
    if inputs.len() < MIN_INPUT_COUNT {
        return Err(TransactionError::NoInputs);
    }
    if outputs.len() < MIN_OUTPUT_COUNT {
        return Err(TransactionError::NoOutputs);
    }
    let mut seen = HashSet::with_capacity(inputs.len());
    if let Some(repeat) = inputs.iter().find(|i| !seen.insert(i.input.output_id())) {
        return Err(TransactionError::DuplicateInput {
            output_id: repeat.input.output_id(),
        });
    }

    let mut sorted_inputs = inputs
        .iter()
        .map(|i| Ok((Input::Utxo(i.input).to_bytes()?, i)))
        .collect::<Result<Vec<_>, TransactionError>>()?;
    sorted_inputs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut sorted_outputs = outputs
        .iter()
        .map(|o| {
            let output = o.to_output()?;
            Ok((output.to_bytes()?, output))
        })
        .collect::<Result<Vec<_>, TransactionError>>()?;
    sorted_outputs.sort_by(|a, b| a.0.cmp(&b.0));

    let payload = indexation
        .map(|spec| IndexationPayload::new(spec.key, spec.data))
        .transpose()?
        .map(Payload::from);

    let essence = TransactionEssence {
        inputs: sorted_inputs.iter().map(|(_, i)| Input::Utxo(i.input)).collect(),
        outputs: sorted_outputs.into_iter().map(|(_, o)| o).collect(),
        payload,
    };
    let essence_hash = essence.hash()?;

    let mut signed_by: HashMap<[u8; 32], u16> = HashMap::new();
    let mut unlock_blocks = Vec::with_capacity(sorted_inputs.len());
    for (index, (_, input)) in sorted_inputs.iter().enumerate() {
        let public_key = input.key_pair.public_key;
        if let Some(&reference) = signed_by.get(&public_key) {
            debug!(index, reference, "reference unlock block");
            unlock_blocks.push(UnlockBlock::Reference(reference));
            continue;
        }
        let signature = input.key_pair.sign(&essence_hash);
        unlock_blocks.push(UnlockBlock::Signature(Signature::Ed25519(Ed25519Signature {
            public_key,
            signature,
        })));
        signed_by.insert(public_key, index as u16);
        debug!(index, public_key = %hex::encode(public_key), "signature unlock block");
    }

    Ok(TransactionPayload {
        essence,
        unlock_blocks,
    })
}

/// Builds the transaction, wraps it in a message and submits it.
pub async fn send_advanced(
    client: &dyn LedgerClient,
    config: &ClientConfig,
    pow: Option<&dyn ProofOfWorkProvider>,
    inputs: &[InputWithKey],
    outputs: &[OutputSpec],
    indexation: Option<IndexationSpec>,
) -> Result<SendResult, TransactionError> {
    let transaction = build_transaction_payload(inputs, outputs, indexation)?;
    let (message_id, message) =
        submit_message(client, config, pow, Some(transaction.into())).await?;
    info!(
        message_id = %hex::encode(message_id),
        inputs = inputs.len(),
        outputs = outputs.len(),
        "transaction sent"
    );
    Ok(SendResult {
        message_id,
        message,
    })
}
