//! Independent validation of an untrusted transaction message.
//!
//! Unlike the rest of the crate this does not fail fast. Every defect found
//! is collected into a [`ValidationReport`] so a caller sees the whole
//! picture for one candidate. Only transport failures abort, since they say
//! nothing about the transaction itself.

use std::collections::HashMap;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::binary::{
    Ed25519Signature, Input, Message, OutputId, Payload, Signature, TransactionPayload, UnlockBlock,
};
use crate::client::{ClientError, LedgerClient, OutputResponse};
use crate::codec::{CodecError, Packable};
use crate::config::{MIN_INPUT_COUNT, MIN_OUTPUT_COUNT};

// ---------------------------------------------------------------------------
// Defects
// ---------------------------------------------------------------------------

/// One thing wrong with a candidate transaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Defect {
    #[error("message has no payload")]
    MissingPayload,

    #[error("payload type {payload_type} is not a transaction")]
    NotATransaction { payload_type: u32 },

    #[error("transaction essence cannot contain {member}")]
    IllegalEssenceMember { member: String },

    #[error("transaction has no inputs")]
    NoInputs,

    #[error("transaction has no outputs")]
    NoOutputs,

    #[error("transaction has no unlock blocks")]
    NoUnlockBlocks,

    #[error("input {output_id} refers to an unknown output")]
    UnknownInput { output_id: OutputId },

    #[error("input {output_id} is already spent")]
    SpentInput { output_id: OutputId },

    /// The same input appears more than once in one essence.
    #[error("input {index} repeats input {first}")]
    DuplicateInput { index: usize, first: usize },

    #[error("{unlock_blocks} unlock blocks for {inputs} inputs")]
    UnlockBlockCountMismatch { unlock_blocks: usize, inputs: usize },

    #[error("inputs are not in canonical order")]
    InputsNotSorted,

    #[error("outputs are not in canonical order")]
    OutputsNotSorted,

    #[error("inputs total {inputs} but outputs total {outputs}")]
    BalanceMismatch { inputs: u128, outputs: u128 },

    #[error("unlock block {index} references itself")]
    SelfReference { index: usize },

    #[error("unlock block {index} references {reference}, which is out of range")]
    ReferenceOutOfRange { index: usize, reference: usize },

    #[error("unlock block {index} references {reference}, which is itself a reference")]
    ReferenceToReference { index: usize, reference: usize },

    #[error("unlock block {index} repeats the signing key of block {first}")]
    DuplicateSignature { index: usize, first: usize },

    #[error("signature for input {index} does not verify")]
    InvalidSignature { index: usize },

    #[error("signer of input {index} does not own the consumed output")]
    AddressMismatch { index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub defects: Vec<Defect>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.defects.is_empty()
    }

    fn push(&mut self, defect: Defect) {
        warn!(%defect, "transaction defect");
        self.defects.push(defect);
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Re-derives the validity of `message` as a transaction.
pub async fn validate_transaction(
    client: &dyn LedgerClient,
    message: &Message,
) -> Result<ValidationReport, ClientError> {
    let mut report = ValidationReport::default();

    let transaction = match &message.payload {
        None => {
            report.push(Defect::MissingPayload);
            return Ok(report);
        }
        Some(Payload::Transaction(transaction)) => transaction,
        Some(other) => {
            report.push(Defect::NotATransaction {
                payload_type: other.payload_type(),
            });
            return Ok(report);
        }
    };
    let essence = &transaction.essence;

    if let Err(CodecError::IllegalEssenceMember { member }) = essence.to_bytes() {
        report.push(Defect::IllegalEssenceMember { member });
    }
    if essence.inputs.len() < MIN_INPUT_COUNT {
        report.push(Defect::NoInputs);
    }
    if essence.outputs.len() < MIN_OUTPUT_COUNT {
        report.push(Defect::NoOutputs);
    }
    if transaction.unlock_blocks.is_empty() {
        report.push(Defect::NoUnlockBlocks);
    }

    let duplicates = find_duplicate_inputs(&essence.inputs, &mut report);
    let consumed = resolve_inputs(client, essence.inputs.as_slice(), &mut report).await?;

    let count_matches = transaction.unlock_blocks.len() == essence.inputs.len();
    if !count_matches {
        report.push(Defect::UnlockBlockCountMismatch {
            unlock_blocks: transaction.unlock_blocks.len(),
            inputs: essence.inputs.len(),
        });
    }

    let inputs_sorted = is_canonical(&essence.inputs);
    if !inputs_sorted {
        report.push(Defect::InputsNotSorted);
    }
    let outputs_sorted = is_canonical(&essence.outputs);
    if !outputs_sorted {
        report.push(Defect::OutputsNotSorted);
    }

    // A repeated input is only worth its output once.
    let input_total: u128 = consumed
        .iter()
        .enumerate()
        .filter(|(index, _)| !duplicates[*index])
        .filter_map(|(_, c)| c.as_ref())
        .map(|c| u128::from(c.output.amount()))
        .sum();
    let output_total: u128 = essence
        .outputs
        .iter()
        .map(|o| u128::from(o.amount()))
        .sum();
    if input_total != output_total {
        report.push(Defect::BalanceMismatch {
            inputs: input_total,
            outputs: output_total,
        });
    }

    let signers = resolve_unlock_blocks(&transaction.unlock_blocks, &mut report);

    if count_matches && inputs_sorted && outputs_sorted {
        check_signatures(transaction, &signers, &consumed, &mut report);
    }

    debug!(defects = report.defects.len(), "transaction validated");
    Ok(report)
}

/// Flags every input equal to an earlier one. The returned mask is true at
/// the repeats, not at the first occurrence.
fn find_duplicate_inputs(inputs: &[Input], report: &mut ValidationReport) -> Vec<bool> {
    let mut first_seen: HashMap<&Input, usize> = HashMap::with_capacity(inputs.len());
    let mut repeats = vec![false; inputs.len()];
    for (index, input) in inputs.iter().enumerate() {
        match first_seen.get(input) {
            Some(&first) => {
                report.push(Defect::DuplicateInput { index, first });
                repeats[index] = true;
            }
            None => {
                first_seen.insert(input, index);
            }
        }
    }
    repeats
}

/// Looks up every UTXO input concurrently. Unknown and spent outputs become
/// defects; any other client failure aborts.
async fn resolve_inputs(
    client: &dyn LedgerClient,
    inputs: &[Input],
    report: &mut ValidationReport,
) -> Result<Vec<Option<OutputResponse>>, ClientError> {
    let lookups = inputs.iter().map(|input| async move {
        match input {
            Input::Utxo(utxo) => {
                let output_id = utxo.output_id();
                (Some(output_id), client.output(&output_id).await)
            }
            Input::Treasury(_) => (None, Err(ClientError::NotFound {
                what: "treasury input".to_string(),
            })),
        }
    });

    let mut resolved = Vec::with_capacity(inputs.len());
    for (output_id, result) in join_all(lookups).await {
        match (output_id, result) {
            (Some(output_id), Ok(response)) if response.is_spent => {
                report.push(Defect::SpentInput { output_id });
                resolved.push(Some(response));
            }
            (_, Ok(response)) => resolved.push(Some(response)),
            (Some(output_id), Err(ClientError::NotFound { .. })) => {
                report.push(Defect::UnknownInput { output_id });
                resolved.push(None);
            }
            (None, Err(ClientError::NotFound { .. })) => resolved.push(None),
            (_, Err(e)) => return Err(e),
        }
    }
    Ok(resolved)
}

/// True when `items` are in ascending order of their serialized bytes.
fn is_canonical<T: Packable>(items: &[T]) -> bool {
    let encoded: Result<Vec<Vec<u8>>, _> = items.iter().map(Packable::to_bytes).collect();
    match encoded {
        Ok(encoded) => encoded.windows(2).all(|pair| pair[0] <= pair[1]),
        Err(_) => false,
    }
}

/// Maps each unlock block to the signature that authorizes it, flagging
/// bad references and repeated signing keys along the way.
fn resolve_unlock_blocks<'a>(
    blocks: &'a [UnlockBlock],
    report: &mut ValidationReport,
) -> Vec<Option<&'a Ed25519Signature>> {
    let mut resolved = Vec::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        match block {
            UnlockBlock::Signature(Signature::Ed25519(signature)) => {
                let first = blocks[..index].iter().position(|earlier| {
                    matches!(earlier, UnlockBlock::Signature(s) if s.public_key() == &signature.public_key)
                });
                if let Some(first) = first {
                    report.push(Defect::DuplicateSignature { index, first });
                }
                resolved.push(Some(signature));
            }
            UnlockBlock::Reference(reference) => {
                let reference = *reference as usize;
                if reference == index {
                    report.push(Defect::SelfReference { index });
                    resolved.push(None);
                    continue;
                }
                match blocks.get(reference) {
                    None => {
                        report.push(Defect::ReferenceOutOfRange { index, reference });
                        resolved.push(None);
                    }
                    Some(UnlockBlock::Reference(_)) => {
                        report.push(Defect::ReferenceToReference { index, reference });
                        resolved.push(None);
                    }
                    Some(UnlockBlock::Signature(Signature::Ed25519(signature))) => {
                        resolved.push(Some(signature));
                    }
                }
            }
        }
    }
    resolved
}

fn check_signatures(
    transaction: &TransactionPayload,
    signers: &[Option<&Ed25519Signature>],
    consumed: &[Option<OutputResponse>],
    report: &mut ValidationReport,
) {
    let essence_hash = match transaction.essence.hash() {
        Ok(hash) => hash,
        // Already reported as an illegal essence member.
        Err(_) => return,
    };

    for (index, signer) in signers.iter().enumerate() {
        let Some(signature) = signer else { continue };
        if !signature.verify(&essence_hash) {
            report.push(Defect::InvalidSignature { index });
        }
        let owner = consumed
            .get(index)
            .and_then(|c| c.as_ref())
            .and_then(|c| c.output.address());
        if let Some(owner) = owner {
            if *owner != signature.address() {
                report.push(Defect::AddressMismatch { index });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{Address, IndexationPayload, Output, TransactionEssence, UtxoInput};
    use crate::client::InMemoryLedger;
    use crate::crypto::KeyPair;
    use crate::transaction::assembler::{build_transaction_payload, InputWithKey, OutputSpec};

    fn wrap(transaction: TransactionPayload) -> Message {
        Message {
            network_id: 0,
            parents: vec![[0; 32]],
            payload: Some(transaction.into()),
            nonce: 0,
        }
    }

    fn funded_transfer(ledger: &InMemoryLedger, amount: u64, send: u64) -> (KeyPair, Message) {
        let owner = KeyPair::from_seed(&[4; 32]);
        let funded = ledger.fund(owner.address(), amount);
        let transaction = build_transaction_payload(
            &[InputWithKey {
                input: funded.into(),
                key_pair: owner.clone(),
            }],
            &[OutputSpec::new(Address::Ed25519([6; 32]), send)],
            None,
        )
        .unwrap();
        (owner, wrap(transaction))
    }

    #[tokio::test]
    async fn assembled_transaction_is_clean() {
        let ledger = InMemoryLedger::new();
        let (_, message) = funded_transfer(&ledger, 10, 10);
        let report = validate_transaction(&ledger, &message).await.unwrap();
        assert!(report.is_valid(), "{:?}", report.defects);
    }

    #[tokio::test]
    async fn balance_mismatch_is_reported() {
        let ledger = InMemoryLedger::new();
        let (_, message) = funded_transfer(&ledger, 10, 9);
        let report = validate_transaction(&ledger, &message).await.unwrap();
        assert_eq!(
            report.defects,
            vec![Defect::BalanceMismatch {
                inputs: 10,
                outputs: 9
            }]
        );
    }

    #[tokio::test]
    async fn non_transaction_payloads() {
        let ledger = InMemoryLedger::new();
        let mut message = wrap(TransactionPayload {
            essence: TransactionEssence::default(),
            unlock_blocks: vec![],
        });
        message.payload = Some(IndexationPayload::new("a", vec![]).unwrap().into());
        let report = validate_transaction(&ledger, &message).await.unwrap();
        assert_eq!(report.defects, vec![Defect::NotATransaction { payload_type: 2 }]);

        message.payload = None;
        let report = validate_transaction(&ledger, &message).await.unwrap();
        assert_eq!(report.defects, vec![Defect::MissingPayload]);
    }

    #[tokio::test]
    async fn collects_every_defect() {
        let ledger = InMemoryLedger::new();
        let transaction = TransactionPayload {
            essence: TransactionEssence {
                inputs: vec![UtxoInput::new([2; 32], 0).into(), UtxoInput::new([1; 32], 0).into()],
                outputs: vec![Output::single(Address::Ed25519([1; 32]), 5)],
                payload: None,
            },
            unlock_blocks: vec![UnlockBlock::Reference(0), UnlockBlock::Reference(7)],
        };
        let report = validate_transaction(&ledger, &wrap(transaction)).await.unwrap();
        assert!(report.defects.contains(&Defect::UnknownInput {
            output_id: OutputId::new([2; 32], 0)
        }));
        assert!(report.defects.contains(&Defect::UnknownInput {
            output_id: OutputId::new([1; 32], 0)
        }));
        assert!(report.defects.contains(&Defect::InputsNotSorted));
        assert!(report.defects.contains(&Defect::BalanceMismatch {
            inputs: 0,
            outputs: 5
        }));
        assert!(report.defects.contains(&Defect::SelfReference { index: 0 }));
        assert!(report.defects.contains(&Defect::ReferenceOutOfRange {
            index: 1,
            reference: 7
        }));
    }

    #[tokio::test]
    async fn tampered_signature_is_reported() {
        let ledger = InMemoryLedger::new();
        let (_, mut message) = funded_transfer(&ledger, 10, 10);
        if let Some(Payload::Transaction(transaction)) = &mut message.payload {
            if let UnlockBlock::Signature(Signature::Ed25519(sig)) = &mut transaction.unlock_blocks[0] {
                sig.signature[0] ^= 1;
            }
        }
        let report = validate_transaction(&ledger, &message).await.unwrap();
        assert_eq!(report.defects, vec![Defect::InvalidSignature { index: 0 }]);
    }

    #[tokio::test]
    async fn wrong_signer_is_an_address_mismatch() {
        let ledger = InMemoryLedger::new();
        let owner = KeyPair::from_seed(&[4; 32]);
        let thief = KeyPair::from_seed(&[5; 32]);
        let funded = ledger.fund(owner.address(), 3);
        let transaction = build_transaction_payload(
            &[InputWithKey {
                input: funded.into(),
                key_pair: thief,
            }],
            &[OutputSpec::new(Address::Ed25519([6; 32]), 3)],
            None,
        )
        .unwrap();
        let report = validate_transaction(&ledger, &wrap(transaction)).await.unwrap();
        assert_eq!(report.defects, vec![Defect::AddressMismatch { index: 0 }]);
    }

    #[tokio::test]
    async fn empty_transaction_is_below_the_minimums() {
        let ledger = InMemoryLedger::new();
        let transaction = TransactionPayload {
            essence: TransactionEssence::default(),
            unlock_blocks: vec![],
        };
        let report = validate_transaction(&ledger, &wrap(transaction)).await.unwrap();
        assert_eq!(
            report.defects,
            vec![Defect::NoInputs, Defect::NoOutputs, Defect::NoUnlockBlocks]
        );
    }

    #[tokio::test]
    async fn repeated_input_is_counted_once() {
        let ledger = InMemoryLedger::new();
        let owner = KeyPair::from_seed(&[4; 32]);
        let funded = ledger.fund(owner.address(), 10);
        let essence = TransactionEssence {
            inputs: vec![UtxoInput::from(funded).into(), UtxoInput::from(funded).into()],
            outputs: vec![Output::single(Address::Ed25519([6; 32]), 20)],
            payload: None,
        };
        let signature = owner.sign(&essence.hash().unwrap());
        let transaction = TransactionPayload {
            essence,
            unlock_blocks: vec![
                UnlockBlock::Signature(Signature::Ed25519(Ed25519Signature {
                    public_key: owner.public_key,
                    signature,
                })),
                UnlockBlock::Reference(0),
            ],
        };

        let report = validate_transaction(&ledger, &wrap(transaction)).await.unwrap();
        assert_eq!(
            report.defects,
            vec![
                Defect::DuplicateInput { index: 1, first: 0 },
                Defect::BalanceMismatch {
                    inputs: 10,
                    outputs: 20
                },
            ]
        );
    }

    #[tokio::test]
    async fn totals_do_not_saturate() {
        let ledger = InMemoryLedger::new();
        let owner = KeyPair::from_seed(&[4; 32]);
        let first = ledger.fund(owner.address(), u64::MAX);
        let second = ledger.fund(owner.address(), u64::MAX);
        let mut inputs = vec![UtxoInput::from(first), UtxoInput::from(second)];
        inputs.sort_by_key(|i| Input::Utxo(*i).to_bytes().unwrap());
        let transaction = TransactionPayload {
            essence: TransactionEssence {
                inputs: inputs.into_iter().map(Input::from).collect(),
                outputs: vec![
                    Output::single(Address::Ed25519([6; 32]), u64::MAX),
                    Output::single(Address::Ed25519([7; 32]), u64::MAX - 1),
                ],
                payload: None,
            },
            unlock_blocks: vec![UnlockBlock::Reference(1), UnlockBlock::Reference(0)],
        };

        let report = validate_transaction(&ledger, &wrap(transaction)).await.unwrap();
        assert!(report.defects.contains(&Defect::BalanceMismatch {
            inputs: 2 * u128::from(u64::MAX),
            outputs: 2 * u128::from(u64::MAX) - 1,
        }));
    }

    #[test]
    fn reference_rules() {
        let sig = UnlockBlock::Signature(Signature::Ed25519(Ed25519Signature {
            public_key: [1; 32],
            signature: [0; 64],
        }));
        let blocks = vec![
            sig,
            UnlockBlock::Reference(0),
            UnlockBlock::Reference(1),
            sig,
        ];
        let mut report = ValidationReport::default();
        let resolved = resolve_unlock_blocks(&blocks, &mut report);
        assert!(resolved[0].is_some());
        assert!(resolved[1].is_some());
        assert!(resolved[2].is_none());
        assert_eq!(
            report.defects,
            vec![
                Defect::ReferenceToReference {
                    index: 2,
                    reference: 1
                },
                Defect::DuplicateSignature { index: 3, first: 0 },
            ]
        );
    }
}
