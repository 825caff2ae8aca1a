//! In-memory ledger.
//!
//! Keeps outputs, messages and tips in process memory behind a single
//! `parking_lot::RwLock`. Submitting a transaction message spends its inputs
//! and records its outputs, so transfer chains can run end to end without a
//! node. Lookups are cheap and frequent; writes only happen on submission
//! and funding.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::{AddressBalance, ClientError, LedgerClient, OutputResponse};
use crate::binary::{Address, Input, Message, MessageId, Output, OutputId, Payload};
use crate::crypto::hash::blake2b_256;

#[derive(Debug, Clone)]
struct StoredOutput {
    output: Output,
    is_spent: bool,
}

#[derive(Debug, Default)]
struct LedgerState {
    outputs: HashMap<OutputId, StoredOutput>,
    by_address: BTreeMap<Address, Vec<OutputId>>,
    messages: HashMap<MessageId, Message>,
    tips: BTreeSet<MessageId>,
    funded: u64,
}

impl LedgerState {
    fn insert_output(&mut self, id: OutputId, output: Output) {
        if let Some(address) = output.address() {
            self.by_address.entry(*address).or_default().push(id);
        }
        self.outputs.insert(
            id,
            StoredOutput {
                output,
                is_spent: false,
            },
        );
    }
}

/// A [`LedgerClient`] backed by process memory.
///
/// Starts with a single all-zero tip standing in for the genesis message.
#[derive(Debug)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        let mut state = LedgerState::default();
        state.tips.insert([0u8; 32]);
        Self {
            state: RwLock::new(state),
        }
    }

    /// Creates an unspent output of `amount` locked to `address`, as if a
    /// prior transaction had paid it.
    pub fn fund(&self, address: Address, amount: u64) -> OutputId {
        let mut state = self.state.write();
        state.funded += 1;
        let mut seed = b"genesis".to_vec();
        seed.extend_from_slice(&state.funded.to_le_bytes());
        let id = OutputId::new(blake2b_256(&seed), 0);
        state.insert_output(id, Output::single(address, amount));
        debug!(output_id = %id, %address, amount, "funded address");
        id
    }

    pub fn message_count(&self) -> usize {
        self.state.read().messages.len()
    }

    pub fn is_spent(&self, output_id: &OutputId) -> Option<bool> {
        self.state.read().outputs.get(output_id).map(|o| o.is_spent)
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn address(&self, address: &Address) -> Result<AddressBalance, ClientError> {
        let state = self.state.read();
        let unspent: Vec<&StoredOutput> = state
            .by_address
            .get(address)
            .into_iter()
            .flatten()
            .filter_map(|id| state.outputs.get(id))
            .filter(|o| !o.is_spent)
            .collect();
        Ok(AddressBalance {
            address: *address,
            balance: unspent
                .iter()
                .fold(0u64, |sum, o| sum.saturating_add(o.output.amount())),
            output_count: unspent.len(),
        })
    }

    async fn address_outputs(&self, address: &Address) -> Result<Vec<OutputId>, ClientError> {
        Ok(self
            .state
            .read()
            .by_address
            .get(address)
            .cloned()
            .unwrap_or_default())
    }

    async fn output(&self, output_id: &OutputId) -> Result<OutputResponse, ClientError> {
        let state = self.state.read();
        let stored = state.outputs.get(output_id).ok_or_else(|| ClientError::NotFound {
            what: format!("output {output_id}"),
        })?;
        Ok(OutputResponse {
            transaction_id: output_id.transaction_id,
            output_index: output_id.index,
            is_spent: stored.is_spent,
            output: stored.output,
        })
    }

    async fn message_submit(&self, message: &Message) -> Result<MessageId, ClientError> {
        let id = message.id()?;
        let mut state = self.state.write();

        if let Some(Payload::Transaction(transaction)) = &message.payload {
            // Check every input before touching anything.
            let mut seen = HashSet::with_capacity(transaction.essence.inputs.len());
            for input in &transaction.essence.inputs {
                let Input::Utxo(utxo) = input else { continue };
                let output_id = utxo.output_id();
                if !seen.insert(output_id) {
                    return Err(ClientError::Transport {
                        reason: format!("input {output_id} is spent twice"),
                    });
                }
                match state.outputs.get(&output_id) {
                    None => {
                        return Err(ClientError::Transport {
                            reason: format!("input {output_id} is unknown"),
                        })
                    }
                    Some(stored) if stored.is_spent => {
                        return Err(ClientError::Transport {
                            reason: format!("input {output_id} is already spent"),
                        })
                    }
                    Some(_) => {}
                }
            }

            let transaction_id = transaction.id()?;
            for input in &transaction.essence.inputs {
                if let Input::Utxo(utxo) = input {
                    if let Some(stored) = state.outputs.get_mut(&utxo.output_id()) {
                        stored.is_spent = true;
                    }
                }
            }
            for (index, output) in transaction.essence.outputs.iter().enumerate() {
                state.insert_output(OutputId::new(transaction_id, index as u16), *output);
            }
        }

        for parent in &message.parents {
            state.tips.remove(parent);
        }
        state.tips.insert(id);
        state.messages.insert(id, message.clone());
        info!(message_id = %hex::encode(id), "message stored");
        Ok(id)
    }

    async fn message(&self, message_id: &MessageId) -> Result<Message, ClientError> {
        self.state
            .read()
            .messages
            .get(message_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                what: format!("message {}", hex::encode(message_id)),
            })
    }

    async fn tips(&self) -> Result<Vec<MessageId>, ClientError> {
        Ok(self.state.read().tips.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn funding_shows_up_in_balance() {
        let ledger = InMemoryLedger::new();
        let address = Address::Ed25519([1; 32]);
        let first = ledger.fund(address, 10);
        let second = ledger.fund(address, 15);
        assert_ne!(first, second);

        let balance = ledger.address(&address).await.unwrap();
        assert_eq!(balance.balance, 25);
        assert_eq!(balance.output_count, 2);
        assert_eq!(ledger.address_outputs(&address).await.unwrap(), vec![first, second]);

        let output = ledger.output(&first).await.unwrap();
        assert!(!output.is_spent);
        assert_eq!(output.output.amount(), 10);
        assert_eq!(output.output_id(), first);
    }

    #[tokio::test]
    async fn unknown_lookups_are_not_found() {
        let ledger = InMemoryLedger::new();
        match ledger.output(&OutputId::new([9; 32], 0)).await {
            Err(ClientError::NotFound { .. }) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
        match ledger.message(&[9; 32]).await {
            Err(ClientError::NotFound { .. }) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn repeated_input_is_refused() {
        use crate::binary::{TransactionEssence, TransactionPayload, UtxoInput};

        let ledger = InMemoryLedger::new();
        let owner = Address::Ed25519([1; 32]);
        let funded = ledger.fund(owner, 10);
        let transaction = TransactionPayload {
            essence: TransactionEssence {
                inputs: vec![UtxoInput::from(funded).into(), UtxoInput::from(funded).into()],
                outputs: vec![Output::single(Address::Ed25519([2; 32]), 20)],
                payload: None,
            },
            unlock_blocks: vec![],
        };
        let message = Message {
            network_id: 0,
            parents: vec![[0; 32]],
            payload: Some(transaction.into()),
            nonce: 0,
        };

        match ledger.message_submit(&message).await {
            Err(ClientError::Transport { reason }) => assert!(reason.contains("twice")),
            other => panic!("expected Transport, got {:?}", other),
        }
        assert_eq!(ledger.is_spent(&funded), Some(false));
        assert_eq!(ledger.message_count(), 0);
        assert_eq!(ledger.address(&owner).await.unwrap().balance, 10);
    }

    #[tokio::test]
    async fn balance_saturates_instead_of_overflowing() {
        let ledger = InMemoryLedger::new();
        let address = Address::Ed25519([1; 32]);
        ledger.fund(address, u64::MAX);
        ledger.fund(address, 1);
        assert_eq!(ledger.address(&address).await.unwrap().balance, u64::MAX);
    }

    #[tokio::test]
    async fn submission_replaces_referenced_tips() {
        let ledger = InMemoryLedger::new();
        let tips = ledger.tips().await.unwrap();
        assert_eq!(tips, vec![[0u8; 32]]);

        let message = Message {
            network_id: 0,
            parents: tips,
            payload: None,
            nonce: 0,
        };
        let id = ledger.message_submit(&message).await.unwrap();
        assert_eq!(ledger.tips().await.unwrap(), vec![id]);
        assert_eq!(ledger.message(&id).await.unwrap(), message);
        assert_eq!(ledger.message_count(), 1);
    }
}
