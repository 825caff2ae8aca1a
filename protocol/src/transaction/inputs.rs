//! Input selection: find enough unspent outputs to fund a transfer.

use tracing::{debug, warn};

use super::assembler::{send_advanced, InputWithKey, OutputSpec, SendResult};
use super::error::TransactionError;
use crate::binary::UtxoInput;
use crate::client::{LedgerClient, ProofOfWorkProvider};
use crate::config::ClientConfig;
use crate::crypto::KeyPair;

/// Inputs chosen to fund a set of outputs, and the outputs to create
/// (the requested ones plus any remainder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSelection {
    pub inputs: Vec<InputWithKey>,
    pub outputs: Vec<OutputSpec>,
}

/// Walks `key_pairs` in order and collects unspent outputs of their
/// addresses until the outputs are covered.
///
/// Addresses are queried one at a time and the walk stops as soon as enough
/// has been collected. Addresses without outputs and zero-amount outputs
/// both count towards `config.zero_balance_limit`; reaching it ends the
/// search. Any excess over the requested total goes back to the address of
/// the last output consumed.
pub async fn calculate_inputs(
    client: &dyn LedgerClient,
    config: &ClientConfig,
    key_pairs: &[KeyPair],
    outputs: &[OutputSpec],
) -> Result<InputSelection, TransactionError> {
    let required = outputs
        .iter()
        .fold(0u64, |sum, o| sum.saturating_add(o.amount));

    let mut consumed = 0u64;
    let mut zero_balance = 0usize;
    let mut inputs = Vec::new();
    let mut all_outputs = outputs.to_vec();

    'addresses: for key_pair in key_pairs {
        let address = key_pair.address();
        let output_ids = client.address_outputs(&address).await?;

        if output_ids.is_empty() {
            zero_balance += 1;
            debug!(%address, zero_balance, "address has no outputs");
            if zero_balance >= config.zero_balance_limit {
                break;
            }
            continue;
        }

        for output_id in output_ids {
            let response = client.output(&output_id).await?;
            if response.is_spent {
                continue;
            }

            let amount = response.output.amount();
            if amount == 0 {
                zero_balance += 1;
                if zero_balance >= config.zero_balance_limit {
                    break 'addresses;
                }
                continue;
            }

            consumed = consumed.saturating_add(amount);
            inputs.push(InputWithKey {
                input: UtxoInput::new(response.transaction_id, response.output_index),
                key_pair: key_pair.clone(),
            });
            debug!(output_id = %output_id, amount, consumed, required, "input selected");

            if consumed >= required {
                if consumed > required {
                    if let Some(remainder_address) = response.output.address() {
                        all_outputs.push(OutputSpec::new(*remainder_address, consumed - required));
                    }
                }
                break 'addresses;
            }
        }
    }

    if consumed < required {
        warn!(required, available = consumed, "not enough funds");
        return Err(TransactionError::InsufficientBalance {
            required,
            available: consumed,
        });
    }

    Ok(InputSelection {
        inputs,
        outputs: all_outputs,
    })
}

/// Selects inputs from `key_pairs` and sends `outputs`.
pub async fn send(
    client: &dyn LedgerClient,
    config: &ClientConfig,
    pow: Option<&dyn ProofOfWorkProvider>,
    key_pairs: &[KeyPair],
    outputs: &[OutputSpec],
) -> Result<SendResult, TransactionError> {
    let selection = calculate_inputs(client, config, key_pairs, outputs).await?;
    send_advanced(client, config, pow, &selection.inputs, &selection.outputs, None).await
}
