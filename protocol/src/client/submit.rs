//! Turning a payload into a submitted message: parents from the client's
//! tips, network id from config, and a nonce from the proof-of-work provider
//! when local PoW is enabled.

use tracing::{debug, info};

use super::{ClientError, LedgerClient, ProofOfWorkProvider};
use crate::binary::{Message, MessageId, Payload};
use crate::codec::Packable;
use crate::config::{ClientConfig, MAX_PARENT_COUNT};

/// Builds a complete message around `payload` without submitting it.
///
/// Tips are sorted, deduplicated and capped at the parent limit. With
/// `local_pow` off the nonce stays zero and the node is expected to do the
/// work.
pub async fn finalize_message(
    client: &dyn LedgerClient,
    config: &ClientConfig,
    pow: Option<&dyn ProofOfWorkProvider>,
    payload: Option<Payload>,
) -> Result<Message, ClientError> {
    let mut parents = client.tips().await?;
    parents.sort_unstable();
    parents.dedup();
    parents.truncate(MAX_PARENT_COUNT);

    let mut message = Message {
        network_id: config.network_id,
        parents,
        payload,
        nonce: 0,
    };

    if config.local_pow {
        let provider = pow.ok_or_else(|| ClientError::PowFailed {
            reason: "local proof of work is enabled but no provider is configured".to_string(),
        })?;
        let bytes = message.to_bytes()?;
        message.nonce = provider.pow(&bytes, config.min_pow_score).await?;
        debug!(nonce = message.nonce, score = config.min_pow_score, "proof of work done");
    }
    Ok(message)
}

/// [`finalize_message`] followed by submission. Returns the id the client
/// reports together with the message that was sent.
pub async fn submit_message(
    client: &dyn LedgerClient,
    config: &ClientConfig,
    pow: Option<&dyn ProofOfWorkProvider>,
    payload: Option<Payload>,
) -> Result<(MessageId, Message), ClientError> {
    let message = finalize_message(client, config, pow, payload).await?;
    let message_id = client.message_submit(&message).await?;
    info!(
        message_id = %hex::encode(message_id),
        parents = message.parents.len(),
        "message submitted"
    );
    Ok((message_id, message))
}
