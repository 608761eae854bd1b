//! Transaction inclusion monitoring.
//!
//! # Responsibilities
//! - Wait for a broadcast transaction to be included
//! - Require the configured confirmation depth
//! - Turn a reverted receipt into an error

use std::time::Duration;

use alloy::providers::PendingTransactionBuilder;

use crate::blockchain::types::{BlockchainConfig, GatewayError, GatewayResult, TxConfirmation};

/// How long and how deep to wait for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Blocks required on top of inclusion (1 = included).
    pub required_confirmations: u64,
    /// Upper bound on the wait; `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl ConfirmationPolicy {
    pub fn from_config(config: &BlockchainConfig) -> Self {
        Self {
            required_confirmations: u64::from(config.confirmation_blocks.max(1)),
            timeout: config.confirmation_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            required_confirmations: 1,
            timeout: None,
        }
    }
}

/// Block until the transaction is included with the required depth.
pub async fn await_inclusion(
    pending: PendingTransactionBuilder<alloy::network::Ethereum>,
    policy: &ConfirmationPolicy,
) -> GatewayResult<TxConfirmation> {
    let tx_hash = *pending.tx_hash();
    tracing::debug!(tx_hash = %tx_hash, "Transaction broadcast, awaiting inclusion");

    let receipt = pending
        .with_required_confirmations(policy.required_confirmations)
        .with_timeout(policy.timeout)
        .get_receipt()
        .await?;

    if !receipt.status() {
        return Err(GatewayError::Reverted(format!("{}", tx_hash)));
    }

    tracing::debug!(
        tx_hash = %tx_hash,
        block_number = ?receipt.block_number,
        "Transaction included"
    );

    Ok(TxConfirmation {
        tx_hash,
        block_number: receipt.block_number,
    })
}
