//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use thiserror::Error;

pub use crate::config::schema::BlockchainConfig;

/// JSON-RPC error code wallets return when the user declines a request (EIP-1193).
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors that can occur while talking to the wallet or the attendance contract.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No wallet provider is available in this environment.
    #[error("Wallet not found")]
    WalletNotFound,

    /// The user declined the connection or transaction request.
    #[error("Request rejected by user: {0}")]
    UserRejected(String),

    /// An operation was invoked without a connected account.
    #[error("Wallet not connected")]
    NotConnected,

    /// A connect request is already being processed.
    #[error("Connection already in progress")]
    ConnectInProgress,

    /// A disconnect arrived while the connect request was pending.
    #[error("Connection cancelled by disconnect")]
    ConnectCancelled,

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Transaction was included but reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or signer error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A contract result could not be mapped into a typed record.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The contract has no session at this identifier.
    #[error("Session {0} does not exist")]
    SessionNotFound(u64),

    /// Caller supplied an argument the contract would reject.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Coarse failure classes. The absorbing gateway surface treats all of them alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No wallet provider detected.
    Environment,
    /// Connection or transaction refused by the user.
    Refusal,
    /// Network, node, revert, decode or missing-entity failures.
    Transport,
    /// Invoked while disconnected.
    NotConnected,
}

impl GatewayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::WalletNotFound => ErrorCategory::Environment,
            GatewayError::UserRejected(_) => ErrorCategory::Refusal,
            GatewayError::NotConnected
            | GatewayError::ConnectInProgress
            | GatewayError::ConnectCancelled => {
                ErrorCategory::NotConnected
            }
            _ => ErrorCategory::Transport,
        }
    }
}

impl From<alloy::contract::Error> for GatewayError {
    fn from(err: alloy::contract::Error) -> Self {
        if let alloy::contract::Error::TransportError(transport) = &err {
            if let Some(payload) = transport.as_error_resp() {
                if payload.code == USER_REJECTED_CODE {
                    return GatewayError::UserRejected(payload.message.to_string());
                }
            }
        }
        GatewayError::Rpc(err.to_string())
    }
}

impl From<alloy::providers::PendingTransactionError> for GatewayError {
    fn from(err: alloy::providers::PendingTransactionError) -> Self {
        GatewayError::Rpc(format!("Awaiting inclusion failed: {}", err))
    }
}

impl From<alloy::transports::TransportError> for GatewayError {
    fn from(err: alloy::transports::TransportError) -> Self {
        if let Some(payload) = err.as_error_resp() {
            if payload.code == USER_REJECTED_CODE {
                return GatewayError::UserRejected(payload.message.to_string());
            }
        }
        GatewayError::Rpc(err.to_string())
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Raw `sessions(i)` storage slot as returned by the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub name: String,
    pub created_at: U256,
    pub organizer: Address,
    pub exists: bool,
}

/// Inclusion receipt for a write operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfirmation {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}
