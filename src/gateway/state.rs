//! Connection state machine.
//!
//! # States
//! ```text
//! Disconnected → Connecting: connect requested
//! Connecting → Connected: account granted and binding built
//! Connecting → Disconnected: no wallet, refusal, or bind failure
//! Connected → Disconnected: disconnect
//! ```

use alloy::primitives::Address;
use serde::Serialize;

/// Externally visible connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected { account: Address },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }

    pub fn account(&self) -> Option<Address> {
        match self {
            ConnectionState::Connected { account } => Some(*account),
            _ => None,
        }
    }
}

/// An account together with the binding that signs for it.
///
/// Replaced wholesale on every (re)connect, never mutated.
#[derive(Debug)]
pub struct Connection<B> {
    pub account: Address,
    pub binding: B,
}
