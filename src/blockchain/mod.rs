//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key) + config (RPC URL, contract address)
//!     → wallet.rs (account authorization, binding construction)
//!     → client.rs (signing provider, chain verification)
//!     → contract.rs (typed contract calls)
//!     → transaction.rs (await inclusion and confirmations)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data

pub mod client;
pub mod contract;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use contract::{AlloyBinding, ContractBinding};
pub use types::{ErrorCategory, GatewayError, GatewayResult, SessionRecord, TxConfirmation};
pub use wallet::{LocalWallet, WalletProvider};
