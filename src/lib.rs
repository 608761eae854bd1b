//! Chain session gateway for on-chain event attendance.
//!
//! Organizers create sessions, participants mark attendance and badges are
//! minted, all through one external attendance contract. This crate owns the
//! wallet connection and contract binding and exposes those calls to
//! consumers, absorbing failures into empty results plus notifications.

pub mod blockchain;
pub mod config;
pub mod gateway;
pub mod observability;
pub mod views;

pub use blockchain::{GatewayError, GatewayResult, LocalWallet, WalletProvider};
pub use config::GatewayConfig;
pub use gateway::{ConnectionState, Session, SessionGateway, SessionStatus};
