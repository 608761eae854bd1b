//! Attendance contract interface and its alloy-backed binding.
//!
//! # Responsibilities
//! - Declare the fixed contract method surface
//! - Pair the contract address with a signing account
//! - Issue reads and writes, waiting for inclusion on writes

use std::future::Future;

use alloy::primitives::{Address, U256};
use alloy::providers::DynProvider;
use alloy::sol;

use crate::blockchain::transaction::{await_inclusion, ConfirmationPolicy};
use crate::blockchain::types::{GatewayResult, SessionRecord, TxConfirmation};

sol! {
    #[sol(rpc)]
    contract AttendanceRegistry {
        function createSession(string name) external returns (uint256);
        function markAttendance(uint256 sessionId) external;
        function mintBadge(address student) external;
        function nextSessionId() external view returns (uint256);
        function sessions(uint256 sessionId) external view returns (string name, uint256 createdAt, address organizer, bool exists);
        function getAttendees(uint256 sessionId) external view returns (address[]);
        function hasAttended(uint256 sessionId, address attendee) external view returns (bool);
        function timestamps(uint256 sessionId, address attendee) external view returns (uint256);
    }
}

/// A contract handle bound to one signing account.
///
/// Bindings are stateless proxies: the gateway replaces them wholesale on
/// reconnect and never mutates one in place.
pub trait ContractBinding: Send + Sync + 'static {
    /// Account that signs transactions sent through this binding.
    fn account(&self) -> Address;

    fn create_session(&self, name: &str) -> impl Future<Output = GatewayResult<TxConfirmation>> + Send;

    fn mark_attendance(&self, session_id: u64) -> impl Future<Output = GatewayResult<TxConfirmation>> + Send;

    fn mint_badge(&self, recipient: Address) -> impl Future<Output = GatewayResult<TxConfirmation>> + Send;

    /// Count of sessions ever created.
    fn next_session_id(&self) -> impl Future<Output = GatewayResult<U256>> + Send;

    fn session(&self, session_id: u64) -> impl Future<Output = GatewayResult<SessionRecord>> + Send;

    fn attendees(&self, session_id: u64) -> impl Future<Output = GatewayResult<Vec<Address>>> + Send;

    fn has_attended(&self, session_id: u64, attendee: Address) -> impl Future<Output = GatewayResult<bool>> + Send;

    /// Time attendance was recorded, zero when never marked.
    fn attendance_timestamp(&self, session_id: u64, attendee: Address) -> impl Future<Output = GatewayResult<U256>> + Send;
}

/// Binding over a JSON-RPC provider that carries the account's signer.
#[derive(Clone)]
pub struct AlloyBinding {
    contract: AttendanceRegistry::AttendanceRegistryInstance<DynProvider>,
    account: Address,
    policy: ConfirmationPolicy,
}

impl AlloyBinding {
    pub fn new(address: Address, provider: DynProvider, account: Address, policy: ConfirmationPolicy) -> Self {
        Self {
            contract: AttendanceRegistry::new(address, provider),
            account,
            policy,
        }
    }
}

impl ContractBinding for AlloyBinding {
    fn account(&self) -> Address {
        self.account
    }

    async fn create_session(&self, name: &str) -> GatewayResult<TxConfirmation> {
        let pending = self.contract.createSession(name.to_string()).send().await?;
        await_inclusion(pending, &self.policy).await
    }

    async fn mark_attendance(&self, session_id: u64) -> GatewayResult<TxConfirmation> {
        let pending = self.contract.markAttendance(U256::from(session_id)).send().await?;
        await_inclusion(pending, &self.policy).await
    }

    async fn mint_badge(&self, recipient: Address) -> GatewayResult<TxConfirmation> {
        let pending = self.contract.mintBadge(recipient).send().await?;
        await_inclusion(pending, &self.policy).await
    }

    async fn next_session_id(&self) -> GatewayResult<U256> {
        Ok(self.contract.nextSessionId().call().await?)
    }

    async fn session(&self, session_id: u64) -> GatewayResult<SessionRecord> {
        let slot = self.contract.sessions(U256::from(session_id)).call().await?;
        Ok(SessionRecord {
            name: slot.name,
            created_at: slot.createdAt,
            organizer: slot.organizer,
            exists: slot.exists,
        })
    }

    async fn attendees(&self, session_id: u64) -> GatewayResult<Vec<Address>> {
        Ok(self.contract.getAttendees(U256::from(session_id)).call().await?)
    }

    async fn has_attended(&self, session_id: u64, attendee: Address) -> GatewayResult<bool> {
        Ok(self
            .contract
            .hasAttended(U256::from(session_id), attendee)
            .call()
            .await?)
    }

    async fn attendance_timestamp(&self, session_id: u64, attendee: Address) -> GatewayResult<U256> {
        Ok(self
            .contract
            .timestamps(U256::from(session_id), attendee)
            .call()
            .await?)
    }
}

impl std::fmt::Debug for AlloyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyBinding")
            .field("contract", self.contract.address())
            .field("account", &self.account)
            .finish()
    }
}
