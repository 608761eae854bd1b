//! Shared utilities for gateway integration tests.
//!
//! `SimulatedChain` mimics the attendance contract in memory, and
//! `SimulatedWallet` plays the wallet extension in front of it.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use tokio::sync::Notify;

use attendance_gateway::blockchain::{ContractBinding, GatewayError, GatewayResult, SessionRecord, TxConfirmation, WalletProvider};
use attendance_gateway::config::ReadConfig;
use attendance_gateway::gateway::{ChannelSink, Notification};
use attendance_gateway::SessionGateway;
use tokio::sync::mpsc;

pub const START_TIME: u64 = 1_700_000_000;

#[derive(Default)]
struct ChainState {
    now: u64,
    block: u64,
    sessions: Vec<SessionRecord>,
    attendance: HashMap<u64, Vec<Address>>,
    timestamps: HashMap<(u64, Address), u64>,
    badges: Vec<Address>,
    fail_reads: HashSet<u64>,
    read_latency: Option<Duration>,
    completed_reads: Vec<u64>,
    offline: bool,
}

/// In-memory stand-in for the deployed attendance contract.
#[derive(Clone)]
pub struct SimulatedChain {
    state: Arc<Mutex<ChainState>>,
    session_reads: Arc<AtomicUsize>,
}

impl SimulatedChain {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChainState {
                now: START_TIME,
                ..Default::default()
            })),
            session_reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.state.lock().unwrap().now += secs;
    }

    pub fn now(&self) -> u64 {
        self.state.lock().unwrap().now
    }

    /// Reserve an identifier without a created session behind it.
    pub fn push_unused_slot(&self) {
        self.state.lock().unwrap().sessions.push(SessionRecord {
            name: String::new(),
            created_at: U256::ZERO,
            organizer: Address::ZERO,
            exists: false,
        });
    }

    /// Make `sessions(id)` fail at the transport level.
    pub fn fail_reads_of(&self, session_id: u64) {
        self.state.lock().unwrap().fail_reads.insert(session_id);
    }

    /// Make every call fail as if the node were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Delay `sessions(id)` by `step` per identifier below the newest, so
    /// higher identifiers answer first.
    pub fn set_read_latency(&self, step: Duration) {
        self.state.lock().unwrap().read_latency = Some(step);
    }

    /// Session identifiers in the order their reads completed.
    pub fn completed_reads(&self) -> Vec<u64> {
        self.state.lock().unwrap().completed_reads.clone()
    }

    pub fn badges(&self) -> Vec<Address> {
        self.state.lock().unwrap().badges.clone()
    }

    pub fn session_reads(&self) -> usize {
        self.session_reads.load(Ordering::SeqCst)
    }

    fn binding(&self, account: Address) -> SimulatedBinding {
        SimulatedBinding {
            chain: self.clone(),
            account,
        }
    }

    fn include(state: &mut ChainState) -> TxConfirmation {
        state.block += 1;
        TxConfirmation {
            tx_hash: TxHash::with_last_byte(state.block as u8),
            block_number: Some(state.block),
        }
    }
}

pub struct SimulatedBinding {
    chain: SimulatedChain,
    account: Address,
}

impl SimulatedBinding {
    fn state(&self) -> GatewayResult<std::sync::MutexGuard<'_, ChainState>> {
        let state = self.chain.state.lock().unwrap();
        if state.offline {
            return Err(GatewayError::Rpc("connection refused".to_string()));
        }
        Ok(state)
    }
}

impl ContractBinding for SimulatedBinding {
    fn account(&self) -> Address {
        self.account
    }

    async fn create_session(&self, name: &str) -> GatewayResult<TxConfirmation> {
        let mut state = self.state()?;
        let created_at = U256::from(state.now);
        state.sessions.push(SessionRecord {
            name: name.to_string(),
            created_at,
            organizer: self.account,
            exists: true,
        });
        Ok(SimulatedChain::include(&mut state))
    }

    async fn mark_attendance(&self, session_id: u64) -> GatewayResult<TxConfirmation> {
        let mut state = self.state()?;
        let exists = state
            .sessions
            .get(session_id as usize)
            .is_some_and(|s| s.exists);
        if !exists {
            return Err(GatewayError::Reverted("Session does not exist".to_string()));
        }
        let attendees = state.attendance.entry(session_id).or_default();
        if attendees.contains(&self.account) {
            return Err(GatewayError::Reverted("Already attended".to_string()));
        }
        attendees.push(self.account);
        let now = state.now;
        state.timestamps.insert((session_id, self.account), now);
        Ok(SimulatedChain::include(&mut state))
    }

    async fn mint_badge(&self, recipient: Address) -> GatewayResult<TxConfirmation> {
        let mut state = self.state()?;
        if recipient.is_zero() {
            return Err(GatewayError::Reverted("ERC721InvalidReceiver".to_string()));
        }
        state.badges.push(recipient);
        Ok(SimulatedChain::include(&mut state))
    }

    async fn next_session_id(&self) -> GatewayResult<U256> {
        Ok(U256::from(self.state()?.sessions.len()))
    }

    async fn session(&self, session_id: u64) -> GatewayResult<SessionRecord> {
        self.chain.session_reads.fetch_add(1, Ordering::SeqCst);
        let delay = {
            let state = self.state()?;
            state.read_latency.map(|step| {
                let behind = (state.sessions.len() as u64).saturating_sub(session_id);
                step * behind as u32
            })
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state()?;
        state.completed_reads.push(session_id);
        if state.fail_reads.contains(&session_id) {
            return Err(GatewayError::Rpc(format!("node error reading session {}", session_id)));
        }
        Ok(state
            .sessions
            .get(session_id as usize)
            .cloned()
            .unwrap_or(SessionRecord {
                name: String::new(),
                created_at: U256::ZERO,
                organizer: Address::ZERO,
                exists: false,
            }))
    }

    async fn attendees(&self, session_id: u64) -> GatewayResult<Vec<Address>> {
        Ok(self
            .state()?
            .attendance
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn has_attended(&self, session_id: u64, attendee: Address) -> GatewayResult<bool> {
        Ok(self
            .state()?
            .attendance
            .get(&session_id)
            .is_some_and(|list| list.contains(&attendee)))
    }

    async fn attendance_timestamp(&self, session_id: u64, attendee: Address) -> GatewayResult<U256> {
        let state = self.state()?;
        Ok(U256::from(
            state
                .timestamps
                .get(&(session_id, attendee))
                .copied()
                .unwrap_or(0),
        ))
    }
}

/// Wallet extension stand-in with scriptable authorization behavior.
pub struct SimulatedWallet {
    chain: SimulatedChain,
    account: Address,
    authorized: AtomicBool,
    reject: AtomicBool,
    /// When set, `request_accounts` waits here before answering.
    gate: Option<Arc<Notify>>,
}

impl SimulatedWallet {
    pub fn new(chain: &SimulatedChain, account: Address) -> Self {
        Self {
            chain: chain.clone(),
            account,
            authorized: AtomicBool::new(false),
            reject: AtomicBool::new(false),
            gate: None,
        }
    }

    pub fn authorized(self) -> Self {
        self.authorized.store(true, Ordering::SeqCst);
        self
    }

    pub fn rejecting(self) -> Self {
        self.reject.store(true, Ordering::SeqCst);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

impl WalletProvider for SimulatedWallet {
    type Binding = SimulatedBinding;

    async fn list_accounts(&self) -> GatewayResult<Vec<Address>> {
        if self.authorized.load(Ordering::SeqCst) {
            Ok(vec![self.account])
        } else {
            Ok(Vec::new())
        }
    }

    async fn request_accounts(&self) -> GatewayResult<Vec<Address>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.reject.load(Ordering::SeqCst) {
            return Err(GatewayError::UserRejected("User denied account authorization".to_string()));
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(vec![self.account])
    }

    async fn bind(&self, account: Address) -> GatewayResult<SimulatedBinding> {
        Ok(self.chain.binding(account))
    }
}

pub fn organizer() -> Address {
    Address::repeat_byte(0x0a)
}

pub fn participant() -> Address {
    Address::repeat_byte(0x0b)
}

/// Gateway over `wallet` with a channel sink for asserting notifications.
pub fn gateway_with(
    wallet: Option<SimulatedWallet>,
) -> (SessionGateway<SimulatedWallet>, mpsc::UnboundedReceiver<Notification>) {
    let (sink, rx) = ChannelSink::new();
    let gateway = SessionGateway::new(wallet, Arc::new(sink), &ReadConfig { read_concurrency: 4 });
    (gateway, rx)
}

/// Connected gateway for `account` on `chain`, with the connect notification drained.
pub async fn connected(
    chain: &SimulatedChain,
    account: Address,
) -> (SessionGateway<SimulatedWallet>, mpsc::UnboundedReceiver<Notification>) {
    let (gateway, mut rx) = gateway_with(Some(SimulatedWallet::new(chain, account)));
    gateway.connect().await;
    assert!(gateway.is_connected());
    drain(&mut rx);
    (gateway, rx)
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}
