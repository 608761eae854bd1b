//! The chain session gateway.
//!
//! Every operation comes in two forms:
//! - `try_*` returns the precise [`GatewayError`] and emits no notification
//! - the plain form logs, notifies through the sink and returns the empty
//!   value (`None`, `false`, empty `Vec`) on any failure
//!
//! Reads and writes load the current connection once and run against that
//! snapshot, so a disconnect never cancels an in-flight call.
//!
//! Every disconnect bumps an epoch. A connect attempt that started in an
//! earlier epoch completes without installing its binding.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;
use futures_util::stream::{self, StreamExt};

use crate::blockchain::contract::ContractBinding;
use crate::blockchain::types::{GatewayError, GatewayResult};
use crate::blockchain::wallet::WalletProvider;
use crate::config::ReadConfig;
use crate::gateway::notification::{short_address, Notification, NotificationSink, Operation};
use crate::gateway::session::{decode_count, AttendanceRecord, Session};
use crate::gateway::state::{Connection, ConnectionState};
use crate::observability::metrics;

/// Mediates all reads and writes between consumers and the attendance contract.
pub struct SessionGateway<W: WalletProvider> {
    wallet: Option<W>,
    connection: ArcSwapOption<Connection<W::Binding>>,
    connecting: AtomicBool,
    epoch: AtomicU64,
    sink: Arc<dyn NotificationSink>,
    read_concurrency: usize,
}

/// Clears the in-flight flag however the connect attempt ends.
struct ConnectingGuard<'a>(&'a AtomicBool);

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<W: WalletProvider> SessionGateway<W> {
    /// Create a disconnected gateway. `wallet` is `None` when no provider exists.
    pub fn new(wallet: Option<W>, sink: Arc<dyn NotificationSink>, reads: &ReadConfig) -> Self {
        Self {
            wallet,
            connection: ArcSwapOption::empty(),
            connecting: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            sink,
            read_concurrency: reads.read_concurrency.max(1),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        if self.connecting.load(Ordering::Acquire) {
            return ConnectionState::Connecting;
        }
        match &*self.connection.load() {
            Some(conn) => ConnectionState::Connected {
                account: conn.account,
            },
            None => ConnectionState::Disconnected,
        }
    }

    pub fn account(&self) -> Option<Address> {
        self.connection.load_full().map(|conn| conn.account)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.load().is_some()
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    // ---------------------------------------------------------------------
    // Connection lifecycle
    // ---------------------------------------------------------------------

    /// Silently adopt an already-authorized account. Never prompts or notifies.
    pub async fn restore(&self) -> ConnectionState {
        let Some(wallet) = self.wallet.as_ref() else {
            tracing::debug!("No wallet provider, staying disconnected");
            return self.state();
        };
        let Some((guard, epoch)) = self.begin_connecting() else {
            return self.state();
        };

        let result = async {
            let accounts = wallet.list_accounts().await?;
            match accounts.first() {
                Some(&account) => wallet.bind(account).await.map(|binding| Some((account, binding))),
                None => Ok(None),
            }
        }
        .await;

        match result {
            Ok(Some((account, binding))) => {
                if self.install(epoch, account, binding) {
                    tracing::info!(account = %account, "Restored authorized wallet");
                } else {
                    tracing::debug!(account = %account, "Disconnected while restoring, dropping binding");
                }
            }
            Ok(None) => tracing::debug!("Wallet has no authorized accounts"),
            Err(e) => tracing::warn!(error = %e, "Error checking existing wallet authorization"),
        }
        drop(guard);
        self.state()
    }

    /// Ask the wallet for an account and bind the contract to it.
    pub async fn try_connect(&self) -> GatewayResult<Address> {
        let wallet = self.wallet.as_ref().ok_or(GatewayError::WalletNotFound)?;
        let (_guard, epoch) = self.begin_connecting().ok_or(GatewayError::ConnectInProgress)?;

        let accounts = wallet.request_accounts().await?;
        let account = *accounts
            .first()
            .ok_or_else(|| GatewayError::UserRejected("no account was granted".to_string()))?;
        let binding = wallet.bind(account).await?;
        if binding.account() != account {
            return Err(GatewayError::Wallet(format!(
                "binding signs as {} instead of {}",
                binding.account(),
                account
            )));
        }

        if !self.install(epoch, account, binding) {
            return Err(GatewayError::ConnectCancelled);
        }
        Ok(account)
    }

    /// Connect, announcing the outcome. A request made while another is in flight is ignored.
    pub async fn connect(&self) {
        match self.try_connect().await {
            Ok(account) => {
                tracing::info!(account = %account, "Wallet connected");
                metrics::record_gateway_call(Operation::Connect.name(), true);
                self.sink.notify(Notification::success(
                    "Wallet Connected",
                    format!("Connected to {}", short_address(&account)),
                ));
            }
            Err(GatewayError::ConnectInProgress) => {
                tracing::debug!("Connect already in progress, ignoring request");
            }
            Err(GatewayError::ConnectCancelled) => {
                tracing::debug!("Disconnected while connecting, discarding account");
            }
            Err(e) => {
                self.settle::<()>(Operation::Connect, Err(e));
            }
        }
    }

    /// Drop the account and binding. A connect still in flight will not install.
    pub fn disconnect(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let previous = self.connection.swap(None);
        metrics::record_connected(false);
        if let Some(conn) = previous {
            tracing::info!(account = %conn.account, "Wallet disconnected");
        }
        self.sink.notify(Notification::info(
            "Wallet Disconnected",
            "Your wallet has been disconnected.",
        ));
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Create a session and return the identifier the contract assigned.
    pub async fn try_create_session(&self, name: &str) -> GatewayResult<u64> {
        let conn = self.current()?;
        if name.trim().is_empty() {
            return Err(GatewayError::InvalidInput("session name must not be empty".to_string()));
        }

        let receipt = conn.binding.create_session(name).await?;
        let next = decode_count(conn.binding.next_session_id().await?)?;
        let session_id = next
            .checked_sub(1)
            .ok_or_else(|| GatewayError::Decode("nextSessionId is zero after creation".to_string()))?;

        tracing::info!(
            session_id,
            tx_hash = %receipt.tx_hash,
            organizer = %conn.account,
            "Session created"
        );
        Ok(session_id)
    }

    pub async fn create_session(&self, name: &str) -> Option<u64> {
        let result = self.try_create_session(name).await;
        if result.is_ok() {
            self.sink.notify(Notification::success(
                "Event Created",
                format!("Successfully created \"{}\"", name),
            ));
        }
        self.settle(Operation::CreateSession, result.map(Some))
    }

    pub async fn try_mark_attendance(&self, session_id: u64) -> GatewayResult<()> {
        let conn = self.current()?;
        let receipt = conn.binding.mark_attendance(session_id).await?;
        tracing::info!(
            session_id,
            attendee = %conn.account,
            tx_hash = %receipt.tx_hash,
            "Attendance marked"
        );
        Ok(())
    }

    pub async fn mark_attendance(&self, session_id: u64) -> bool {
        let result = self.try_mark_attendance(session_id).await;
        if result.is_ok() {
            self.sink.notify(Notification::success(
                "Attendance Marked",
                "Your attendance has been recorded!",
            ));
        }
        self.settle(Operation::MarkAttendance, result.map(|()| true))
    }

    pub async fn try_mint_badge(&self, recipient: Address) -> GatewayResult<()> {
        let conn = self.current()?;
        let receipt = conn.binding.mint_badge(recipient).await?;
        tracing::info!(recipient = %recipient, tx_hash = %receipt.tx_hash, "Badge minted");
        Ok(())
    }

    pub async fn mint_badge(&self, recipient: Address) -> bool {
        let result = self.try_mint_badge(recipient).await;
        if result.is_ok() {
            self.sink.notify(Notification::success(
                "Badge Minted",
                format!("Successfully minted badge for {}", short_address(&recipient)),
            ));
        }
        self.settle(Operation::MintBadge, result.map(|()| true))
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Fetch one session. Unused slots are reported as [`GatewayError::SessionNotFound`].
    pub async fn try_get_session(&self, session_id: u64) -> GatewayResult<Session> {
        let conn = self.current()?;
        fetch_session(&conn.binding, session_id).await
    }

    pub async fn get_session(&self, session_id: u64) -> Option<Session> {
        let result = self.try_get_session(session_id).await;
        self.settle(Operation::GetSession, result.map(Some))
    }

    /// Every existing session, ascending by identifier.
    ///
    /// One count query, then one detail query per candidate identifier with
    /// at most `read_concurrency` in flight. A failing detail read is skipped.
    pub async fn try_get_sessions(&self) -> GatewayResult<Vec<Session>> {
        let conn = self.current()?;
        let count = decode_count(conn.binding.next_session_id().await?)?;
        let binding = &conn.binding;

        let results: Vec<(u64, GatewayResult<Session>)> = stream::iter(0..count)
            .map(|id| async move { (id, fetch_session(binding, id).await) })
            .buffered(self.read_concurrency)
            .collect()
            .await;

        let mut sessions = Vec::with_capacity(results.len());
        for (id, result) in results {
            match result {
                Ok(session) => sessions.push(session),
                Err(GatewayError::SessionNotFound(_)) => {}
                Err(e) => tracing::warn!(session_id = id, error = %e, "Skipping unreadable session"),
            }
        }
        Ok(sessions)
    }

    pub async fn get_sessions(&self) -> Vec<Session> {
        let result = self.try_get_sessions().await;
        self.settle(Operation::GetSessions, result)
    }

    pub async fn try_get_attendees(&self, session_id: u64) -> GatewayResult<Vec<Address>> {
        let conn = self.current()?;
        conn.binding.attendees(session_id).await
    }

    pub async fn get_attendees(&self, session_id: u64) -> Vec<Address> {
        let result = self.try_get_attendees(session_id).await;
        self.settle(Operation::GetAttendees, result)
    }

    pub async fn try_check_attendance(&self, session_id: u64, attendee: Address) -> GatewayResult<bool> {
        let conn = self.current()?;
        conn.binding.has_attended(session_id, attendee).await
    }

    pub async fn check_attendance(&self, session_id: u64, attendee: Address) -> bool {
        let result = self.try_check_attendance(session_id, attendee).await;
        self.settle(Operation::CheckAttendance, result)
    }

    /// Attendance flag together with the time it was recorded.
    pub async fn try_attendance_record(&self, session_id: u64, attendee: Address) -> GatewayResult<AttendanceRecord> {
        let conn = self.current()?;
        let (has_attended, timestamp) = tokio::try_join!(
            conn.binding.has_attended(session_id, attendee),
            conn.binding.attendance_timestamp(session_id, attendee),
        )?;
        AttendanceRecord::decode(attendee, timestamp, has_attended)
    }

    pub async fn attendance_record(&self, session_id: u64, attendee: Address) -> Option<AttendanceRecord> {
        let result = self.try_attendance_record(session_id, attendee).await;
        self.settle(Operation::AttendanceRecord, result.map(Some))
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn current(&self) -> GatewayResult<Arc<Connection<W::Binding>>> {
        self.connection.load_full().ok_or(GatewayError::NotConnected)
    }

    /// Claim the in-flight flag and capture the epoch the attempt belongs to.
    fn begin_connecting(&self) -> Option<(ConnectingGuard<'_>, u64)> {
        self.connecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some((ConnectingGuard(&self.connecting), self.epoch.load(Ordering::SeqCst)))
    }

    /// Publish a binding unless a disconnect happened since `epoch`.
    ///
    /// The epoch is checked after the store: a disconnect racing the store
    /// either clears it itself or is seen here and undone.
    fn install(&self, epoch: u64, account: Address, binding: W::Binding) -> bool {
        let conn = Some(Arc::new(Connection { account, binding }));
        self.connection.store(conn.clone());
        if self.epoch.load(Ordering::SeqCst) != epoch {
            self.connection.compare_and_swap(&conn, None);
            return false;
        }
        metrics::record_connected(true);
        true
    }

    /// Absorb a failure into the operation's empty value.
    fn settle<T: Default>(&self, operation: Operation, result: GatewayResult<T>) -> T {
        match result {
            Ok(value) => {
                metrics::record_gateway_call(operation.name(), true);
                value
            }
            Err(GatewayError::NotConnected) => {
                tracing::debug!(operation = operation.name(), "Called while disconnected");
                metrics::record_gateway_call(operation.name(), false);
                T::default()
            }
            Err(e) => {
                if operation.is_write() {
                    tracing::error!(operation = operation.name(), error = %e, "Gateway call failed");
                } else {
                    tracing::warn!(operation = operation.name(), error = %e, "Gateway call failed");
                }
                metrics::record_gateway_call(operation.name(), false);
                if let Some(notice) = operation.failure_notice(&e) {
                    self.sink.notify(notice);
                }
                T::default()
            }
        }
    }
}

async fn fetch_session<B: ContractBinding>(binding: &B, session_id: u64) -> GatewayResult<Session> {
    let record = binding.session(session_id).await?;
    if !record.exists {
        return Err(GatewayError::SessionNotFound(session_id));
    }
    Session::decode(session_id, record)
}

impl<W: WalletProvider> std::fmt::Debug for SessionGateway<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGateway")
            .field("state", &self.state())
            .field("has_wallet", &self.has_wallet())
            .field("read_concurrency", &self.read_concurrency)
            .finish()
    }
}
