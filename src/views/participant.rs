//! Participant dashboard view-state.
//!
//! The attended set lives only for the lifetime of this value; a reload
//! rebuilds it from chain reads.

use alloy::primitives::Address;
use dashmap::DashSet;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

use crate::blockchain::wallet::WalletProvider;
use crate::gateway::session::{unix_now, Session, SessionStatus};
use crate::gateway::SessionGateway;

#[derive(Debug, Default)]
pub struct ParticipantDashboard {
    participant: Option<Address>,
    sessions: Vec<Session>,
    attended: DashSet<u64>,
}

/// Serializable snapshot of the dashboard at one instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSummary {
    pub participant: Option<Address>,
    pub running: Vec<Session>,
    pub past: Vec<Session>,
    pub attended: Vec<u64>,
    pub attendance_rate: f64,
}

impl ParticipantDashboard {
    pub fn new(participant: Address, sessions: Vec<Session>) -> Self {
        Self {
            participant: Some(participant),
            sessions,
            attended: DashSet::new(),
        }
    }

    /// Load all sessions and check the connected account's attendance at each.
    ///
    /// Attendance checks run concurrently, bounded by `concurrency`.
    pub async fn load<W: WalletProvider>(gateway: &SessionGateway<W>, concurrency: usize) -> Self {
        let Some(account) = gateway.account() else {
            return Self::default();
        };
        let dashboard = Self::new(account, gateway.get_sessions().await);

        let attended = &dashboard.attended;
        stream::iter(dashboard.sessions.iter().map(|s| s.id))
            .for_each_concurrent(concurrency.max(1), |id| async move {
                if gateway.check_attendance(id, account).await {
                    attended.insert(id);
                }
            })
            .await;

        tracing::debug!(
            account = %account,
            sessions = dashboard.sessions.len(),
            attended = dashboard.attended.len(),
            "Loaded participant dashboard"
        );
        dashboard
    }

    pub fn participant(&self) -> Option<Address> {
        self.participant
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn has_attended(&self, session_id: u64) -> bool {
        self.attended.contains(&session_id)
    }

    pub fn attended_count(&self) -> usize {
        self.attended.len()
    }

    pub fn with_status(&self, status: SessionStatus, now: u64) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| s.status_at(now) == status)
            .collect()
    }

    /// Attendance can be marked while the session runs and has not been attended.
    pub fn can_attend(&self, session_id: u64, now: u64) -> bool {
        self.sessions
            .iter()
            .find(|s| s.id == session_id)
            .is_some_and(|s| s.is_running_at(now) && !self.has_attended(session_id))
    }

    /// Attended sessions as a percentage of all sessions.
    pub fn attendance_rate(&self) -> f64 {
        if self.sessions.is_empty() {
            return 0.0;
        }
        self.attended.len() as f64 / self.sessions.len() as f64 * 100.0
    }

    /// Mark attendance and record it locally once the transaction is included.
    pub async fn attend<W: WalletProvider>(&self, gateway: &SessionGateway<W>, session_id: u64) -> bool {
        let marked = gateway.mark_attendance(session_id).await;
        if marked {
            self.attended.insert(session_id);
        }
        marked
    }

    pub fn summary(&self, now: u64) -> ParticipantSummary {
        let mut attended: Vec<u64> = self.attended.iter().map(|id| *id).collect();
        attended.sort_unstable();
        ParticipantSummary {
            participant: self.participant,
            running: self.with_status(SessionStatus::Running, now).into_iter().cloned().collect(),
            past: self.with_status(SessionStatus::Past, now).into_iter().cloned().collect(),
            attended,
            attendance_rate: self.attendance_rate(),
        }
    }

    pub fn summary_now(&self) -> ParticipantSummary {
        self.summary(unix_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn sessions() -> Vec<Session> {
        (0..4)
            .map(|id| Session {
                id,
                name: format!("Session {}", id),
                created_at: NOW - id * 50_000,
                organizer: Address::repeat_byte(9),
                exists: true,
            })
            .collect()
    }

    #[test]
    fn test_grouping_by_status() {
        let dashboard = ParticipantDashboard::new(Address::repeat_byte(1), sessions());
        let running: Vec<u64> = dashboard
            .with_status(SessionStatus::Running, NOW)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(running, vec![0, 1]);
        assert_eq!(dashboard.with_status(SessionStatus::Past, NOW).len(), 2);
    }

    #[test]
    fn test_can_attend_only_running_unattended() {
        let dashboard = ParticipantDashboard::new(Address::repeat_byte(1), sessions());
        assert!(dashboard.can_attend(0, NOW));
        assert!(!dashboard.can_attend(3, NOW));
        assert!(!dashboard.can_attend(42, NOW));

        dashboard.attended.insert(0);
        assert!(!dashboard.can_attend(0, NOW));
    }

    #[test]
    fn test_attendance_rate() {
        let dashboard = ParticipantDashboard::new(Address::repeat_byte(1), sessions());
        assert_eq!(dashboard.attendance_rate(), 0.0);
        dashboard.attended.insert(1);
        assert_eq!(dashboard.attendance_rate(), 25.0);

        let empty = ParticipantDashboard::default();
        assert_eq!(empty.attendance_rate(), 0.0);
    }

    #[test]
    fn test_summary_sorts_attended() {
        let dashboard = ParticipantDashboard::new(Address::repeat_byte(1), sessions());
        dashboard.attended.insert(3);
        dashboard.attended.insert(1);
        let summary = dashboard.summary(NOW);
        assert_eq!(summary.attended, vec![1, 3]);
        assert_eq!(summary.running.len(), 2);
    }
}
