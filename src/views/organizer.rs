//! Organizer dashboard view-state.

use alloy::primitives::Address;
use serde::Serialize;

use crate::blockchain::wallet::WalletProvider;
use crate::gateway::session::{unix_now, Session, SessionStatus};
use crate::gateway::SessionGateway;

/// Number of sessions shown in the "recent" list.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub running: usize,
    pub past: usize,
}

impl SessionStats {
    pub fn from_sessions(sessions: &[Session], now: u64) -> Self {
        let running = sessions
            .iter()
            .filter(|s| s.status_at(now) == SessionStatus::Running)
            .count();
        Self {
            total: sessions.len(),
            running,
            past: sessions.len() - running,
        }
    }
}

/// Sessions created by `organizer`.
pub fn sessions_by_organizer(sessions: Vec<Session>, organizer: Address) -> Vec<Session> {
    sessions
        .into_iter()
        .filter(|s| s.organizer == organizer)
        .collect()
}

/// Newest sessions first, at most `limit`.
pub fn recent_sessions(sessions: &[Session], limit: usize) -> Vec<Session> {
    let mut sorted = sessions.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizerDashboard {
    pub organizer: Option<Address>,
    pub sessions: Vec<Session>,
    pub stats: SessionStats,
    pub recent: Vec<Session>,
}

impl OrganizerDashboard {
    pub fn build(organizer: Address, all_sessions: Vec<Session>, now: u64) -> Self {
        let sessions = sessions_by_organizer(all_sessions, organizer);
        Self {
            organizer: Some(organizer),
            stats: SessionStats::from_sessions(&sessions, now),
            recent: recent_sessions(&sessions, RECENT_LIMIT),
            sessions,
        }
    }

    /// Load the connected account's sessions. Empty when disconnected.
    pub async fn load<W: WalletProvider>(gateway: &SessionGateway<W>) -> Self {
        let Some(account) = gateway.account() else {
            return Self::default();
        };
        let all = gateway.get_sessions().await;
        tracing::debug!(account = %account, total = all.len(), "Loaded organizer sessions");
        Self::build(account, all, unix_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn session(id: u64, organizer: Address, age_secs: u64) -> Session {
        Session {
            id,
            name: format!("Session {}", id),
            created_at: NOW - age_secs,
            organizer,
            exists: true,
        }
    }

    #[test]
    fn test_stats_split_running_and_past() {
        let org = Address::repeat_byte(1);
        let sessions = vec![
            session(0, org, 10),
            session(1, org, 86_400),
            session(2, org, 90_000),
        ];
        let stats = SessionStats::from_sessions(&sessions, NOW);
        assert_eq!(stats, SessionStats { total: 3, running: 1, past: 2 });
    }

    #[test]
    fn test_build_filters_to_organizer() {
        let me = Address::repeat_byte(1);
        let other = Address::repeat_byte(2);
        let all = vec![
            session(0, me, 100),
            session(1, other, 100),
            session(2, me, 200_000),
        ];

        let dashboard = OrganizerDashboard::build(me, all, NOW);
        let ids: Vec<u64> = dashboard.sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(dashboard.stats.running, 1);
        assert_eq!(dashboard.stats.past, 1);
    }

    #[test]
    fn test_recent_sessions_newest_first() {
        let org = Address::repeat_byte(1);
        let sessions = vec![
            session(0, org, 400),
            session(1, org, 100),
            session(2, org, 300),
            session(3, org, 200),
        ];
        let recent: Vec<u64> = recent_sessions(&sessions, RECENT_LIMIT)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(recent, vec![1, 3, 2]);
    }
}
