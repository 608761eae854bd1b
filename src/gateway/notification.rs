//! User-facing notifications emitted by the gateway.
//!
//! The gateway never renders anything itself. It hands each message to a
//! [`NotificationSink`], which the consumer chooses.

use alloy::primitives::Address;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::blockchain::types::{ErrorCategory, GatewayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Observer for gateway notifications. Must not block.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => tracing::warn!(
                title = %notification.title,
                "{}", notification.description
            ),
            _ => tracing::info!(
                title = %notification.title,
                "{}", notification.description
            ),
        }
    }
}

/// Forwards notifications to a channel, e.g. a UI task draining toasts.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        // Receiver gone means nobody is listening anymore.
        let _ = self.tx.send(notification);
    }
}

/// `0x1234...abcd` form used in messages.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Gateway operations, used for log fields, metrics labels and failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    CreateSession,
    MarkAttendance,
    MintBadge,
    GetSession,
    GetSessions,
    GetAttendees,
    CheckAttendance,
    AttendanceRecord,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Connect => "connect",
            Operation::CreateSession => "create_session",
            Operation::MarkAttendance => "mark_attendance",
            Operation::MintBadge => "mint_badge",
            Operation::GetSession => "get_session",
            Operation::GetSessions => "get_sessions",
            Operation::GetAttendees => "get_attendees",
            Operation::CheckAttendance => "check_attendance",
            Operation::AttendanceRecord => "attendance_record",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::CreateSession | Operation::MarkAttendance | Operation::MintBadge
        )
    }

    /// Message shown when the operation fails, if the user should see one.
    ///
    /// Reads fail quietly and not-connected misuse is never announced.
    pub fn failure_notice(&self, error: &GatewayError) -> Option<Notification> {
        if error.category() == ErrorCategory::NotConnected {
            return None;
        }
        match self {
            Operation::Connect => Some(match error.category() {
                ErrorCategory::Environment => Notification::error(
                    "Wallet not found",
                    "Please install or configure a wallet to connect.",
                ),
                _ => Notification::error(
                    "Connection Failed",
                    "Failed to connect wallet. Please try again.",
                ),
            }),
            Operation::CreateSession => Some(Notification::error(
                "Creation Failed",
                "Failed to create event. Please try again.",
            )),
            Operation::MarkAttendance => Some(Notification::error(
                "Attendance Failed",
                "Failed to mark attendance. Please try again.",
            )),
            Operation::MintBadge => Some(Notification::error(
                "Minting Failed",
                "Failed to mint badge. Please try again.",
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        let address: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(short_address(&address), "0xf39F...2266");
    }

    #[test]
    fn test_reads_fail_quietly() {
        let err = GatewayError::Rpc("connection refused".into());
        assert!(Operation::GetSessions.failure_notice(&err).is_none());
        assert!(Operation::CheckAttendance.failure_notice(&err).is_none());
        assert!(Operation::MintBadge.failure_notice(&err).is_some());
    }

    #[test]
    fn test_write_operations() {
        assert!(Operation::CreateSession.is_write());
        assert!(Operation::MintBadge.is_write());
        assert!(!Operation::Connect.is_write());
        assert!(!Operation::AttendanceRecord.is_write());
    }

    #[test]
    fn test_not_connected_is_silent() {
        assert!(Operation::CreateSession
            .failure_notice(&GatewayError::NotConnected)
            .is_none());
        assert!(Operation::Connect
            .failure_notice(&GatewayError::ConnectInProgress)
            .is_none());
        assert!(Operation::Connect
            .failure_notice(&GatewayError::ConnectCancelled)
            .is_none());
    }

    #[test]
    fn test_missing_wallet_notice() {
        let notice = Operation::Connect
            .failure_notice(&GatewayError::WalletNotFound)
            .unwrap();
        assert_eq!(notice.title, "Wallet not found");
        assert_eq!(notice.kind, NotificationKind::Error);
    }

    #[test]
    fn test_channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new();
        sink.notify(Notification::info("Wallet Disconnected", "bye"));
        assert_eq!(rx.try_recv().unwrap().title, "Wallet Disconnected");
    }
}
