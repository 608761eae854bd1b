//! Typed session and attendance snapshots decoded from contract results.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{GatewayError, GatewayResult, SessionRecord};

/// A session counts as running for this long after creation.
pub const RUNNING_WINDOW_SECS: u64 = 86_400;

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Derived lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Past,
}

/// Snapshot of one on-chain session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: u64,
    pub name: String,
    /// Seconds since epoch, set by the contract.
    pub created_at: u64,
    pub organizer: Address,
    pub exists: bool,
}

impl Session {
    /// Decode a raw storage slot. Fails closed on out-of-range timestamps.
    pub fn decode(id: u64, record: SessionRecord) -> GatewayResult<Self> {
        let created_at = u64::try_from(record.created_at).map_err(|_| {
            GatewayError::Decode(format!(
                "session {} createdAt {} does not fit in u64",
                id, record.created_at
            ))
        })?;

        Ok(Self {
            id,
            name: record.name,
            created_at,
            organizer: record.organizer,
            exists: record.exists,
        })
    }

    /// Status at `now`: running while less than a day has elapsed since creation.
    pub fn status_at(&self, now: u64) -> SessionStatus {
        if now.saturating_sub(self.created_at) < RUNNING_WINDOW_SECS {
            SessionStatus::Running
        } else {
            SessionStatus::Past
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status_at(unix_now())
    }

    pub fn is_running_at(&self, now: u64) -> bool {
        self.status_at(now) == SessionStatus::Running
    }
}

/// Attendance of one address at one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub address: Address,
    /// Seconds since epoch when attendance was marked, zero if never.
    pub timestamp: u64,
    pub has_attended: bool,
}

impl AttendanceRecord {
    pub fn decode(address: Address, timestamp: U256, has_attended: bool) -> GatewayResult<Self> {
        let timestamp = u64::try_from(timestamp).map_err(|_| {
            GatewayError::Decode(format!("attendance timestamp {} does not fit in u64", timestamp))
        })?;
        Ok(Self {
            address,
            timestamp,
            has_attended,
        })
    }
}

/// Contract counters are U256; session ids are handled as u64.
pub(crate) fn decode_count(value: U256) -> GatewayResult<u64> {
    u64::try_from(value)
        .map_err(|_| GatewayError::Decode(format!("session count {} does not fit in u64", value)))
}
