//! Dashboard view-state derived from gateway reads.
//!
//! Views only filter, group and count data the gateway already returned.
//! They hold no invariants of their own.

pub mod organizer;
pub mod participant;

pub use organizer::{OrganizerDashboard, SessionStats};
pub use participant::{ParticipantDashboard, ParticipantSummary};

use serde::{Deserialize, Serialize};

/// Which dashboard a user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Organizer,
    Participant,
}
