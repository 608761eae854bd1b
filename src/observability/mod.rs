//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway operations produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (call counters, connection gauge)
//! ```
//!
//! # Design Decisions
//! - Structured fields (operation, session_id, account) on every event
//! - Recorded only once `metrics_enabled` installs a recorder; no-ops otherwise

pub mod logging;
pub mod metrics;
