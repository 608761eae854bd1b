//! Chain session gateway subsystem.
//!
//! # Data Flow
//! ```text
//! consumer (dashboard view, CLI)
//!     → service.rs (connection snapshot, try_* operation)
//!     → blockchain::ContractBinding (contract call, await inclusion)
//!     → session.rs (decode into typed snapshots, fail closed)
//!     → notification.rs (success/failure message to the sink)
//! ```

pub mod notification;
pub mod service;
pub mod session;
pub mod state;

pub use notification::{ChannelSink, Notification, NotificationKind, NotificationSink, Operation, TracingSink};
pub use service::SessionGateway;
pub use session::{unix_now, AttendanceRecord, Session, SessionStatus, RUNNING_WINDOW_SECS};
pub use state::ConnectionState;
