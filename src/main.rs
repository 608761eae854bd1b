//! Command-line client for the attendance contract.
//!
//! # Data Flow
//! ```text
//! attendance.toml + ATTENDANCE_WALLET_PRIVATE_KEY
//!     → LocalWallet
//!     → SessionGateway (restore, connect if needed)
//!     → command (create / attend / sessions / ...)
//!     → JSON on stdout, notifications on stderr
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde::Serialize;

use attendance_gateway::config::{load_config, GatewayConfig};
use attendance_gateway::gateway::{Notification, NotificationKind, NotificationSink, TracingSink};
use attendance_gateway::observability::logging::init_logging;
use attendance_gateway::observability::metrics::{init_metrics, write_metrics};
use attendance_gateway::views::{OrganizerDashboard, ParticipantDashboard, Role};
use attendance_gateway::{LocalWallet, SessionGateway};

#[derive(Parser)]
#[command(name = "attendance-cli")]
#[command(about = "Create sessions, mark attendance and mint badges on-chain", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "ATTENDANCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the wallet connection state
    Status,
    /// Create a new session (organizer)
    Create { name: String },
    /// Mark attendance at a session (participant)
    Attend { session_id: u64 },
    /// Show one session
    Session { session_id: u64 },
    /// List every existing session
    Sessions,
    /// List addresses that attended a session
    Attendees { session_id: u64 },
    /// Check whether an address attended a session
    Check { session_id: u64, address: Address },
    /// Attendance flag and timestamp for an address
    Record { session_id: u64, address: Address },
    /// Mint an attendance badge to an address
    Mint { address: Address },
    /// Show a role's dashboard
    Dashboard {
        #[arg(value_enum)]
        role: Role,
    },
}

/// Prints notifications the way a toast would show them.
struct StderrSink;

impl NotificationSink for StderrSink {
    fn notify(&self, notification: Notification) {
        let marker = match notification.kind {
            NotificationKind::Success => "✔",
            NotificationKind::Info => "•",
            NotificationKind::Error => "✘",
        };
        eprintln!("{} {}: {}", marker, notification.title, notification.description);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    init_logging(&config.observability);
    let metrics_handle = config
        .observability
        .metrics_enabled
        .then(init_metrics)
        .flatten();

    tracing::debug!(
        rpc_url = %config.blockchain.rpc_url,
        chain_id = config.blockchain.chain_id,
        contract = %config.contract.address,
        "Configuration loaded"
    );

    let wallet = LocalWallet::from_env(&config)?;
    let sink: Arc<dyn NotificationSink> = if config.observability.json_logs {
        Arc::new(TracingSink)
    } else {
        Arc::new(StderrSink)
    };
    let gateway = SessionGateway::new(wallet, sink, &config.gateway);

    run(&cli.command, &gateway, &config).await?;

    if let Some(handle) = metrics_handle {
        let path = &config.observability.metrics_file;
        match write_metrics(&handle, path.as_ref()) {
            Ok(()) => tracing::debug!(path = %path, "Metrics written"),
            Err(e) => tracing::warn!(path = %path, error = %e, "Failed to write metrics"),
        }
    }

    Ok(())
}

async fn run(
    command: &Commands,
    gateway: &SessionGateway<LocalWallet>,
    config: &GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if !gateway.restore().await.is_connected() {
        if matches!(command, Commands::Status) {
            return print_json(&gateway.state());
        }
        gateway.connect().await;
    }

    match command {
        Commands::Status => print_json(&gateway.state())?,
        Commands::Create { name } => print_json(&gateway.create_session(name).await)?,
        Commands::Attend { session_id } => print_json(&gateway.mark_attendance(*session_id).await)?,
        Commands::Session { session_id } => print_json(&gateway.get_session(*session_id).await)?,
        Commands::Sessions => print_json(&gateway.get_sessions().await)?,
        Commands::Attendees { session_id } => print_json(&gateway.get_attendees(*session_id).await)?,
        Commands::Check { session_id, address } => {
            print_json(&gateway.check_attendance(*session_id, *address).await)?
        }
        Commands::Record { session_id, address } => {
            print_json(&gateway.attendance_record(*session_id, *address).await)?
        }
        Commands::Mint { address } => print_json(&gateway.mint_badge(*address).await)?,
        Commands::Dashboard { role } => match role {
            Role::Organizer => print_json(&OrganizerDashboard::load(gateway).await)?,
            Role::Participant => {
                let dashboard =
                    ParticipantDashboard::load(gateway, config.gateway.read_concurrency).await;
                print_json(&dashboard.summary_now())?
            }
        },
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
