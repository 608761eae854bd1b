//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Address of the deployed attendance contract used when none is configured.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xd9145CCE52D386f254917e481eB44e9943F39138";

/// Environment variable holding the wallet's private key.
pub const DEFAULT_PRIVATE_KEY_ENV_VAR: &str = "ATTENDANCE_WALLET_PRIVATE_KEY";

/// Root configuration for the attendance gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// RPC endpoint and inclusion settings.
    pub blockchain: BlockchainConfig,

    /// Attendance contract location.
    pub contract: ContractConfig,

    /// Wallet key source and authorization.
    pub wallet: WalletConfig,

    /// Read fan-out settings.
    pub gateway: ReadConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Number of block confirmations a write waits for (1 = included).
    pub confirmation_blocks: u32,

    /// Optional cap on how long a write waits for inclusion.
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            confirmation_blocks: 1,
            confirmation_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the attendance contract.
    pub address: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Name of the environment variable holding the private key.
    pub private_key_env: String,

    /// Treat the account as already authorized, so startup connects silently.
    pub pre_authorized: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_key_env: DEFAULT_PRIVATE_KEY_ENV_VAR.to_string(),
            pre_authorized: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadConfig {
    /// Maximum detail reads in flight while enumerating sessions.
    pub read_concurrency: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self { read_concurrency: 8 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Record gateway metrics and write them out when the command finishes.
    pub metrics_enabled: bool,

    /// Prometheus text file the metrics are written to.
    pub metrics_file: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_file: "attendance-gateway.prom".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [blockchain]
            rpc_url = "https://rpc.sepolia.org"
            chain_id = 11155111
            "#,
        )
        .unwrap();

        assert_eq!(config.blockchain.chain_id, 11155111);
        assert_eq!(config.blockchain.confirmation_blocks, 1);
        assert_eq!(config.contract.address, DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(config.wallet.private_key_env, DEFAULT_PRIVATE_KEY_ENV_VAR);
        assert_eq!(config.gateway.read_concurrency, 8);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.wallet.pre_authorized);
    }
}
