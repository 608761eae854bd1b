//! Wallet provider boundary and the locally configured wallet.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::client::ChainClient;
use crate::blockchain::contract::{AlloyBinding, ContractBinding};
use crate::blockchain::transaction::ConfirmationPolicy;
use crate::blockchain::types::{GatewayError, GatewayResult};
use crate::config::schema::GatewayConfig;

/// Capabilities the gateway needs from a wallet.
pub trait WalletProvider: Send + Sync + 'static {
    type Binding: ContractBinding;

    /// Accounts already authorized for this application. Never prompts.
    fn list_accounts(&self) -> impl Future<Output = GatewayResult<Vec<Address>>> + Send;

    /// Ask the user to authorize accounts. May be refused.
    fn request_accounts(&self) -> impl Future<Output = GatewayResult<Vec<Address>>> + Send;

    /// Pair the contract with `account` as signer.
    fn bind(&self, account: Address) -> impl Future<Output = GatewayResult<Self::Binding>> + Send;
}

/// Wallet backed by a private key from the environment.
///
/// `list_accounts` reports the account only once it has been authorized,
/// either up front (`pre_authorized`) or through `request_accounts`.
pub struct LocalWallet {
    signer: PrivateKeySigner,
    authorized: AtomicBool,
    client: ChainClient,
    contract: Address,
    policy: ConfirmationPolicy,
}

impl LocalWallet {
    /// Create a wallet from a hex-encoded private key string.
    pub fn from_private_key(private_key_hex: &str, config: &GatewayConfig) -> GatewayResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| GatewayError::Wallet(format!("Invalid private key format: {}", e)))?;

        let contract: Address = config
            .contract
            .address
            .parse()
            .map_err(|e| GatewayError::InvalidInput(format!("Invalid contract address: {}", e)))?;

        tracing::info!(
            address = %signer.address(),
            chain_id = config.blockchain.chain_id,
            "Wallet initialized"
        );

        Ok(Self {
            signer,
            authorized: AtomicBool::new(config.wallet.pre_authorized),
            client: ChainClient::new(config.blockchain.clone())?,
            contract,
            policy: ConfirmationPolicy::from_config(&config.blockchain),
        })
    }

    /// Load the wallet from the environment variable named in config.
    ///
    /// Returns `Ok(None)` when the variable is unset: no wallet is present.
    pub fn from_env(config: &GatewayConfig) -> GatewayResult<Option<Self>> {
        match std::env::var(&config.wallet.private_key_env) {
            Ok(key) if !key.trim().is_empty() => Self::from_private_key(&key, config).map(Some),
            _ => {
                tracing::debug!(
                    env_var = %config.wallet.private_key_env,
                    "No wallet key in environment"
                );
                Ok(None)
            }
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl WalletProvider for LocalWallet {
    type Binding = AlloyBinding;

    async fn list_accounts(&self) -> GatewayResult<Vec<Address>> {
        if self.authorized.load(Ordering::Acquire) {
            Ok(vec![self.signer.address()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn request_accounts(&self) -> GatewayResult<Vec<Address>> {
        self.authorized.store(true, Ordering::Release);
        Ok(vec![self.signer.address()])
    }

    async fn bind(&self, account: Address) -> GatewayResult<AlloyBinding> {
        if account != self.signer.address() {
            return Err(GatewayError::Wallet(format!("Unknown account {}", account)));
        }

        let provider = self.client.signing_provider(self.signer.clone());
        if let Err(e) = self.client.verify_chain_id(&provider).await {
            // Keep the binding; calls will surface transport failures themselves.
            tracing::warn!(error = %e, "Binding created but chain verification failed");
        }

        Ok(AlloyBinding::new(self.contract, provider, account, self.policy))
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.signer.address())
            .field("authorized", &self.authorized.load(Ordering::Relaxed))
            .field("contract", &self.contract)
            .finish()
    }
}
