//! JSON-RPC provider construction for signing bindings.
//!
//! # Responsibilities
//! - Build an HTTP provider that signs with a given account
//! - Verify the endpoint serves the configured chain

use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainConfig, GatewayError, GatewayResult};

/// Factory for signing providers against one RPC endpoint.
#[derive(Clone)]
pub struct ChainClient {
    rpc_url: url::Url,
    config: BlockchainConfig,
}

impl ChainClient {
    pub fn new(config: BlockchainConfig) -> GatewayResult<Self> {
        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| {
            GatewayError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        Ok(Self { rpc_url, config })
    }

    /// Provider whose wallet filler signs with `signer`.
    pub fn signing_provider(&self, signer: PrivateKeySigner) -> DynProvider {
        ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.rpc_url.clone())
            .erased()
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self, provider: &DynProvider) -> GatewayResult<()> {
        let actual = provider.get_chain_id().await?;
        if actual != self.config.chain_id {
            return Err(GatewayError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .finish()
    }
}
