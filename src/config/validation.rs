//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and address/URL formats
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("blockchain.rpc_url '{0}' is not a valid URL")]
    InvalidRpcUrl(String),

    #[error("contract.address '{0}' is not a valid address")]
    InvalidContractAddress(String),

    #[error("contract.address must not be the zero address")]
    ZeroContractAddress,

    #[error("wallet.private_key_env must not be empty")]
    EmptyKeyVariable,

    #[error("gateway.read_concurrency must be at least 1")]
    ZeroReadConcurrency,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("observability.metrics_file must be set when metrics are enabled")]
    EmptyMetricsFile,
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.blockchain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidRpcUrl(config.blockchain.rpc_url.clone()));
    }

    match config.contract.address.parse::<Address>() {
        Ok(address) if address.is_zero() => errors.push(ValidationError::ZeroContractAddress),
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::InvalidContractAddress(
            config.contract.address.clone(),
        )),
    }

    if config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError::EmptyKeyVariable);
    }

    if config.gateway.read_concurrency == 0 {
        errors.push(ValidationError::ZeroReadConcurrency);
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled && config.observability.metrics_file.trim().is_empty() {
        errors.push(ValidationError::EmptyMetricsFile);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
