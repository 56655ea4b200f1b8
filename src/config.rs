//! Client configuration
//!
//! Loaded from a TOML file with sensible defaults. There is no ambient
//! singleton: the parsed config is handed to
//! [`crate::client::MarketClient`] explicitly.

use crate::error::{ClientError, ClientResult};
use crate::sender::RetryPolicy;
use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::str::FromStr;

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Prediction-market program id, base58.
    pub program_id: String,

    /// RPC endpoint configuration.
    pub rpc: RpcConfig,

    /// Delivery retry policy.
    #[serde(default)]
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL.
    pub url: String,

    /// Commitment level: "processed", "confirmed" or "finalized".
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Confirmation wait budget in seconds.
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}
fn default_confirm_timeout() -> u64 {
    60
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse the configured program id.
    pub fn program_id(&self) -> ClientResult<Pubkey> {
        Pubkey::from_str(&self.program_id)
            .map_err(|e| ClientError::Configuration(format!("invalid program id: {e}")))
    }

    /// Parse the configured commitment level.
    pub fn commitment(&self) -> ClientResult<CommitmentConfig> {
        match self.rpc.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(ClientError::Configuration(format!(
                "unknown commitment level: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml_with_defaults() {
        let toml = r#"
            program_id = "BMmGykphijTgvB7WMim9UVqi9976iibKf6uYAiGXC7Mc"

            [rpc]
            url = "https://api.devnet.solana.com"
        "#;
        let config: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.rpc.commitment, "confirmed");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay_ms, 1_000);
        assert!(config.program_id().is_ok());
        assert!(config.commitment().is_ok());
    }

    #[test]
    fn rejects_bad_program_id_and_commitment() {
        let toml = r#"
            program_id = "not-a-key"

            [rpc]
            url = "http://localhost:8899"
            commitment = "hopeful"
        "#;
        let config: ClientConfig = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.program_id(),
            Err(ClientError::Configuration(_))
        ));
        assert!(matches!(
            config.commitment(),
            Err(ClientError::Configuration(_))
        ));
    }
}
