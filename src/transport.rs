//! Transport seam between this client and the ledger
//!
//! The delivery engine and the fetch helpers only ever talk to
//! [`LedgerTransport`]; the network protocol itself lives behind it.
//! [`RpcTransport`] is the production implementation over the nonblocking
//! Solana RPC client; tests substitute in-memory mocks.
//!
//! Errors cross this boundary as `anyhow::Error` so the free-text upstream
//! messages survive for classification.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use std::time::{Duration, Instant};
use tracing::debug;

/// A recent ledger checkpoint a transaction must cite, with its validity
/// horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Minimal ledger interface this client requires.
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Fetch a fresh block reference. Each delivery attempt calls this anew;
    /// stale references are a primary cause of expiry failures.
    async fn fetch_recent_blockhash(&self) -> Result<BlockRef>;

    /// Submit raw signed transaction bytes, returning the delivery id.
    async fn submit_raw(&self, bytes: &[u8]) -> Result<Signature>;

    /// Await confirmation of a delivery id. `Ok` means the transaction
    /// landed and succeeded; `Err` carries the failure text.
    async fn confirm(&self, signature: &Signature) -> Result<()>;

    /// Fetch an account's raw bytes, or `None` if the account is absent.
    async fn fetch_account_bytes(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;
}

/// Production transport over a Solana JSON-RPC endpoint.
pub struct RpcTransport {
    rpc: RpcClient,
    commitment: CommitmentConfig,
    confirm_poll_interval: Duration,
    confirm_timeout: Duration,
}

impl RpcTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_commitment(url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(url.into(), commitment),
            commitment,
            confirm_poll_interval: Duration::from_millis(500),
            confirm_timeout: Duration::from_secs(60),
        }
    }

    pub fn confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = timeout;
        self
    }
}

#[async_trait]
impl LedgerTransport for RpcTransport {
    async fn fetch_recent_blockhash(&self) -> Result<BlockRef> {
        let (blockhash, last_valid_block_height) = self
            .rpc
            .get_latest_blockhash_with_commitment(self.commitment)
            .await
            .context("failed to fetch recent blockhash")?;
        Ok(BlockRef {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn submit_raw(&self, bytes: &[u8]) -> Result<Signature> {
        let tx: Transaction =
            bincode::deserialize(bytes).context("submitted bytes are not a valid transaction")?;
        let signature = self
            .rpc
            .send_transaction_with_config(
                &tx,
                RpcSendTransactionConfig {
                    preflight_commitment: Some(self.commitment.commitment),
                    // The delivery engine owns retries.
                    max_retries: Some(0),
                    ..RpcSendTransactionConfig::default()
                },
            )
            .await?;
        debug!(%signature, "transaction submitted");
        Ok(signature)
    }

    async fn confirm(&self, signature: &Signature) -> Result<()> {
        let started = Instant::now();
        loop {
            if let Some(status) = self.rpc.get_signature_status(signature).await? {
                return status.map_err(|e| anyhow!("transaction failed on-chain: {e}"));
            }
            if started.elapsed() >= self.confirm_timeout {
                return Err(anyhow!(
                    "timed out waiting for confirmation of {signature}"
                ));
            }
            tokio::time::sleep(self.confirm_poll_interval).await;
        }
    }

    async fn fetch_account_bytes(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await
            .with_context(|| format!("failed to fetch account {address}"))?;
        Ok(response.value.map(|account| account.data))
    }
}
