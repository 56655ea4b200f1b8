//! Crate-level error types for decode and fetch paths
//!
//! Delivery failures have their own classified type (`classify::TxError`);
//! this module covers everything that is fatal and never retried, most
//! importantly malformed on-chain account data.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Errors surfaced by decoding, derivation and account-fetch paths.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Stored account bytes do not match the expected layout.
    ///
    /// Always fatal: retrying a decode does not change stored bytes.
    #[error("Malformed account data: {0}")]
    MalformedAccount(String),

    /// An account that the caller expected to exist is absent.
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Transport-level failure while fetching account state.
    #[error("Transport error: {0}")]
    Transport(#[from] anyhow::Error),

    /// Configuration errors (bad program id, bad commitment string, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
