//! Signer seam
//!
//! The delivery engine asks a [`TransactionSigner`] to sign and never
//! touches key material itself. [`KeypairSigner`] is the file-backed
//! implementation; wallet adapters and hardware signers plug in behind the
//! same trait and surface rejections as errors whose text classifies to
//! user-rejected.

use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::sync::Arc;

/// Signs transactions on behalf of one identity.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// The identity that pays for and signs transactions.
    fn pubkey(&self) -> Pubkey;

    /// Sign `tx` against `blockhash`. Failure text is classified by the
    /// delivery engine (a wallet rejection should read "user rejected ...").
    async fn sign(&self, tx: &mut Transaction, blockhash: Hash) -> Result<()>;
}

/// Local keypair signer backed by a Solana CLI keypair file.
pub struct KeypairSigner {
    keypair: Arc<Keypair>,
}

impl KeypairSigner {
    /// Load from a keypair file: raw 64 bytes or the CLI's JSON byte array.
    pub fn from_file(path: &str) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read keypair file: {path}"))?;
        let keypair = if bytes.len() == 64 {
            Keypair::try_from(bytes.as_slice()).context("invalid keypair bytes")?
        } else {
            let json: Vec<u8> =
                serde_json::from_slice(&bytes).context("failed to parse keypair JSON")?;
            if json.len() != 64 {
                anyhow::bail!("invalid keypair length: expected 64 bytes, got {}", json.len());
            }
            Keypair::try_from(json.as_slice()).context("invalid keypair from JSON")?
        };
        Ok(Self::from_keypair(keypair))
    }

    /// Load from a base58-encoded 64-byte secret key, the format wallet
    /// apps export.
    pub fn from_base58(encoded: &str) -> Result<Self> {
        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .context("invalid base58 secret key")?;
        if bytes.len() != 64 {
            anyhow::bail!("invalid secret key length: expected 64 bytes, got {}", bytes.len());
        }
        let keypair = Keypair::try_from(bytes.as_slice()).context("invalid keypair bytes")?;
        Ok(Self::from_keypair(keypair))
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }
}

#[async_trait]
impl TransactionSigner for KeypairSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign(&self, tx: &mut Transaction, blockhash: Hash) -> Result<()> {
        tx.try_sign(&[self.keypair.as_ref()], blockhash)
            .map_err(|e| anyhow::anyhow!("signature failed: {e}"))
    }
}
