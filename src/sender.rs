//! Transaction delivery engine
//!
//! Orchestrates sign → submit → confirm through the signer and transport
//! seams, with classified-error retry:
//!
//! ```text
//! pending → signing → sending → confirming → confirmed
//!                └─────────┴──────────┴────→ failed
//! ```
//!
//! Every attempt fetches a fresh block reference and a fresh signature;
//! re-submitting a stale reference is the main way transactions expire.
//! Failures run through [`classify`]; retryable ones back off exponentially
//! (`min(base * 2^attempt, cap)`), everything else fails fast with the
//! classified error attached. Retries are sequential: one attempt in flight
//! per call, each call owning its own counter and buffers.

use crate::classify::{classify, TxError, TxErrorKind};
use crate::signer::TransactionSigner;
use crate::transport::LedgerTransport;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::{instruction::Instruction, signature::Signature, transaction::Transaction};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Delivery state, reported at every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Signing,
    Sending,
    Confirming,
    Confirmed,
    Failed,
}

/// Final result of one delivery attempt sequence. Immutable once returned.
#[derive(Debug, Clone)]
pub struct TransactionOutcome {
    pub success: bool,
    pub signature: Option<Signature>,
    pub error: Option<TxError>,
    pub status: TxStatus,
}

impl TransactionOutcome {
    fn confirmed(signature: Signature) -> Self {
        Self {
            success: true,
            signature: Some(signature),
            error: None,
            status: TxStatus::Confirmed,
        }
    }

    fn failed(error: TxError) -> Self {
        Self {
            success: false,
            signature: None,
            error: Some(error),
            status: TxStatus::Failed,
        }
    }
}

/// Retry budget and backoff shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum delivery attempts, including the first.
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,
    /// Backoff cap in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    /// `min(base * 2^attempt, cap)`, exact; callers and tests rely on the
    /// deterministic schedule.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = 2u64.saturating_pow(attempt);
        let delay_ms = self.base_delay_ms.saturating_mul(exp).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// Optional channel for observing status transitions.
pub type StatusSender = mpsc::UnboundedSender<TxStatus>;

fn notify(status_tx: Option<&StatusSender>, status: TxStatus) {
    if let Some(tx) = status_tx {
        // Receiver may have gone away; delivery proceeds regardless.
        let _ = tx.send(status);
    }
}

/// Signs, submits and confirms transactions with retry.
///
/// Holds no shared mutable state: concurrent `send` calls are independent.
pub struct TransactionSender {
    transport: Arc<dyn LedgerTransport>,
    signer: Option<Arc<dyn TransactionSigner>>,
    policy: RetryPolicy,
}

impl TransactionSender {
    pub fn new(
        transport: Arc<dyn LedgerTransport>,
        signer: Option<Arc<dyn TransactionSigner>>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            signer,
            policy,
        }
    }

    /// Deliver `instructions` as one transaction, retrying on transient
    /// failures up to the policy budget.
    ///
    /// Never returns an unclassified failure: the outcome always carries the
    /// last concrete classified error, even when the budget is exhausted.
    pub async fn send(
        &self,
        instructions: &[Instruction],
        status_tx: Option<&StatusSender>,
    ) -> TransactionOutcome {
        notify(status_tx, TxStatus::Pending);

        let Some(signer) = &self.signer else {
            // No signing identity: fail before any network call, non-retryable.
            let err = TxError::new(
                TxErrorKind::UserRejected,
                "No signer connected; connect a wallet first",
            );
            notify(status_tx, TxStatus::Failed);
            return TransactionOutcome::failed(err);
        };

        let mut last_error: Option<TxError> = None;
        for attempt in 0..self.policy.max_attempts {
            match self.attempt_once(signer, instructions, status_tx).await {
                Ok(signature) => {
                    info!(%signature, attempt = attempt + 1, "transaction confirmed");
                    notify(status_tx, TxStatus::Confirmed);
                    return TransactionOutcome::confirmed(signature);
                }
                Err(e) => {
                    // {:#} flattens the anyhow context chain so the rule
                    // patterns see the root cause text.
                    let err = classify(&format!("{e:#}"));
                    let attempts_left = attempt + 1 < self.policy.max_attempts;
                    if err.retryable && attempts_left {
                        let delay = self.policy.backoff_delay(attempt);
                        warn!(
                            attempt = attempt + 1,
                            kind = ?err.kind,
                            backoff_ms = delay.as_millis() as u64,
                            "transient delivery failure, backing off before retry"
                        );
                        last_error = Some(err);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    warn!(
                        attempt = attempt + 1,
                        kind = ?err.kind,
                        retryable = err.retryable,
                        "delivery failed"
                    );
                    notify(status_tx, TxStatus::Failed);
                    return TransactionOutcome::failed(err);
                }
            }
        }

        notify(status_tx, TxStatus::Failed);
        TransactionOutcome::failed(last_error.unwrap_or_else(|| {
            TxError::new(TxErrorKind::Unknown, "Retry budget exhausted")
        }))
    }

    async fn attempt_once(
        &self,
        signer: &Arc<dyn TransactionSigner>,
        instructions: &[Instruction],
        status_tx: Option<&StatusSender>,
    ) -> Result<Signature> {
        notify(status_tx, TxStatus::Signing);
        let block_ref = self.transport.fetch_recent_blockhash().await?;
        debug!(blockhash = %block_ref.blockhash, "signing against fresh block reference");

        let mut tx = Transaction::new_with_payer(instructions, Some(&signer.pubkey()));
        signer.sign(&mut tx, block_ref.blockhash).await?;

        notify(status_tx, TxStatus::Sending);
        let bytes = bincode::serialize(&tx).context("failed to serialize transaction")?;
        let signature = self.transport.submit_raw(&bytes).await?;

        notify(status_tx, TxStatus::Confirming);
        self.transport.confirm(&signature).await?;
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::KeypairSigner;
    use crate::transport::BlockRef;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use solana_sdk::{
        hash::Hash, pubkey::Pubkey, signature::Keypair, system_instruction,
    };
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Scripted transport: each submission pops the next scripted result;
    /// once the script is empty, submissions succeed.
    struct MockTransport {
        submit_script: Mutex<VecDeque<Result<(), String>>>,
        submissions: AtomicU32,
        blockhash_fetches: AtomicU32,
    }

    impl MockTransport {
        fn new(script: Vec<Result<(), String>>) -> Self {
            Self {
                submit_script: Mutex::new(script.into()),
                submissions: AtomicU32::new(0),
                blockhash_fetches: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LedgerTransport for MockTransport {
        async fn fetch_recent_blockhash(&self) -> Result<BlockRef> {
            self.blockhash_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(BlockRef {
                blockhash: Hash::new_unique(),
                last_valid_block_height: 100,
            })
        }

        async fn submit_raw(&self, _bytes: &[u8]) -> Result<Signature> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            match self.submit_script.lock().unwrap().pop_front() {
                Some(Err(text)) => Err(anyhow!(text)),
                _ => Ok(Signature::default()),
            }
        }

        async fn confirm(&self, _signature: &Signature) -> Result<()> {
            Ok(())
        }

        async fn fetch_account_bytes(&self, _address: &Pubkey) -> Result<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    fn sender_with(
        transport: Arc<MockTransport>,
        max_attempts: u32,
    ) -> (TransactionSender, Pubkey) {
        let signer = KeypairSigner::from_keypair(Keypair::new());
        let payer = signer.pubkey();
        let sender = TransactionSender::new(
            transport,
            Some(Arc::new(signer)),
            RetryPolicy {
                max_attempts,
                base_delay_ms: 1_000,
                max_delay_ms: 10_000,
            },
        );
        (sender, payer)
    }

    fn transfer_ix(payer: &Pubkey) -> Instruction {
        system_instruction::transfer(payer, &Pubkey::new_unique(), 1)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TxStatus>) -> Vec<TxStatus> {
        let mut out = Vec::new();
        while let Ok(status) = rx.try_recv() {
            out.push(status);
        }
        out
    }

    #[test]
    fn backoff_schedule_is_exact_and_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 1_000,
            max_delay_ms: 10_000,
        };
        let delays: Vec<u64> = (0..5)
            .map(|a| policy.backoff_delay(a).as_millis() as u64)
            .collect();
        assert_eq!(delays, [1_000, 2_000, 4_000, 8_000, 10_000]);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_expired_blockhash_then_succeeds() {
        let transport = Arc::new(MockTransport::new(vec![Err(
            "blockhash expired".to_string()
        )]));
        let (sender, payer) = sender_with(transport.clone(), 2);
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();

        let outcome = sender
            .send(&[transfer_ix(&payer)], Some(&status_tx))
            .await;

        assert!(outcome.success);
        assert!(outcome.signature.is_some());
        assert_eq!(outcome.status, TxStatus::Confirmed);
        assert_eq!(transport.submissions.load(Ordering::SeqCst), 2);
        // One fresh block reference per attempt.
        assert_eq!(transport.blockhash_fetches.load(Ordering::SeqCst), 2);

        let statuses = drain(&mut status_rx);
        for expected in [
            TxStatus::Pending,
            TxStatus::Signing,
            TxStatus::Sending,
            TxStatus::Confirming,
            TxStatus::Confirmed,
        ] {
            assert!(statuses.contains(&expected), "missing {expected:?}");
        }
    }

    #[tokio::test]
    async fn user_rejection_is_not_retried() {
        let transport = Arc::new(MockTransport::new(vec![
            Err("user rejected the request".to_string()),
            Err("user rejected the request".to_string()),
        ]));
        let (sender, payer) = sender_with(transport.clone(), 3);

        let outcome = sender.send(&[transfer_ix(&payer)], None).await;

        assert!(!outcome.success);
        assert_eq!(outcome.status, TxStatus::Failed);
        assert_eq!(outcome.error.as_ref().unwrap().kind, TxErrorKind::UserRejected);
        assert_eq!(transport.submissions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_budget_returns_last_classified_error() {
        let transport = Arc::new(MockTransport::new(vec![
            Err("blockhash expired".to_string()),
            Err("blockhash expired".to_string()),
        ]));
        let (sender, payer) = sender_with(transport.clone(), 2);

        let outcome = sender.send(&[transfer_ix(&payer)], None).await;

        assert!(!outcome.success);
        assert_eq!(transport.submissions.load(Ordering::SeqCst), 2);
        let err = outcome.error.unwrap();
        assert_eq!(err.kind, TxErrorKind::BlockhashExpired);
        assert!(err.cause.is_some());
    }

    #[tokio::test]
    async fn missing_signer_fails_before_any_network_call() {
        let transport = Arc::new(MockTransport::new(vec![]));
        let sender =
            TransactionSender::new(transport.clone(), None, RetryPolicy::default());
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();

        let payer = Pubkey::new_unique();
        let outcome = sender
            .send(&[transfer_ix(&payer)], Some(&status_tx))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.error.as_ref().unwrap().kind, TxErrorKind::UserRejected);
        assert_eq!(transport.submissions.load(Ordering::SeqCst), 0);
        assert_eq!(transport.blockhash_fetches.load(Ordering::SeqCst), 0);
        assert_eq!(drain(&mut status_rx), vec![TxStatus::Pending, TxStatus::Failed]);
    }
}
