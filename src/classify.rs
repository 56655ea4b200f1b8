//! Failure classification for transaction delivery
//!
//! Upstream failures arrive as free text (RPC responses, wallet rejections,
//! socket errors), so classification is an ordered list of substring rules
//! tested against the lowercased text: first match wins. The order matters:
//! patterns overlap by design ("insufficient" appears in two rules,
//! distinguished by trailing context), so this stays a rule list, not a map.
//!
//! The resulting [`TxError`] is the single source of truth for what a
//! failure means. Raw transport or signer errors are never surfaced to
//! callers unclassified.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of delivery failure this client distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxErrorKind {
    /// The user (or their wallet) declined to sign.
    UserRejected,
    /// Not enough SOL to cover fees or rent.
    InsufficientSol,
    /// Not enough of the outcome token to cover the stake.
    InsufficientTokenBalance,
    /// The cited block reference expired before landing.
    BlockhashExpired,
    /// Signature creation or verification failed.
    SignatureFailed,
    /// The RPC endpoint rate-limited us.
    RateLimited,
    /// An operation exceeded its time budget.
    TimedOut,
    /// The network or endpoint is unreachable.
    NetworkUnreachable,
    /// Preflight simulation rejected the transaction.
    SimulationFailed,
    /// The on-chain program returned an error.
    ProgramError,
    /// Nothing matched; carry the raw text along.
    Unknown,
}

impl TxErrorKind {
    /// Whether retrying the same logical operation can succeed.
    ///
    /// True exactly for transient conditions: an expired block reference,
    /// rate limiting, a timeout, or an unreachable network.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            TxErrorKind::BlockhashExpired
                | TxErrorKind::RateLimited
                | TxErrorKind::TimedOut
                | TxErrorKind::NetworkUnreachable
        )
    }
}

/// A classified delivery failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxError {
    pub kind: TxErrorKind,
    /// Canonical, stable human message for the kind.
    pub message: String,
    /// The condition may clear on its own (same set as retryable here).
    pub recoverable: bool,
    /// The delivery engine may retry on this error.
    pub retryable: bool,
    /// Raw upstream text, kept for diagnostics.
    pub cause: Option<String>,
}

impl TxError {
    pub fn new(kind: TxErrorKind, message: impl Into<String>) -> Self {
        let retryable = kind.is_retryable();
        Self {
            kind,
            message: message.into(),
            recoverable: retryable,
            retryable,
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " ({cause})")?;
        }
        Ok(())
    }
}

impl std::error::Error for TxError {}

struct Rule {
    patterns: &'static [&'static str],
    kind: TxErrorKind,
    message: &'static str,
}

/// Ordered rule list. First match wins; order is load-bearing.
const RULES: &[Rule] = &[
    Rule {
        patterns: &["user rejected", "user denied", "rejected the request", "approval denied"],
        kind: TxErrorKind::UserRejected,
        message: "Transaction was rejected by the user",
    },
    Rule {
        // Base-currency shortfalls mention lamports/funds; token shortfalls
        // mention balance. Best-effort heuristic over upstream text.
        patterns: &["insufficient lamports", "insufficient funds", "insufficient sol"],
        kind: TxErrorKind::InsufficientSol,
        message: "Insufficient SOL to pay for this transaction",
    },
    Rule {
        patterns: &["insufficient token", "insufficient balance", "balance too low"],
        kind: TxErrorKind::InsufficientTokenBalance,
        message: "Insufficient token balance for this bet",
    },
    Rule {
        patterns: &[
            "blockhash not found",
            "blockhash expired",
            "block height exceeded",
            "transaction expired",
        ],
        kind: TxErrorKind::BlockhashExpired,
        message: "Block reference expired before the transaction landed",
    },
    Rule {
        patterns: &["signature verification", "signature failed", "missing signature"],
        kind: TxErrorKind::SignatureFailed,
        message: "Transaction signing failed",
    },
    Rule {
        patterns: &["429", "too many requests", "rate limit"],
        kind: TxErrorKind::RateLimited,
        message: "Rate limited by the RPC endpoint",
    },
    Rule {
        patterns: &["timed out", "timeout"],
        kind: TxErrorKind::TimedOut,
        message: "Operation timed out",
    },
    Rule {
        patterns: &[
            "failed to fetch",
            "connection refused",
            "connection reset",
            "network",
            "unreachable",
            "dns error",
        ],
        kind: TxErrorKind::NetworkUnreachable,
        message: "Network is unreachable",
    },
    Rule {
        patterns: &["simulation failed", "transaction simulation"],
        kind: TxErrorKind::SimulationFailed,
        message: "Transaction simulation failed",
    },
    Rule {
        patterns: &["custom program error", "program failed", "instruction error"],
        kind: TxErrorKind::ProgramError,
        message: "The on-chain program rejected the transaction",
    },
];

/// Map a raw failure description to its taxonomy entry.
///
/// Pure; independently testable without a transport.
pub fn classify(raw: &str) -> TxError {
    let lowered = raw.to_lowercase();
    for rule in RULES {
        if rule.patterns.iter().any(|p| lowered.contains(p)) {
            return TxError::new(rule.kind, rule.message).with_cause(raw);
        }
    }
    TxError::new(TxErrorKind::Unknown, "Transaction failed").with_cause(raw)
}
