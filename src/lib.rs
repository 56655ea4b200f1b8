//! Client-side integration layer for the Doomsday on-chain prediction
//! market.
//!
//! This crate speaks the program's byte-exact wire format and nothing else:
//! it derives program-owned addresses, encodes instructions, decodes
//! account records, estimates pari-mutuel payouts, and delivers
//! transactions with classified-error retry. Signing and the network
//! protocol live behind the [`signer::TransactionSigner`] and
//! [`transport::LedgerTransport`] seams.

pub mod classify;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod instructions;
pub mod logging;
pub mod payout;
pub mod pda;
pub mod sender;
pub mod signer;
pub mod state;
pub mod tags;
pub mod transport;

pub use classify::{classify, TxError, TxErrorKind};
pub use client::MarketClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use payout::{estimate_payout, PayoutEstimate};
pub use sender::{RetryPolicy, TransactionOutcome, TransactionSender, TxStatus};
pub use state::{EventStatus, Outcome, PlatformConfig, PredictionEvent, UserBet, UserStats};

// Re-export commonly used types
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
