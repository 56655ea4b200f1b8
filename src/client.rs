//! High-level market client
//!
//! Bundles program id, transport, signer and retry policy into one
//! explicitly-passed session object (no globals) and exposes one method per
//! program operation plus typed account reads. Write methods return the
//! delivery engine's [`TransactionOutcome`]; read methods return decoded
//! records or a fatal decode error.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::instructions::{self, CreateEventArgs};
use crate::pda;
use crate::sender::{RetryPolicy, StatusSender, TransactionOutcome, TransactionSender};
use crate::signer::TransactionSigner;
use crate::state::{Outcome, PlatformConfig, PredictionEvent, UserBet, UserStats};
use crate::transport::{LedgerTransport, RpcTransport};
use std::sync::Arc;
use std::time::Duration;

/// Client session for one program deployment.
pub struct MarketClient {
    program_id: solana_sdk::pubkey::Pubkey,
    transport: Arc<dyn LedgerTransport>,
    signer: Option<Arc<dyn TransactionSigner>>,
    sender: TransactionSender,
}

impl MarketClient {
    /// Build a client over an arbitrary transport (tests use mocks here).
    pub fn new(
        program_id: solana_sdk::pubkey::Pubkey,
        transport: Arc<dyn LedgerTransport>,
        signer: Option<Arc<dyn TransactionSigner>>,
        retry: RetryPolicy,
    ) -> Self {
        let sender = TransactionSender::new(transport.clone(), signer.clone(), retry);
        Self {
            program_id,
            transport,
            signer,
            sender,
        }
    }

    /// Build a client from configuration, over a live RPC transport.
    pub fn from_config(
        config: &ClientConfig,
        signer: Option<Arc<dyn TransactionSigner>>,
    ) -> ClientResult<Self> {
        let transport = RpcTransport::with_commitment(&config.rpc.url, config.commitment()?)
            .confirm_timeout(Duration::from_secs(config.rpc.confirm_timeout_secs));
        Ok(Self::new(
            config.program_id()?,
            Arc::new(transport),
            signer,
            config.retry.clone(),
        ))
    }

    pub fn program_id(&self) -> solana_sdk::pubkey::Pubkey {
        self.program_id
    }

    fn signer_pubkey(&self) -> Option<solana_sdk::pubkey::Pubkey> {
        self.signer.as_ref().map(|s| s.pubkey())
    }

    // ------------------------------------------------------------------
    // Write operations
    // ------------------------------------------------------------------

    /// Stake `amount` minor units on `outcome` of event `event_id`.
    ///
    /// `user_token_account` must hold the chosen outcome's token.
    pub async fn place_bet(
        &self,
        event_id: u64,
        outcome: Outcome,
        amount: u64,
        user_token_account: &solana_sdk::pubkey::Pubkey,
        status_tx: Option<&StatusSender>,
    ) -> TransactionOutcome {
        match self.signer_pubkey() {
            Some(user) => {
                let ix = instructions::place_bet(
                    &self.program_id,
                    &user,
                    user_token_account,
                    event_id,
                    outcome,
                    amount,
                );
                self.sender.send(&[ix], status_tx).await
            }
            None => self.sender.send(&[], status_tx).await,
        }
    }

    /// Claim winnings for a resolved event the caller bet on.
    pub async fn claim_winnings(
        &self,
        event_id: u64,
        bet_outcome: Outcome,
        user_token_account: &solana_sdk::pubkey::Pubkey,
        status_tx: Option<&StatusSender>,
    ) -> TransactionOutcome {
        match self.signer_pubkey() {
            Some(user) => {
                let ix = instructions::claim_winnings(
                    &self.program_id,
                    &user,
                    user_token_account,
                    event_id,
                    bet_outcome,
                );
                self.sender.send(&[ix], status_tx).await
            }
            None => self.sender.send(&[], status_tx).await,
        }
    }

    /// Reclaim the stake of a bet on a cancelled event.
    pub async fn refund_bet(
        &self,
        event_id: u64,
        bet_outcome: Outcome,
        user_token_account: &solana_sdk::pubkey::Pubkey,
        status_tx: Option<&StatusSender>,
    ) -> TransactionOutcome {
        match self.signer_pubkey() {
            Some(user) => {
                let ix = instructions::refund_bet(
                    &self.program_id,
                    &user,
                    user_token_account,
                    event_id,
                    bet_outcome,
                );
                self.sender.send(&[ix], status_tx).await
            }
            None => self.sender.send(&[], status_tx).await,
        }
    }

    /// Create a new prediction event with the caller as creator.
    pub async fn create_event(
        &self,
        args: &CreateEventArgs,
        status_tx: Option<&StatusSender>,
    ) -> TransactionOutcome {
        match self.signer_pubkey() {
            Some(creator) => {
                let ix = instructions::create_event(&self.program_id, &creator, args);
                self.sender.send(&[ix], status_tx).await
            }
            None => self.sender.send(&[], status_tx).await,
        }
    }

    /// Resolve an event (the signer must be the platform oracle).
    pub async fn resolve_event(
        &self,
        event_id: u64,
        outcome: Outcome,
        status_tx: Option<&StatusSender>,
    ) -> TransactionOutcome {
        match self.signer_pubkey() {
            Some(oracle) => {
                let ix =
                    instructions::resolve_event(&self.program_id, &oracle, event_id, outcome);
                self.sender.send(&[ix], status_tx).await
            }
            None => self.sender.send(&[], status_tx).await,
        }
    }

    /// Cancel an event (the signer must be the platform authority).
    pub async fn cancel_event(
        &self,
        event_id: u64,
        status_tx: Option<&StatusSender>,
    ) -> TransactionOutcome {
        match self.signer_pubkey() {
            Some(authority) => {
                let ix = instructions::cancel_event(&self.program_id, &authority, event_id);
                self.sender.send(&[ix], status_tx).await
            }
            None => self.sender.send(&[], status_tx).await,
        }
    }

    // ------------------------------------------------------------------
    // Typed reads
    // ------------------------------------------------------------------

    /// Fetch and decode the platform configuration, if initialized.
    pub async fn fetch_platform_config(&self) -> ClientResult<Option<PlatformConfig>> {
        let (address, _) = pda::platform_config_address(&self.program_id);
        self.fetch_and_decode(&address, PlatformConfig::decode).await
    }

    /// Fetch and decode one event by id.
    pub async fn fetch_event(&self, event_id: u64) -> ClientResult<Option<PredictionEvent>> {
        let (address, _) = pda::event_address(&self.program_id, event_id);
        self.fetch_and_decode(&address, PredictionEvent::decode).await
    }

    /// Fetch and decode a user's bet on one event.
    pub async fn fetch_user_bet(
        &self,
        event_id: u64,
        user: &solana_sdk::pubkey::Pubkey,
    ) -> ClientResult<Option<UserBet>> {
        let (event, _) = pda::event_address(&self.program_id, event_id);
        let (address, _) = pda::user_bet_address(&self.program_id, &event, user);
        self.fetch_and_decode(&address, UserBet::decode).await
    }

    /// Fetch and decode a user's aggregate stats.
    pub async fn fetch_user_stats(
        &self,
        user: &solana_sdk::pubkey::Pubkey,
    ) -> ClientResult<Option<UserStats>> {
        let (address, _) = pda::user_stats_address(&self.program_id, user);
        self.fetch_and_decode(&address, UserStats::decode).await
    }

    async fn fetch_and_decode<T>(
        &self,
        address: &solana_sdk::pubkey::Pubkey,
        decode: impl FnOnce(&[u8]) -> ClientResult<T>,
    ) -> ClientResult<Option<T>> {
        match self.transport.fetch_account_bytes(address).await {
            Ok(Some(bytes)) => decode(&bytes).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(ClientError::Transport(e)),
        }
    }
}
