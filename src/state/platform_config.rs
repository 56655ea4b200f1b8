//! Singleton platform configuration account

use crate::codec::{ByteReader, ByteWriter};
use crate::error::ClientResult;
use crate::state::strip_tag;
use crate::tags::account_tag;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Global platform configuration.
///
/// One per deployment, at PDA `["platform_config"]`. Mutated only by the
/// on-chain program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Admin authority (can update config and cancel events).
    pub authority: Pubkey,
    /// Oracle authority (can resolve events).
    pub oracle: Pubkey,
    /// Mint of the DOOM token.
    pub doom_mint: Pubkey,
    /// Mint of the LIFE token.
    pub life_mint: Pubkey,
    /// Platform fee in basis points (200 = 2%).
    pub fee_basis_points: u16,
    /// Whether the platform is paused.
    pub paused: bool,
    /// Cumulative fees collected, per token.
    pub total_doom_fees: u64,
    pub total_life_fees: u64,
    /// Cumulative counters.
    pub total_events: u64,
    pub total_bets: u64,
    /// PDA bump.
    pub bump: u8,
}

impl PlatformConfig {
    pub const ACCOUNT_NAME: &'static str = "PlatformConfig";

    pub fn tag() -> [u8; 8] {
        account_tag(Self::ACCOUNT_NAME)
    }

    /// Decode from raw account bytes (tag included).
    pub fn decode(data: &[u8]) -> ClientResult<Self> {
        let mut r = ByteReader::new(strip_tag(data)?);
        Ok(Self {
            authority: r.read_pubkey()?,
            oracle: r.read_pubkey()?,
            doom_mint: r.read_pubkey()?,
            life_mint: r.read_pubkey()?,
            fee_basis_points: r.read_u16()?,
            paused: r.read_bool()?,
            total_doom_fees: r.read_u64()?,
            total_life_fees: r.read_u64()?,
            total_events: r.read_u64()?,
            total_bets: r.read_u64()?,
            bump: r.read_u8()?,
        })
    }

    /// Encode to wire bytes (tag included).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(180);
        w.put_bytes(&Self::tag());
        w.put_pubkey(&self.authority);
        w.put_pubkey(&self.oracle);
        w.put_pubkey(&self.doom_mint);
        w.put_pubkey(&self.life_mint);
        w.put_u16(self.fee_basis_points);
        w.put_bool(self.paused);
        w.put_u64(self.total_doom_fees);
        w.put_u64(self.total_life_fees);
        w.put_u64(self.total_events);
        w.put_u64(self.total_bets);
        w.put_u8(self.bump);
        w.into_bytes()
    }

    /// Fee on `amount` at the configured rate, rounded down.
    pub fn fee_for(&self, amount: u64) -> u64 {
        ((amount as u128 * self.fee_basis_points as u128) / 10_000) as u64
    }
}
