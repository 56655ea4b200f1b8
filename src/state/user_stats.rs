//! Per-user aggregate statistics account

use crate::codec::{ByteReader, ByteWriter};
use crate::error::ClientResult;
use crate::state::strip_tag;
use crate::tags::account_tag;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Aggregated betting statistics, at PDA `["user_stats", user]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user: Pubkey,
    pub total_bets: u64,
    pub wins: u64,
    pub losses: u64,
    pub total_wagered: u64,
    pub total_won: u64,
    pub total_lost: u64,
    /// Net profit; negative when under water.
    pub net_profit: i64,
    pub events_created: u64,
    pub first_bet_at: Option<i64>,
    pub last_bet_at: Option<i64>,
    /// Positive = consecutive wins, negative = consecutive losses.
    pub current_streak: i64,
    pub best_streak: u64,
    pub worst_streak: u64,
    pub bump: u8,
}

impl UserStats {
    pub const ACCOUNT_NAME: &'static str = "UserStats";

    pub fn tag() -> [u8; 8] {
        account_tag(Self::ACCOUNT_NAME)
    }

    /// Decode from raw account bytes (tag included).
    pub fn decode(data: &[u8]) -> ClientResult<Self> {
        let mut r = ByteReader::new(strip_tag(data)?);
        Ok(Self {
            user: r.read_pubkey()?,
            total_bets: r.read_u64()?,
            wins: r.read_u64()?,
            losses: r.read_u64()?,
            total_wagered: r.read_u64()?,
            total_won: r.read_u64()?,
            total_lost: r.read_u64()?,
            net_profit: r.read_i64()?,
            events_created: r.read_u64()?,
            first_bet_at: r.read_option(|r| r.read_i64())?,
            last_bet_at: r.read_option(|r| r.read_i64())?,
            current_streak: r.read_i64()?,
            best_streak: r.read_u64()?,
            worst_streak: r.read_u64()?,
            bump: r.read_u8()?,
        })
    }

    /// Encode to wire bytes (tag included).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(160);
        w.put_bytes(&Self::tag());
        w.put_pubkey(&self.user);
        w.put_u64(self.total_bets);
        w.put_u64(self.wins);
        w.put_u64(self.losses);
        w.put_u64(self.total_wagered);
        w.put_u64(self.total_won);
        w.put_u64(self.total_lost);
        w.put_i64(self.net_profit);
        w.put_u64(self.events_created);
        w.put_option(self.first_bet_at, |w, t| w.put_i64(t));
        w.put_option(self.last_bet_at, |w, t| w.put_i64(t));
        w.put_i64(self.current_streak);
        w.put_u64(self.best_streak);
        w.put_u64(self.worst_streak);
        w.put_u8(self.bump);
        w.into_bytes()
    }

    /// Win rate in basis points (0..=10000).
    pub fn win_rate_bps(&self) -> u64 {
        if self.total_bets == 0 {
            return 0;
        }
        (self.wins as u128 * 10_000 / self.total_bets as u128) as u64
    }
}
