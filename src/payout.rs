//! Pari-mutuel payout estimation
//!
//! Pure arithmetic over pool snapshots; no I/O. Mirrors the on-chain payout
//! math so the UI can show what a stake would return before it is placed.
//! Intermediates are u128, so u64 pools and stakes cannot overflow.

use crate::state::Outcome;
use serde::{Deserialize, Serialize};

/// Estimated result of placing `stake` on one side of a market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutEstimate {
    /// Stake plus net winnings.
    pub total_payout: u64,
    /// Proportional share of the losing pool, before fees.
    pub share: u64,
    /// Platform fee taken from the share.
    pub fee: u64,
    /// Share minus fee.
    pub net_winnings: u64,
    /// Implied probability of the staked outcome, in percent.
    pub implied_odds_pct: f64,
}

/// Estimate the payout for a new stake, as if it were added to the pools now.
///
/// The winning pool is the staked outcome's existing pool plus the new
/// stake; the losing pool is the other side unchanged. The stake's share of
/// the losing pool is `stake / winning_pool * losing_pool`; the fee is
/// `share * fee_basis_points / 10_000`. With no opposing stake the bet just
/// returns itself: payout equals the stake, fee zero.
pub fn estimate_payout(
    stake: u64,
    outcome: Outcome,
    doom_pool: u64,
    life_pool: u64,
    fee_basis_points: u16,
) -> PayoutEstimate {
    let (existing_winning, losing_pool) = match outcome {
        Outcome::Doom => (doom_pool, life_pool),
        Outcome::Life => (life_pool, doom_pool),
    };
    let winning_pool = existing_winning.saturating_add(stake);

    let implied_odds_pct = {
        let total = winning_pool as u128 + losing_pool as u128;
        if total == 0 {
            50.0
        } else {
            winning_pool as f64 / total as f64 * 100.0
        }
    };

    if winning_pool == 0 || losing_pool == 0 {
        return PayoutEstimate {
            total_payout: stake,
            share: 0,
            fee: 0,
            net_winnings: 0,
            implied_odds_pct,
        };
    }

    let share = (stake as u128 * losing_pool as u128 / winning_pool as u128) as u64;
    let fee = (share as u128 * fee_basis_points as u128 / 10_000) as u64;
    // The program rejects rates above 10_000 bps, but this function takes an
    // arbitrary u16; a fee exceeding the share clamps to zero winnings.
    let net_winnings = share.saturating_sub(fee);
    let total_payout = stake.saturating_add(net_winnings);

    PayoutEstimate {
        total_payout,
        share,
        fee,
        net_winnings,
        implied_odds_pct,
    }
}
