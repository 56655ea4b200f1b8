//! Per-user bet record

use crate::codec::{ByteReader, ByteWriter};
use crate::error::ClientResult;
use crate::state::{strip_tag, Outcome};
use crate::tags::account_tag;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// One user's stake on one event, at PDA `["user_bet", event, user]`.
///
/// The program allows a single bet per (event, user) pair; this client
/// relies on that invariant rather than enforcing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBet {
    pub event: Pubkey,
    pub user: Pubkey,
    pub outcome: Outcome,
    /// Staked amount in token minor units.
    pub amount: u64,
    pub placed_at: i64,
    pub claimed: bool,
    pub refunded: bool,
    pub bump: u8,
}

impl UserBet {
    pub const ACCOUNT_NAME: &'static str = "UserBet";

    pub fn tag() -> [u8; 8] {
        account_tag(Self::ACCOUNT_NAME)
    }

    /// Decode from raw account bytes (tag included).
    pub fn decode(data: &[u8]) -> ClientResult<Self> {
        let mut r = ByteReader::new(strip_tag(data)?);
        Ok(Self {
            event: r.read_pubkey()?,
            user: r.read_pubkey()?,
            outcome: Outcome::from_u8(r.read_u8()?)?,
            amount: r.read_u64()?,
            placed_at: r.read_i64()?,
            claimed: r.read_bool()?,
            refunded: r.read_bool()?,
            bump: r.read_u8()?,
        })
    }

    /// Encode to wire bytes (tag included).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(96);
        w.put_bytes(&Self::tag());
        w.put_pubkey(&self.event);
        w.put_pubkey(&self.user);
        w.put_u8(self.outcome.as_u8());
        w.put_u64(self.amount);
        w.put_i64(self.placed_at);
        w.put_bool(self.claimed);
        w.put_bool(self.refunded);
        w.put_u8(self.bump);
        w.into_bytes()
    }

    /// Whether this bet won, given the event's resolved outcome.
    pub fn is_winner(&self, event_outcome: Option<Outcome>) -> bool {
        event_outcome == Some(self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserBet {
        UserBet {
            event: Pubkey::new_unique(),
            user: Pubkey::new_unique(),
            outcome: Outcome::Life,
            amount: 250_000,
            placed_at: 1_755_000_000,
            claimed: false,
            refunded: false,
            bump: 252,
        }
    }

    #[test]
    fn round_trip() {
        let bet = sample();
        assert_eq!(UserBet::decode(&bet.to_bytes()).unwrap(), bet);
    }

    #[test]
    fn round_trip_all_flags_set() {
        let mut bet = sample();
        bet.claimed = true;
        bet.refunded = true;
        bet.amount = 0;
        assert_eq!(UserBet::decode(&bet.to_bytes()).unwrap(), bet);
    }

    #[test]
    fn invalid_claimed_byte_is_malformed() {
        let mut bytes = sample().to_bytes();
        // claimed flag sits after tag(8) + event(32) + user(32) + outcome(1)
        // + amount(8) + placed_at(8).
        bytes[8 + 32 + 32 + 1 + 8 + 8] = 3;
        assert!(UserBet::decode(&bytes).is_err());
    }

    #[test]
    fn winner_check() {
        let bet = sample();
        assert!(bet.is_winner(Some(Outcome::Life)));
        assert!(!bet.is_winner(Some(Outcome::Doom)));
        assert!(!bet.is_winner(None));
    }
}
