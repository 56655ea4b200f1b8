//! Prediction event account

use crate::codec::{ByteReader, ByteWriter};
use crate::error::{ClientError, ClientResult};
use crate::state::{strip_tag, Outcome};
use crate::tags::account_tag;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Lifecycle of a prediction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    /// Accepting bets.
    Active,
    /// Resolved with a final outcome.
    Resolved,
    /// Cancelled; bets are refundable.
    Cancelled,
}

impl EventStatus {
    pub fn as_u8(self) -> u8 {
        match self {
            EventStatus::Active => 0,
            EventStatus::Resolved => 1,
            EventStatus::Cancelled => 2,
        }
    }

    pub fn from_u8(value: u8) -> ClientResult<Self> {
        match value {
            0 => Ok(EventStatus::Active),
            1 => Ok(EventStatus::Resolved),
            2 => Ok(EventStatus::Cancelled),
            other => Err(ClientError::MalformedAccount(format!(
                "invalid event status byte: {other}"
            ))),
        }
    }
}

/// One prediction market, at PDA `["event", event_id.to_le_bytes()]`.
///
/// A snapshot at fetch time; staleness is the caller's concern. Resolution
/// and cancellation happen exclusively on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionEvent {
    pub event_id: u64,
    pub creator: Pubkey,
    pub title: String,
    pub description: String,
    /// Unix timestamp when betting closes.
    pub deadline: i64,
    /// Unix timestamp by which the event must be resolved.
    pub resolution_deadline: i64,
    pub status: EventStatus,
    /// Final outcome, set once resolved.
    pub outcome: Option<Outcome>,
    /// Pool totals in token minor units, one per outcome.
    pub doom_pool: u64,
    pub life_pool: u64,
    pub total_bettors: u32,
    pub created_at: i64,
    pub resolved_at: Option<i64>,
    /// Per-outcome token vaults.
    pub doom_vault: Pubkey,
    pub life_vault: Pubkey,
    pub bump: u8,
    pub doom_vault_bump: u8,
    pub life_vault_bump: u8,
}

impl PredictionEvent {
    pub const ACCOUNT_NAME: &'static str = "PredictionEvent";

    pub fn tag() -> [u8; 8] {
        account_tag(Self::ACCOUNT_NAME)
    }

    /// Decode from raw account bytes (tag included).
    ///
    /// The two string fields shift every later offset, so this is a strict
    /// cursor walk in field order.
    pub fn decode(data: &[u8]) -> ClientResult<Self> {
        let mut r = ByteReader::new(strip_tag(data)?);
        Ok(Self {
            event_id: r.read_u64()?,
            creator: r.read_pubkey()?,
            title: r.read_string()?,
            description: r.read_string()?,
            deadline: r.read_i64()?,
            resolution_deadline: r.read_i64()?,
            status: EventStatus::from_u8(r.read_u8()?)?,
            outcome: r.read_option(|r| Outcome::from_u8(r.read_u8()?))?,
            doom_pool: r.read_u64()?,
            life_pool: r.read_u64()?,
            total_bettors: r.read_u32()?,
            created_at: r.read_i64()?,
            resolved_at: r.read_option(|r| r.read_i64())?,
            doom_vault: r.read_pubkey()?,
            life_vault: r.read_pubkey()?,
            bump: r.read_u8()?,
            doom_vault_bump: r.read_u8()?,
            life_vault_bump: r.read_u8()?,
        })
    }

    /// Encode to wire bytes (tag included).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(256 + self.title.len() + self.description.len());
        w.put_bytes(&Self::tag());
        w.put_u64(self.event_id);
        w.put_pubkey(&self.creator);
        w.put_string(&self.title);
        w.put_string(&self.description);
        w.put_i64(self.deadline);
        w.put_i64(self.resolution_deadline);
        w.put_u8(self.status.as_u8());
        w.put_option(self.outcome, |w, o| w.put_u8(o.as_u8()));
        w.put_u64(self.doom_pool);
        w.put_u64(self.life_pool);
        w.put_u32(self.total_bettors);
        w.put_i64(self.created_at);
        w.put_option(self.resolved_at, |w, t| w.put_i64(t));
        w.put_pubkey(&self.doom_vault);
        w.put_pubkey(&self.life_vault);
        w.put_u8(self.bump);
        w.put_u8(self.doom_vault_bump);
        w.put_u8(self.life_vault_bump);
        w.into_bytes()
    }

    /// Whether bets are still accepted at `current_time`.
    pub fn is_betting_open(&self, current_time: i64) -> bool {
        self.status == EventStatus::Active && current_time < self.deadline
    }

    pub fn pool_for(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Doom => self.doom_pool,
            Outcome::Life => self.life_pool,
        }
    }

    pub fn vault_for(&self, outcome: Outcome) -> Pubkey {
        match outcome {
            Outcome::Doom => self.doom_vault,
            Outcome::Life => self.life_vault,
        }
    }

    pub fn total_pool(&self) -> u64 {
        self.doom_pool.saturating_add(self.life_pool)
    }

    /// Implied odds for `outcome` in basis points of probability.
    ///
    /// 50% when no bets exist yet.
    pub fn implied_odds_bps(&self, outcome: Outcome) -> u64 {
        let total = self.total_pool();
        if total == 0 {
            return 5_000;
        }
        ((self.pool_for(outcome) as u128 * 10_000) / total as u128) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    fn sample() -> PredictionEvent {
        PredictionEvent {
            event_id: 7,
            creator: Pubkey::new_unique(),
            title: "Solar flare".to_string(),
            description: "X-class flare before the deadline".to_string(),
            deadline: 1_760_000_000,
            resolution_deadline: 1_760_086_400,
            status: EventStatus::Active,
            outcome: None,
            doom_pool: 500_000,
            life_pool: 1_500_000,
            total_bettors: 12,
            created_at: 1_750_000_000,
            resolved_at: None,
            doom_vault: Pubkey::new_unique(),
            life_vault: Pubkey::new_unique(),
            bump: 253,
            doom_vault_bump: 255,
            life_vault_bump: 251,
        }
    }

    #[test]
    fn round_trip_active_event() {
        let event = sample();
        assert_eq!(PredictionEvent::decode(&event.to_bytes()).unwrap(), event);
    }

    #[test]
    fn round_trip_resolved_event_with_optionals_present() {
        let mut event = sample();
        event.status = EventStatus::Resolved;
        event.outcome = Some(Outcome::Life);
        event.resolved_at = Some(1_760_000_100);
        assert_eq!(PredictionEvent::decode(&event.to_bytes()).unwrap(), event);
    }

    #[test]
    fn round_trip_empty_strings() {
        let mut event = sample();
        event.title = String::new();
        event.description = String::new();
        assert_eq!(PredictionEvent::decode(&event.to_bytes()).unwrap(), event);
    }

    #[test]
    fn decodes_padded_record_with_variable_length_fields() {
        // A 753-byte account image: 12-byte title, 40-byte description, both
        // optionals present, trailing allocation padding zeroed.
        let mut event = sample();
        event.title = "solar flares".to_string();
        event.description = "will an x-class flare hit earth in 2026?".to_string();
        event.status = EventStatus::Resolved;
        event.outcome = Some(Outcome::Doom);
        event.resolved_at = Some(1_760_000_200);
        assert_eq!(event.title.len(), 12);
        assert_eq!(event.description.len(), 40);

        let mut bytes = event.to_bytes();
        bytes.resize(753, 0);
        let decoded = PredictionEvent::decode(&bytes).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.outcome, Some(Outcome::Doom));
        assert_eq!(decoded.resolved_at, Some(1_760_000_200));
    }

    #[test]
    fn string_length_overrunning_slice_is_malformed() {
        let event = sample();
        let mut bytes = event.to_bytes();
        // Corrupt the title length prefix (offset 8 tag + 8 id + 32 creator).
        let title_len_at = 8 + 8 + 32;
        bytes[title_len_at..title_len_at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            PredictionEvent::decode(&bytes).unwrap_err(),
            ClientError::MalformedAccount(_)
        ));
    }

    #[test]
    fn short_buffer_is_malformed_not_panic() {
        let bytes = sample().to_bytes();
        for len in [0, 4, 8, 20, 60] {
            assert!(PredictionEvent::decode(&bytes[..len]).is_err());
        }
    }

    #[test]
    fn odds_helpers() {
        let event = sample();
        // 500k doom vs 1.5m life.
        assert_eq!(event.implied_odds_bps(Outcome::Doom), 2_500);
        assert_eq!(event.implied_odds_bps(Outcome::Life), 7_500);
        assert_eq!(event.total_pool(), 2_000_000);

        let mut empty = sample();
        empty.doom_pool = 0;
        empty.life_pool = 0;
        assert_eq!(empty.implied_odds_bps(Outcome::Doom), 5_000);
    }

    #[test]
    fn betting_window() {
        let event = sample();
        assert!(event.is_betting_open(event.deadline - 1));
        assert!(!event.is_betting_open(event.deadline));

        let mut cancelled = sample();
        cancelled.status = EventStatus::Cancelled;
        assert!(!cancelled.is_betting_open(0));
    }
}
