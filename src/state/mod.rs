//! Typed views of the program's on-chain accounts
//!
//! Every record is a read-only projection of ledger state at fetch time:
//! this client decodes accounts, it never writes them. Each decoder takes
//! the full raw account bytes, strips the 8-byte account tag and applies a
//! fixed sequence of primitive reads in wire order. Trailing allocation
//! padding is ignored.
//!
//! Each type also encodes back to wire bytes (`to_bytes`), which is what the
//! round-trip tests and mock-transport fixtures are built on.

mod event;
mod platform_config;
mod user_bet;
mod user_stats;

pub use event::{EventStatus, PredictionEvent};
pub use platform_config::PlatformConfig;
pub use user_bet::UserBet;
pub use user_stats::UserStats;

use crate::error::{ClientError, ClientResult};
use crate::tags::TAG_LEN;
use serde::{Deserialize, Serialize};

/// The two sides of every market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Doom,
    Life,
}

impl Outcome {
    pub fn as_u8(self) -> u8 {
        match self {
            Outcome::Doom => 0,
            Outcome::Life => 1,
        }
    }

    pub fn from_u8(value: u8) -> ClientResult<Self> {
        match value {
            0 => Ok(Outcome::Doom),
            1 => Ok(Outcome::Life),
            other => Err(ClientError::MalformedAccount(format!(
                "invalid outcome byte: {other}"
            ))),
        }
    }

    /// The losing side, given this side won.
    pub fn opposite(self) -> Self {
        match self {
            Outcome::Doom => Outcome::Life,
            Outcome::Life => Outcome::Doom,
        }
    }
}

/// Strip the leading 8-byte account tag, failing on short buffers.
///
/// The tag content itself is not inspected; the caller already knows which
/// record kind it is fetching.
pub(crate) fn strip_tag(data: &[u8]) -> ClientResult<&[u8]> {
    if data.len() < TAG_LEN {
        return Err(ClientError::MalformedAccount(format!(
            "account shorter than its {TAG_LEN}-byte tag: {} bytes",
            data.len()
        )));
    }
    Ok(&data[TAG_LEN..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_byte_round_trip() {
        assert_eq!(Outcome::from_u8(0).unwrap(), Outcome::Doom);
        assert_eq!(Outcome::from_u8(1).unwrap(), Outcome::Life);
        assert!(Outcome::from_u8(2).is_err());
        assert_eq!(Outcome::Doom.opposite(), Outcome::Life);
    }

    #[test]
    fn strip_tag_rejects_short_accounts() {
        assert!(strip_tag(&[0u8; 7]).is_err());
        assert_eq!(strip_tag(&[0u8; 8]).unwrap().len(), 0);
    }
}
