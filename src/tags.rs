//! 8-byte account and operation tags
//!
//! The on-chain program prefixes every account with
//! `sha256("account:" ++ TypeName)[..8]` and every instruction payload with
//! `sha256("global:" ++ method_name)[..8]`. Both sides derive the same
//! constants from the same names, so the client computes them instead of
//! hard-coding opaque byte arrays.

use sha2::{Digest, Sha256};

pub const TAG_LEN: usize = 8;

fn tag(preimage: &str) -> [u8; TAG_LEN] {
    let digest = Sha256::digest(preimage.as_bytes());
    let mut out = [0u8; TAG_LEN];
    out.copy_from_slice(&digest[..TAG_LEN]);
    out
}

/// Tag identifying an account record kind, e.g. `account_tag("UserBet")`.
pub fn account_tag(type_name: &str) -> [u8; TAG_LEN] {
    tag(&format!("account:{type_name}"))
}

/// Tag identifying a program operation, e.g. `instruction_tag("place_bet")`.
pub fn instruction_tag(method_name: &str) -> [u8; TAG_LEN] {
    tag(&format!("global:{method_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stable_and_distinct() {
        assert_eq!(account_tag("UserBet"), account_tag("UserBet"));
        assert_ne!(account_tag("UserBet"), account_tag("UserStats"));
        // Account and instruction namespaces never collide.
        assert_ne!(account_tag("UserBet"), instruction_tag("UserBet"));
    }
}
