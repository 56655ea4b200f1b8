//! Program-derived address (PDA) derivation
//!
//! Both the client and the on-chain program must compute identical addresses
//! from identical seeds without communicating, so the seed schemas here are a
//! bit-exact contract with the program. `Pubkey::find_program_address` runs
//! the canonical search: hash seeds plus bump plus program id from bump 255
//! downward until the result falls off the ed25519 curve, and return that
//! address together with the bump that produced it.

use crate::state::Outcome;
use solana_sdk::pubkey::Pubkey;

pub const PLATFORM_CONFIG_SEED: &[u8] = b"platform_config";
pub const EVENT_SEED: &[u8] = b"event";
pub const USER_BET_SEED: &[u8] = b"user_bet";
pub const USER_STATS_SEED: &[u8] = b"user_stats";
pub const DOOM_VAULT_SEED: &[u8] = b"vault_doom";
pub const LIFE_VAULT_SEED: &[u8] = b"vault_life";

/// `["platform_config"]`
pub fn platform_config_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PLATFORM_CONFIG_SEED], program_id)
}

/// `["event", event_id.to_le_bytes()]`
pub fn event_address(program_id: &Pubkey, event_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[EVENT_SEED, &event_id.to_le_bytes()], program_id)
}

/// `["user_bet", event, user]`: one bet per (event, user) pair.
pub fn user_bet_address(program_id: &Pubkey, event: &Pubkey, user: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[USER_BET_SEED, event.as_ref(), user.as_ref()],
        program_id,
    )
}

/// `["user_stats", user]`
pub fn user_stats_address(program_id: &Pubkey, user: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[USER_STATS_SEED, user.as_ref()], program_id)
}

/// `["vault_doom" | "vault_life", event_id.to_le_bytes()]`
pub fn vault_address(program_id: &Pubkey, outcome: Outcome, event_id: u64) -> (Pubkey, u8) {
    let seed = match outcome {
        Outcome::Doom => DOOM_VAULT_SEED,
        Outcome::Life => LIFE_VAULT_SEED,
    };
    Pubkey::find_program_address(&[seed, &event_id.to_le_bytes()], program_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_id() -> Pubkey {
        Pubkey::new_unique()
    }

    #[test]
    fn derivation_is_deterministic() {
        let pid = program_id();
        let user = Pubkey::new_unique();
        assert_eq!(event_address(&pid, 9), event_address(&pid, 9));
        assert_eq!(
            user_stats_address(&pid, &user),
            user_stats_address(&pid, &user)
        );
    }

    #[test]
    fn changing_any_seed_component_changes_the_address() {
        let pid = program_id();
        let other_pid = program_id();
        let event = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let other_user = Pubkey::new_unique();

        assert_ne!(event_address(&pid, 1).0, event_address(&pid, 2).0);
        assert_ne!(event_address(&pid, 1).0, event_address(&other_pid, 1).0);
        assert_ne!(
            user_bet_address(&pid, &event, &user).0,
            user_bet_address(&pid, &event, &other_user).0
        );
        assert_ne!(
            vault_address(&pid, Outcome::Doom, 1).0,
            vault_address(&pid, Outcome::Life, 1).0
        );
    }

    #[test]
    fn seeds_match_the_raw_derivation() {
        let pid = program_id();
        let expected =
            Pubkey::find_program_address(&[b"event", &42u64.to_le_bytes()], &pid);
        assert_eq!(event_address(&pid, 42), expected);

        let expected =
            Pubkey::find_program_address(&[b"vault_life", &42u64.to_le_bytes()], &pid);
        assert_eq!(vault_address(&pid, Outcome::Life, 42), expected);
    }

    #[test]
    fn derived_addresses_are_off_curve() {
        let pid = program_id();
        let (address, _bump) = platform_config_address(&pid);
        assert!(!address.is_on_curve());
    }
}
