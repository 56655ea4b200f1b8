//! Instruction builders for the prediction-market program
//!
//! Each builder is a pure function from (operation arguments, known
//! addresses) to a [`Instruction`]: an 8-byte operation tag, arguments in
//! the program's fixed order, and the exact ordered account list the
//! program's account contexts expect, with per-account signer/writable
//! flags. No network I/O happens here.
//!
//! Derived accounts (platform config, event, user bet, vaults) come from
//! [`crate::pda`]; caller-supplied accounts (the user's token account for
//! the chosen outcome) are passed in. For `place_bet`, `claim_winnings` and
//! `refund_bet` the vault always matches the outcome side: DOOM bets move
//! through the DOOM vault only.

use crate::codec::ByteWriter;
use crate::pda;
use crate::state::Outcome;
use crate::tags::instruction_tag;
use once_cell::sync::Lazy;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

static PLACE_BET_TAG: Lazy<[u8; 8]> = Lazy::new(|| instruction_tag("place_bet"));
static CLAIM_WINNINGS_TAG: Lazy<[u8; 8]> = Lazy::new(|| instruction_tag("claim_winnings"));
static REFUND_BET_TAG: Lazy<[u8; 8]> = Lazy::new(|| instruction_tag("refund_bet"));
static CREATE_EVENT_TAG: Lazy<[u8; 8]> = Lazy::new(|| instruction_tag("create_event"));
static RESOLVE_EVENT_TAG: Lazy<[u8; 8]> = Lazy::new(|| instruction_tag("resolve_event"));
static CANCEL_EVENT_TAG: Lazy<[u8; 8]> = Lazy::new(|| instruction_tag("cancel_event"));

/// Arguments for [`create_event`].
#[derive(Debug, Clone)]
pub struct CreateEventArgs {
    pub event_id: u64,
    pub title: String,
    pub description: String,
    /// Unix timestamp when betting closes.
    pub deadline: i64,
    /// Unix timestamp by which the oracle must resolve.
    pub resolution_deadline: i64,
}

/// `place_bet(outcome, amount)`
///
/// `user_token_account` must hold the token of the chosen outcome; the
/// matching vault is derived from the same outcome.
pub fn place_bet(
    program_id: &Pubkey,
    user: &Pubkey,
    user_token_account: &Pubkey,
    event_id: u64,
    outcome: Outcome,
    amount: u64,
) -> Instruction {
    let (platform_config, _) = pda::platform_config_address(program_id);
    let (event, _) = pda::event_address(program_id, event_id);
    let (user_bet, _) = pda::user_bet_address(program_id, &event, user);
    let (event_vault, _) = pda::vault_address(program_id, outcome, event_id);

    let mut data = ByteWriter::with_capacity(8 + 1 + 8);
    data.put_bytes(&*PLACE_BET_TAG);
    data.put_u8(outcome.as_u8());
    data.put_u64(amount);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(platform_config, false),
            AccountMeta::new(event, false),
            AccountMeta::new(user_bet, false),
            AccountMeta::new(*user_token_account, false),
            AccountMeta::new(event_vault, false),
            AccountMeta::new(*user, true),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: data.into_bytes(),
    }
}

/// `claim_winnings()`. Payout flows from the winning-outcome vault.
///
/// `bet_outcome` is the outcome the user staked on (which, for a valid
/// claim, is also the resolved outcome).
pub fn claim_winnings(
    program_id: &Pubkey,
    user: &Pubkey,
    user_token_account: &Pubkey,
    event_id: u64,
    bet_outcome: Outcome,
) -> Instruction {
    let (platform_config, _) = pda::platform_config_address(program_id);
    let (event, _) = pda::event_address(program_id, event_id);
    let (user_bet, _) = pda::user_bet_address(program_id, &event, user);
    let (event_vault, _) = pda::vault_address(program_id, bet_outcome, event_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(platform_config, false),
            AccountMeta::new_readonly(event, false),
            AccountMeta::new(user_bet, false),
            AccountMeta::new(event_vault, false),
            AccountMeta::new(*user_token_account, false),
            AccountMeta::new_readonly(*user, true),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: CLAIM_WINNINGS_TAG.to_vec(),
    }
}

/// `refund_bet()`. Refund for a cancelled event, from the staked-side vault.
pub fn refund_bet(
    program_id: &Pubkey,
    user: &Pubkey,
    user_token_account: &Pubkey,
    event_id: u64,
    bet_outcome: Outcome,
) -> Instruction {
    let (platform_config, _) = pda::platform_config_address(program_id);
    let (event, _) = pda::event_address(program_id, event_id);
    let (user_bet, _) = pda::user_bet_address(program_id, &event, user);
    let (event_vault, _) = pda::vault_address(program_id, bet_outcome, event_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(platform_config, false),
            AccountMeta::new_readonly(event, false),
            AccountMeta::new(user_bet, false),
            AccountMeta::new(event_vault, false),
            AccountMeta::new(*user_token_account, false),
            AccountMeta::new_readonly(*user, true),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: REFUND_BET_TAG.to_vec(),
    }
}

/// `create_event(event_id, title, description, deadline, resolution_deadline)`
pub fn create_event(program_id: &Pubkey, creator: &Pubkey, args: &CreateEventArgs) -> Instruction {
    let (platform_config, _) = pda::platform_config_address(program_id);
    let (event, _) = pda::event_address(program_id, args.event_id);

    let mut data =
        ByteWriter::with_capacity(8 + 8 + 8 + args.title.len() + 8 + args.description.len() + 16);
    data.put_bytes(&*CREATE_EVENT_TAG);
    data.put_u64(args.event_id);
    data.put_string(&args.title);
    data.put_string(&args.description);
    data.put_i64(args.deadline);
    data.put_i64(args.resolution_deadline);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(platform_config, false),
            AccountMeta::new(event, false),
            AccountMeta::new(*creator, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: data.into_bytes(),
    }
}

/// `resolve_event(outcome)`. Oracle only.
pub fn resolve_event(
    program_id: &Pubkey,
    oracle: &Pubkey,
    event_id: u64,
    outcome: Outcome,
) -> Instruction {
    let (platform_config, _) = pda::platform_config_address(program_id);
    let (event, _) = pda::event_address(program_id, event_id);

    let mut data = ByteWriter::with_capacity(8 + 1);
    data.put_bytes(&*RESOLVE_EVENT_TAG);
    data.put_u8(outcome.as_u8());

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(platform_config, false),
            AccountMeta::new(event, false),
            AccountMeta::new_readonly(*oracle, true),
        ],
        data: data.into_bytes(),
    }
}

/// `cancel_event()`. Platform authority only.
pub fn cancel_event(program_id: &Pubkey, authority: &Pubkey, event_id: u64) -> Instruction {
    let (platform_config, _) = pda::platform_config_address(program_id);
    let (event, _) = pda::event_address(program_id, event_id);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(platform_config, false),
            AccountMeta::new(event, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: CANCEL_EVENT_TAG.to_vec(),
    }
}
