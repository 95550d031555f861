//! Rock-paper-scissors game rules.
//!
//! This module provides the pieces a tournament is built from:
//! - Hands and their dominance cycle
//! - Contestants and their running totals
//! - Hand pickers (random or scripted)
//! - Round resolution and settlement, pooled or direct

pub mod constants;
pub mod entities;
pub mod picker;
pub mod settlement;

pub use entities::{Coins, Contestant, ContestantId, Hand, beats, random_hand};
pub use picker::{HandPicker, PickHand, RandomPicker, ScriptedPicker};
pub use settlement::{
    ParseSettlementModeError, Payout, RoundOutcome, SettlementMode, bank, resolve_round, settle,
    split_prize,
};
