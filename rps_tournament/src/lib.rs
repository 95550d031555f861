//! # RPS Tournament
//!
//! A rock-paper-scissors elimination tournament engine for two or three
//! contestants wagering coins.
//!
//! Every round each contestant shows a hand, the round is resolved, and
//! coins move through a pooled bank: losers give up the bet and winners
//! split it. A direct mode, where winners split a single bet, is also
//! available. Contestants who can no longer cover the bet are eliminated,
//! and the run ends with a ranking, rank 1 being the champion.
//!
//! ## Core Modules
//!
//! - [`game`]: Hands, contestants, hand pickers, round settlement
//! - [`tournament`]: The tournament engine, its configuration, errors, and statistics
//!
//! ## Example
//!
//! ```
//! use rps_tournament::{Contestant, Tournament, TournamentConfig};
//!
//! let mut tournament = Tournament::with_config(TournamentConfig::new(20));
//! tournament
//!     .register_all([Contestant::new(1, 500), Contestant::new(2, 500)])
//!     .unwrap();
//!
//! let summary = tournament.run().unwrap();
//! assert_eq!(summary.ranking[0].contestant.balance(), 1000);
//! ```

/// Game rules, entities, and settlement.
pub mod game;
pub use game::{
    Coins, Contestant, ContestantId, Hand, HandPicker, RandomPicker, RoundOutcome,
    ScriptedPicker, SettlementMode,
    constants::{self, DEFAULT_STARTING_BALANCE, MAX_CONTESTANTS, MIN_CONTESTANTS},
};

/// Tournament engine and its models.
pub mod tournament;
pub use tournament::{
    FinishReason, Tournament, TournamentConfig, TournamentError, TournamentResult,
    TournamentSummary,
};
