//! Elimination tournaments of rock-paper-scissors.
//!
//! This module provides:
//! - Contestant registration and run configuration
//! - The round cycle: elimination, hands, settlement, draw tax
//! - Final ranking and run statistics
//!
//! ## Example
//!
//! ```
//! use rps_tournament::game::Contestant;
//! use rps_tournament::tournament::{Tournament, TournamentConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tournament = Tournament::with_config(TournamentConfig::new(20).with_draw_tax(10, 0));
//! tournament
//!     .register(Contestant::new(1, 500).with_name("Joe"))?
//!     .register(Contestant::new(2, 500).with_name("Joan"))?
//!     .register(Contestant::new(3, 500).with_name("Bob"))?;
//!
//! let summary = tournament.run()?;
//! assert_eq!(summary.ranking.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod errors;
pub mod models;
pub mod statistics;

pub use engine::Tournament;
pub use errors::{TournamentError, TournamentResult};
pub use models::{
    DrawTax, FinishReason, Ranking, RankingEntry, TournamentConfig, TournamentEvent,
    TournamentState, TournamentSummary,
};
pub use statistics::Statistics;
