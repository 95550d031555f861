//! Tournament configuration, results, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

use super::errors::{TournamentError, TournamentResult};
use crate::game::{
    constants::DEFAULT_BET,
    entities::{Coins, Contestant, ContestantId, Hand},
    settlement::SettlementMode,
};

/// Tournament state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentState {
    /// Accepting contestants and configuration
    Registering,
    /// Rounds in progress
    Running,
    /// Ranking is final
    Finished,
}

impl fmt::Display for TournamentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentState::Registering => write!(f, "registering"),
            TournamentState::Running => write!(f, "running"),
            TournamentState::Finished => write!(f, "finished"),
        }
    }
}

/// Penalty taken from everyone at the table after a streak of draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawTax {
    /// Coins taken from each contestant. 0 disables the tax.
    pub amount: Coins,
    /// Consecutive draws needed before the tax applies. 0 and 1 both
    /// mean every draw.
    pub rate: u32,
}

impl DrawTax {
    pub const fn new(amount: Coins, rate: u32) -> Self {
        Self { amount, rate }
    }

    /// Streak length that triggers the tax.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        if self.rate == 0 { 1 } else { self.rate }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.amount > 0
    }
}

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Coins every contestant wagers each round
    pub bet: Coins,
    /// Rounds to play. `None` plays until one contestant is left.
    pub round_limit: Option<u32>,
    pub draw_tax: DrawTax,
    /// Hard cap on rounds, for runs that could otherwise go on forever
    /// (a zero bet, or nothing but draws).
    pub max_rounds: Option<u32>,
    /// How decided rounds pay out
    #[serde(default)]
    pub settlement: SettlementMode,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BET)
    }
}

impl TournamentConfig {
    pub fn new(bet: Coins) -> Self {
        Self {
            bet,
            round_limit: None,
            draw_tax: DrawTax::default(),
            max_rounds: None,
            settlement: SettlementMode::default(),
        }
    }

    pub fn with_round_limit(mut self, rounds: u32) -> Self {
        self.round_limit = Some(rounds);
        self
    }

    pub fn with_draw_tax(mut self, amount: Coins, rate: u32) -> Self {
        self.draw_tax = DrawTax::new(amount, rate);
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn with_settlement(mut self, mode: SettlementMode) -> Self {
        self.settlement = mode;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> TournamentResult<()> {
        if self.bet < 0 {
            return Err(TournamentError::InvalidParameter {
                name: "bet",
                reason: format!("must not be negative, got {}", self.bet),
            });
        }

        if self.draw_tax.amount < 0 {
            return Err(TournamentError::InvalidParameter {
                name: "draw_tax",
                reason: format!("must not be negative, got {}", self.draw_tax.amount),
            });
        }

        if self.round_limit == Some(0) {
            return Err(TournamentError::InvalidParameter {
                name: "round_limit",
                reason: "must be at least 1 when set".to_string(),
            });
        }

        if self.max_rounds == Some(0) {
            return Err(TournamentError::InvalidParameter {
                name: "max_rounds",
                reason: "must be at least 1 when set".to_string(),
            });
        }

        Ok(())
    }

    /// Smallest starting balance a contestant needs.
    #[must_use]
    pub fn required_balance(&self) -> Coins {
        self.bet.max(self.draw_tax.amount)
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// At most one contestant could still cover the bet
    LastSurvivor,
    /// The configured round limit was reached
    RoundLimit,
    /// The `max_rounds` cap was reached
    SafetyCap,
    /// The cancellation flag was raised
    Cancelled,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::LastSurvivor => write!(f, "last survivor"),
            FinishReason::RoundLimit => write!(f, "round limit reached"),
            FinishReason::SafetyCap => write!(f, "safety cap reached"),
            FinishReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One finishing position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1 is the champion
    pub rank: usize,
    pub contestant: Contestant,
}

/// Finishing positions, rank 1 first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    places: BTreeMap<usize, Contestant>,
}

impl Ranking {
    pub(crate) fn place(&mut self, rank: usize, contestant: Contestant) {
        debug_assert!(rank > 0, "ranks start at 1");
        debug_assert!(
            !self.places.contains_key(&rank),
            "rank {rank} already taken"
        );
        self.places.insert(rank, contestant);
    }

    #[must_use]
    pub fn get(&self, rank: usize) -> Option<&Contestant> {
        self.places.get(&rank)
    }

    #[must_use]
    pub fn champion(&self) -> Option<&Contestant> {
        self.get(1)
    }

    /// Rank held by a contestant, if they've been placed.
    #[must_use]
    pub fn rank_of(&self, id: ContestantId) -> Option<usize> {
        self.places
            .iter()
            .find(|(_, contestant)| contestant.id == id)
            .map(|(&rank, _)| rank)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn contains(&self, id: ContestantId) -> bool {
        self.rank_of(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Contestant)> {
        self.places.iter().map(|(&rank, contestant)| (rank, contestant))
    }

    pub fn entries(&self) -> Vec<RankingEntry> {
        self.iter()
            .map(|(rank, contestant)| RankingEntry {
                rank,
                contestant: contestant.clone(),
            })
            .collect()
    }
}

/// Snapshot of a run, everything a presentation layer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub bet: Coins,
    pub settlement: SettlementMode,
    pub draw_tax: Coins,
    pub draw_tax_rate: u32,
    /// `None` when the run wasn't limited to a round count
    pub round_limit: Option<u32>,
    pub rounds_played: u32,
    pub total_draws: u32,
    pub draw_tax_collected: Coins,
    /// Hands by how often they were shown, most frequent first
    pub hand_frequency: Vec<(Hand, u64)>,
    pub finish_reason: Option<FinishReason>,
    pub ranking: Vec<RankingEntry>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Things that happen during a run
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentEvent {
    RoundSettled {
        round: u32,
        winners: Vec<ContestantId>,
        losers: Vec<ContestantId>,
    },
    Draw {
        round: u32,
        streak: u32,
    },
    DrawTaxed {
        round: u32,
        collected: Coins,
    },
    Eliminated {
        id: ContestantId,
        rank: usize,
        balance: Coins,
    },
    Finished {
        reason: FinishReason,
        champion: Option<ContestantId>,
    },
}

fn join_ids(ids: &[ContestantId]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for TournamentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::RoundSettled {
                round,
                winners,
                losers,
            } => format!(
                "round {round}: {} beat {}",
                join_ids(winners),
                join_ids(losers)
            ),
            Self::Draw { round, streak } => {
                format!("round {round}: draw ({streak} in a row)")
            }
            Self::DrawTaxed { round, collected } => {
                format!("round {round}: draw tax collected {collected} coins")
            }
            Self::Eliminated { id, rank, balance } => {
                format!("#{id} eliminated with {balance} coins, finishes #{rank}")
            }
            Self::Finished { reason, champion } => match champion {
                Some(id) => format!("tournament finished ({reason}), champion #{id}"),
                None => format!("tournament finished ({reason}), no champion"),
            },
        };
        write!(f, "{repr}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TournamentConfig::default();
        assert_eq!(config.bet, DEFAULT_BET);
        assert_eq!(config.round_limit, None);
        assert!(!config.draw_tax.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = TournamentConfig::new(30)
            .with_round_limit(5)
            .with_draw_tax(10, 0)
            .with_max_rounds(1000);
        assert_eq!(config.round_limit, Some(5));
        assert_eq!(config.draw_tax, DrawTax::new(10, 0));
        assert_eq!(config.max_rounds, Some(1000));
        assert_eq!(config.settlement, SettlementMode::Pooled);
        assert_eq!(config.required_balance(), 30);

        let config = config.with_settlement(SettlementMode::Direct);
        assert_eq!(config.settlement, SettlementMode::Direct);
    }

    #[test]
    fn test_negative_bet_rejected() {
        let err = TournamentConfig::new(-5).validate().unwrap_err();
        assert!(matches!(
            err,
            TournamentError::InvalidParameter { name: "bet", .. }
        ));
    }

    #[test]
    fn test_negative_draw_tax_rejected() {
        let err = TournamentConfig::new(5)
            .with_draw_tax(-1, 2)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            TournamentError::InvalidParameter {
                name: "draw_tax",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_round_limits_rejected() {
        assert!(TournamentConfig::new(5).with_round_limit(0).validate().is_err());
        assert!(TournamentConfig::new(5).with_max_rounds(0).validate().is_err());
    }

    #[test]
    fn test_draw_tax_threshold() {
        assert_eq!(DrawTax::new(10, 0).threshold(), 1);
        assert_eq!(DrawTax::new(10, 1).threshold(), 1);
        assert_eq!(DrawTax::new(10, 3).threshold(), 3);
    }

    #[test]
    fn test_ranking_lookup() {
        let mut ranking = Ranking::default();
        ranking.place(2, Contestant::new(7, 0));
        ranking.place(1, Contestant::new(3, 200));

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.champion().map(|c| c.id), Some(3));
        assert_eq!(ranking.rank_of(7), Some(2));
        assert!(!ranking.contains(99));

        let ranks: Vec<usize> = ranking.entries().iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn test_event_display() {
        let event = TournamentEvent::RoundSettled {
            round: 3,
            winners: vec![1, 3],
            losers: vec![2],
        };
        assert_eq!(event.to_string(), "round 3: #1, #3 beat #2");

        let event = TournamentEvent::Finished {
            reason: FinishReason::LastSurvivor,
            champion: Some(2),
        };
        assert_eq!(
            event.to_string(),
            "tournament finished (last survivor), champion #2"
        );
    }
}
