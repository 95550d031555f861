//! Round resolution and coin settlement.
//!
//! Everything here is pure: callers hand in the hands shown and the
//! table order, and get back sets of contestant IDs and balance deltas.

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};
use thiserror::Error;

use super::entities::{Coins, ContestantId, Hand};

/// Outcome of a single round.
///
/// Winners and losers are always sets of IDs, even when there's only
/// one of each.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub winners: BTreeSet<ContestantId>,
    pub losers: BTreeSet<ContestantId>,
    /// Everyone who drew. Empty unless `is_draw`.
    pub drawn: BTreeSet<ContestantId>,
    pub is_draw: bool,
}

impl RoundOutcome {
    pub fn draw(ids: impl IntoIterator<Item = ContestantId>) -> Self {
        Self {
            drawn: ids.into_iter().collect(),
            is_draw: true,
            ..Self::default()
        }
    }

    /// Everyone who took part in the round.
    pub fn participants(&self) -> BTreeSet<ContestantId> {
        self.winners
            .iter()
            .chain(&self.losers)
            .chain(&self.drawn)
            .copied()
            .collect()
    }

    #[must_use]
    pub fn is_winner(&self, id: ContestantId) -> bool {
        self.winners.contains(&id)
    }

    #[must_use]
    pub fn is_loser(&self, id: ContestantId) -> bool {
        self.losers.contains(&id)
    }
}

/// Decide who won a round from the hands shown.
///
/// With two contestants, equal hands draw and otherwise the dominant
/// hand wins. With three, the rules apply in order:
///
/// 1. all three hands equal is a draw;
/// 2. one of each hand is a draw, since nothing dominates the cycle;
/// 3. otherwise a pair faces a singleton, and whichever hand dominates
///    takes the round for everyone holding it.
///
/// All three cases fall out of the number of distinct hands on the
/// table: one or three means a draw, two means one of them dominates.
pub fn resolve_round(hands: &BTreeMap<ContestantId, Hand>) -> RoundOutcome {
    let distinct: Vec<Hand> = hands
        .values()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let (a, b) = match distinct.as_slice() {
        &[a, b] => (a, b),
        _ => return RoundOutcome::draw(hands.keys().copied()),
    };
    let winning = if a.beats(b) { a } else { b };

    let mut outcome = RoundOutcome::default();
    for (&id, &hand) in hands {
        if hand == winning {
            outcome.winners.insert(id);
        } else {
            outcome.losers.insert(id);
        }
    }
    outcome
}

/// Coins in the bank when every active contestant puts in `bet`.
#[must_use]
pub const fn bank(active_count: usize, bet: Coins) -> Coins {
    active_count as Coins * bet
}

/// Per-winner slice of a prize.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub share: Coins,
    /// Odd coins left after an even split. The first `remainder`
    /// winners (in table order) get one extra coin each.
    pub remainder: Coins,
}

impl Payout {
    /// What the winner at `position` (0-based, table order) receives.
    #[must_use]
    pub fn amount_for(&self, position: usize) -> Coins {
        if (position as Coins) < self.remainder {
            self.share + 1
        } else {
            self.share
        }
    }
}

/// Split `surplus` between `winners`, truncating and keeping the
/// odd coins as a remainder.
#[must_use]
pub fn split_prize(surplus: Coins, winners: usize) -> Payout {
    if winners == 0 {
        return Payout {
            share: 0,
            remainder: 0,
        };
    }
    let winners = winners as Coins;
    Payout {
        share: surplus / winners,
        remainder: surplus % winners,
    }
}

/// How a decided round moves coins.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    /// Every contestant's bet goes into a bank. Winners take theirs back
    /// and split what the losers put in. Coins are conserved.
    #[default]
    Pooled,
    /// Each loser pays `bet` and the winners split a single `bet`
    /// between them. The difference leaves the table, so coins are only
    /// conserved in a one-on-one round.
    Direct,
}

impl SettlementMode {
    /// Coins the winners of `outcome` split between them.
    #[must_use]
    pub fn surplus(self, outcome: &RoundOutcome, active_count: usize, bet: Coins) -> Coins {
        if outcome.is_draw || outcome.winners.is_empty() {
            return 0;
        }
        match self {
            Self::Pooled => bank(active_count, bet) - bank(outcome.winners.len(), bet),
            Self::Direct => bet,
        }
    }
}

impl fmt::Display for SettlementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pooled => f.pad("pooled"),
            Self::Direct => f.pad("direct"),
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("Unknown settlement mode {0:?}, expected \"pooled\" or \"direct\"")]
pub struct ParseSettlementModeError(String);

impl FromStr for SettlementMode {
    type Err = ParseSettlementModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pooled" => Ok(Self::Pooled),
            "direct" => Ok(Self::Direct),
            _ => Err(ParseSettlementModeError(s.to_string())),
        }
    }
}

/// Balance delta for every contestant in `order` under `mode`.
///
/// `order` is the table (registration) order of everyone who played
/// the round. Losers each give up `bet`. Winners split the mode's
/// surplus, odd coins going to the earliest winners. Under
/// [`SettlementMode::Pooled`] the deltas always sum to zero.
pub fn settle(
    outcome: &RoundOutcome,
    order: &[ContestantId],
    bet: Coins,
    mode: SettlementMode,
) -> Vec<(ContestantId, Coins)> {
    if outcome.is_draw {
        return order.iter().map(|&id| (id, 0)).collect();
    }

    let surplus = mode.surplus(outcome, order.len(), bet);
    let payout = split_prize(surplus, outcome.winners.len());

    let mut position = 0;
    order
        .iter()
        .map(|&id| {
            let delta = if outcome.is_winner(id) {
                let amount = payout.amount_for(position);
                position += 1;
                amount
            } else if outcome.is_loser(id) {
                -bet
            } else {
                0
            };
            (id, delta)
        })
        .collect()
}
