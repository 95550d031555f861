use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::DEFAULT_STARTING_BALANCE;

/// Type alias for whole coins. Balances, bets, and taxes are all
/// whole coins. Signed so that a bad caller-supplied amount can be
/// caught during validation instead of wrapping.
pub type Coins = i64;

/// Contestant identifier, unique within a tournament.
pub type ContestantId = i64;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Hand {
    Rock,
    Scissors,
    Paper,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Rock, Hand::Scissors, Hand::Paper];

    /// Whether this hand dominates `other`. Rock beats scissors,
    /// scissors beat paper, paper beats rock.
    #[must_use]
    pub const fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Hand::Rock, Hand::Scissors) | (Hand::Scissors, Hand::Paper) | (Hand::Paper, Hand::Rock)
        )
    }

    /// The one hand that dominates this one.
    #[must_use]
    pub const fn beaten_by(self) -> Hand {
        match self {
            Hand::Rock => Hand::Paper,
            Hand::Scissors => Hand::Rock,
            Hand::Paper => Hand::Scissors,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Rock => "rock",
            Self::Scissors => "scissors",
            Self::Paper => "paper",
        };
        f.pad(repr)
    }
}

impl Distribution<Hand> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Hand {
        Hand::ALL[rng.random_range(0..Hand::ALL.len())]
    }
}

/// Free-function form of [`Hand::beats`].
#[must_use]
pub const fn beats(a: Hand, b: Hand) -> bool {
    a.beats(b)
}

/// Draw a hand uniformly at random. Each call is independent.
pub fn random_hand<R: Rng + ?Sized>(rng: &mut R) -> Hand {
    rng.random()
}

/// A tournament participant and their running totals.
///
/// Balances only move through the crate's settlement and draw-tax
/// paths, so outside the crate a contestant is read-only once it's
/// registered.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Contestant {
    pub id: ContestantId,
    pub name: Option<String>,
    pub(crate) balance: Coins,
    pub(crate) peak_balance: Coins,
    /// Round counter value from the last settled round this
    /// contestant took part in.
    pub(crate) total_rounds: u32,
    pub(crate) wins: u32,
    #[serde(skip)]
    pub(crate) current_hand: Option<Hand>,
}

impl Contestant {
    #[must_use]
    pub fn new(id: ContestantId, balance: Coins) -> Self {
        Self {
            id,
            name: None,
            balance,
            peak_balance: balance,
            total_rounds: 0,
            wins: 0,
            current_hand: None,
        }
    }

    #[must_use]
    pub fn with_default_balance(id: ContestantId) -> Self {
        Self::new(id, DEFAULT_STARTING_BALANCE)
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn balance(&self) -> Coins {
        self.balance
    }

    #[must_use]
    pub fn peak_balance(&self) -> Coins {
        self.peak_balance
    }

    #[must_use]
    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    #[must_use]
    pub fn wins(&self) -> u32 {
        self.wins
    }

    #[must_use]
    pub fn current_hand(&self) -> Option<Hand> {
        self.current_hand
    }

    /// Name if one was given, otherwise `#id`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.id),
        }
    }

    pub(crate) fn credit(&mut self, amount: Coins) {
        self.balance += amount;
        self.peak_balance = self.peak_balance.max(self.balance);
    }

    pub(crate) fn debit(&mut self, amount: Coins) {
        self.balance -= amount;
    }

    /// Apply a signed settlement delta.
    pub(crate) fn apply_delta(&mut self, delta: Coins) {
        if delta >= 0 {
            self.credit(delta);
        } else {
            self.debit(-delta);
        }
    }

    /// Take up to `amount`, never pushing the balance below zero.
    /// Returns what was actually taken.
    pub(crate) fn debit_capped(&mut self, amount: Coins) -> Coins {
        let taken = amount.min(self.balance.max(0));
        self.debit(taken);
        taken
    }

    pub(crate) fn record_win(&mut self) {
        self.wins += 1;
    }

    pub(crate) fn mark_round(&mut self, round: u32) {
        self.total_rounds = round;
    }

    pub(crate) fn show_hand(&mut self, hand: Hand) {
        self.current_hand = Some(hand);
    }

    pub(crate) fn free_hand(&mut self) {
        self.current_hand = None;
    }
}

impl fmt::Display for Contestant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} coins)", self.label(), self.balance)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn dominance_is_a_cycle() {
        assert!(Hand::Rock.beats(Hand::Scissors));
        assert!(Hand::Scissors.beats(Hand::Paper));
        assert!(Hand::Paper.beats(Hand::Rock));

        assert!(!Hand::Scissors.beats(Hand::Rock));
        assert!(!Hand::Paper.beats(Hand::Scissors));
        assert!(!Hand::Rock.beats(Hand::Paper));
    }

    #[test]
    fn dominance_is_irreflexive() {
        for hand in Hand::ALL {
            assert!(!beats(hand, hand), "{hand} must not beat itself");
        }
    }

    #[test]
    fn exactly_one_direction_for_distinct_hands() {
        for a in Hand::ALL {
            for b in Hand::ALL {
                if a != b {
                    assert_ne!(a.beats(b), b.beats(a), "{a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn beaten_by_matches_beats() {
        for hand in Hand::ALL {
            assert!(hand.beaten_by().beats(hand));
        }
    }

    #[test]
    fn display_honors_width() {
        assert_eq!(format!("{:<8}|", Hand::Rock), "rock    |");
        assert_eq!(Hand::Scissors.to_string(), "scissors");
    }

    #[test]
    fn random_hand_covers_all_hands() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<Hand, usize> = HashMap::new();
        for _ in 0..3000 {
            *counts.entry(random_hand(&mut rng)).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        // Loose bound, each hand should land near 1000.
        for (hand, count) in counts {
            assert!((800..1200).contains(&count), "{hand} drawn {count} times");
        }
    }

    #[test]
    fn credit_tracks_peak_balance() {
        let mut contestant = Contestant::new(1, 100);
        contestant.credit(50);
        assert_eq!(contestant.balance(), 150);
        assert_eq!(contestant.peak_balance(), 150);

        contestant.debit(80);
        assert_eq!(contestant.balance(), 70);
        assert_eq!(contestant.peak_balance(), 150);

        contestant.apply_delta(40);
        assert_eq!(contestant.peak_balance(), 150);
        contestant.apply_delta(-10);
        assert_eq!(contestant.balance(), 100);
    }

    #[test]
    fn capped_debit_stops_at_zero() {
        let mut contestant = Contestant::new(1, 15);
        assert_eq!(contestant.debit_capped(10), 10);
        assert_eq!(contestant.debit_capped(10), 5);
        assert_eq!(contestant.balance(), 0);
        assert_eq!(contestant.debit_capped(10), 0);
    }

    #[test]
    fn label_falls_back_to_id() {
        assert_eq!(Contestant::new(4, 10).label(), "#4");
        assert_eq!(Contestant::new(4, 10).with_name("Joan").label(), "Joan");
        assert_eq!(
            Contestant::with_default_balance(9).balance(),
            DEFAULT_STARTING_BALANCE
        );
    }
}
