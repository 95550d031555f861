//! Run-wide tallies.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::game::entities::{Coins, Hand};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    hands: BTreeMap<Hand, u64>,
    total_draws: u32,
    decisive_rounds: u32,
    draw_tax_collected: Coins,
}

impl Statistics {
    pub fn record_hand(&mut self, hand: Hand) {
        *self.hands.entry(hand).or_default() += 1;
    }

    pub fn record_draw(&mut self) {
        self.total_draws += 1;
    }

    pub fn record_decisive(&mut self) {
        self.decisive_rounds += 1;
    }

    pub fn record_tax(&mut self, collected: Coins) {
        self.draw_tax_collected += collected;
    }

    /// Times `hand` was shown.
    #[must_use]
    pub fn count(&self, hand: Hand) -> u64 {
        self.hands.get(&hand).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_hands(&self) -> u64 {
        self.hands.values().sum()
    }

    /// Hand counts sorted by count, most frequent first. Ties keep
    /// rock, scissors, paper order. Hands never shown are left out.
    #[must_use]
    pub fn hand_frequency(&self) -> Vec<(Hand, u64)> {
        let mut frequency: Vec<(Hand, u64)> =
            self.hands.iter().map(|(&hand, &count)| (hand, count)).collect();
        frequency.sort_by(|a, b| b.1.cmp(&a.1));
        frequency
    }

    #[must_use]
    pub fn total_draws(&self) -> u32 {
        self.total_draws
    }

    #[must_use]
    pub fn decisive_rounds(&self) -> u32 {
        self.decisive_rounds
    }

    #[must_use]
    pub fn draw_tax_collected(&self) -> Coins {
        self.draw_tax_collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_sorted_descending() {
        let mut stats = Statistics::default();
        for hand in [Hand::Paper, Hand::Rock, Hand::Paper, Hand::Scissors, Hand::Paper] {
            stats.record_hand(hand);
        }
        stats.record_hand(Hand::Scissors);

        assert_eq!(
            stats.hand_frequency(),
            vec![(Hand::Paper, 3), (Hand::Scissors, 2), (Hand::Rock, 1)]
        );
        assert_eq!(stats.total_hands(), 6);
    }

    #[test]
    fn ties_keep_hand_order() {
        let mut stats = Statistics::default();
        stats.record_hand(Hand::Paper);
        stats.record_hand(Hand::Rock);

        assert_eq!(
            stats.hand_frequency(),
            vec![(Hand::Rock, 1), (Hand::Paper, 1)]
        );
        assert_eq!(stats.count(Hand::Scissors), 0);
    }

    #[test]
    fn draw_and_tax_tallies() {
        let mut stats = Statistics::default();
        stats.record_draw();
        stats.record_draw();
        stats.record_decisive();
        stats.record_tax(20);
        stats.record_tax(15);

        assert_eq!(stats.total_draws(), 2);
        assert_eq!(stats.decisive_rounds(), 1);
        assert_eq!(stats.draw_tax_collected(), 35);
    }
}
