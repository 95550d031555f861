//! Sources of hands for contestants.

use enum_dispatch::enum_dispatch;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::entities::{ContestantId, Hand};

/// Something that chooses a contestant's hand for the next round.
#[enum_dispatch]
pub trait PickHand {
    fn pick(&mut self, contestant: ContestantId) -> Hand;
}

/// Uniform random hands.
#[derive(Debug)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Reproducible hands for a given seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl PickHand for RandomPicker {
    fn pick(&mut self, _contestant: ContestantId) -> Hand {
        self.rng.random()
    }
}

/// Replays a fixed list of hands in draw order, wrapping around once
/// it runs out. Contestants draw in table order every round, so a
/// three-player script reads as `[r1p1, r1p2, r1p3, r2p1, ...]`.
///
/// An empty script cycles through every hand.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    hands: Vec<Hand>,
    next: usize,
}

impl ScriptedPicker {
    pub fn new(hands: impl IntoIterator<Item = Hand>) -> Self {
        Self {
            hands: hands.into_iter().collect(),
            next: 0,
        }
    }

    /// How many hands have been handed out so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.next
    }
}

impl PickHand for ScriptedPicker {
    fn pick(&mut self, _contestant: ContestantId) -> Hand {
        let script: &[Hand] = if self.hands.is_empty() {
            &Hand::ALL
        } else {
            &self.hands
        };
        let hand = script[self.next % script.len()];
        self.next += 1;
        hand
    }
}

#[enum_dispatch(PickHand)]
#[derive(Debug)]
pub enum HandPicker {
    RandomPicker,
    ScriptedPicker,
}

impl Default for HandPicker {
    fn default() -> Self {
        RandomPicker::new().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_wraps_around() {
        let mut picker = HandPicker::from(ScriptedPicker::new([Hand::Rock, Hand::Paper]));
        let picked: Vec<Hand> = (0..5).map(|i| picker.pick(i)).collect();
        assert_eq!(
            picked,
            vec![Hand::Rock, Hand::Paper, Hand::Rock, Hand::Paper, Hand::Rock]
        );
    }

    #[test]
    fn empty_script_cycles_all_hands() {
        let mut picker = ScriptedPicker::default();
        let picked: Vec<Hand> = (0..3).map(|i| picker.pick(i)).collect();
        assert_eq!(picked, Hand::ALL.to_vec());
        assert_eq!(picker.drawn(), 3);
    }

    #[test]
    fn seeded_pickers_agree() {
        let mut a = RandomPicker::from_seed(42);
        let mut b = RandomPicker::from_seed(42);
        for i in 0..50 {
            assert_eq!(a.pick(i), b.pick(i));
        }
    }
}
