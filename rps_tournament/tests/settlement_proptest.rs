/// Property-based tests for round settlement and whole runs using proptest
///
/// These tests check the settlement rules against the dominance table for
/// every hand combination, and check run-wide invariants across randomly
/// generated tournaments.
use proptest::prelude::*;
use rps_tournament::{
    Contestant, Hand, RandomPicker, Tournament, TournamentConfig,
    game::{ContestantId, SettlementMode, resolve_round, settle},
};
use std::collections::{BTreeMap, BTreeSet};

fn hand_strategy() -> impl Strategy<Value = Hand> {
    prop::sample::select(Hand::ALL.to_vec())
}

fn mode_strategy() -> impl Strategy<Value = SettlementMode> {
    prop::sample::select(vec![SettlementMode::Pooled, SettlementMode::Direct])
}

fn table(shown: &[Hand]) -> BTreeMap<ContestantId, Hand> {
    shown
        .iter()
        .enumerate()
        .map(|(i, &hand)| (i as ContestantId + 1, hand))
        .collect()
}

#[test]
fn test_all_three_player_combinations() {
    let mut draws = 0;
    let mut decisive = 0;

    for a in Hand::ALL {
        for b in Hand::ALL {
            for c in Hand::ALL {
                let shown = [a, b, c];
                let outcome = resolve_round(&table(&shown));
                let distinct: BTreeSet<Hand> = shown.iter().copied().collect();

                if distinct.len() != 2 {
                    assert!(outcome.is_draw, "{shown:?} should draw");
                    assert!(outcome.winners.is_empty() && outcome.losers.is_empty());
                    draws += 1;
                    continue;
                }

                decisive += 1;
                assert!(!outcome.is_draw, "{shown:?}");
                assert_eq!(outcome.winners.len() + outcome.losers.len(), 3);
                assert!(
                    (outcome.winners.len(), outcome.losers.len()) == (2, 1)
                        || (outcome.winners.len(), outcome.losers.len()) == (1, 2)
                );

                // Everyone on a side holds the same hand, and the winning
                // hand dominates the losing one.
                let hand_of = |id: &ContestantId| shown[(*id - 1) as usize];
                let winning: BTreeSet<Hand> = outcome.winners.iter().map(hand_of).collect();
                let losing: BTreeSet<Hand> = outcome.losers.iter().map(hand_of).collect();
                assert_eq!(winning.len(), 1);
                assert_eq!(losing.len(), 1);
                let (w, l) = (*winning.first().unwrap(), *losing.first().unwrap());
                assert!(w.beats(l), "{shown:?}: {w} should beat {l}");
            }
        }
    }

    // 3 all-equal + 6 one-of-each, the other 18 are a pair and a singleton.
    assert_eq!(draws, 9);
    assert_eq!(decisive, 18);
}

proptest! {
    #[test]
    fn test_beats_is_irreflexive(hand in hand_strategy()) {
        prop_assert!(!hand.beats(hand));
    }

    #[test]
    fn test_winners_and_losers_are_disjoint(
        shown in prop::collection::vec(hand_strategy(), 2..=3)
    ) {
        let outcome = resolve_round(&table(&shown));
        prop_assert!(outcome.winners.is_disjoint(&outcome.losers));
        let expected: BTreeSet<ContestantId> = (1..=shown.len() as ContestantId).collect();
        prop_assert_eq!(outcome.participants(), expected);
    }

    #[test]
    fn test_settlement_conserves_coins(
        shown in prop::collection::vec(hand_strategy(), 2..=3),
        bet in 0i64..1_000,
    ) {
        let hands = table(&shown);
        let outcome = resolve_round(&hands);
        let order: Vec<ContestantId> = hands.keys().copied().collect();
        let deltas = settle(&outcome, &order, bet, SettlementMode::Pooled);

        prop_assert_eq!(deltas.iter().map(|(_, d)| d).sum::<i64>(), 0);
        for (id, delta) in deltas {
            if outcome.is_loser(id) {
                prop_assert_eq!(delta, -bet);
            } else if outcome.is_draw {
                prop_assert_eq!(delta, 0);
            } else {
                prop_assert!(delta >= bet / 2);
            }
        }
    }

    #[test]
    fn test_direct_settlement_pays_one_bet(
        shown in prop::collection::vec(hand_strategy(), 2..=3),
        bet in 0i64..1_000,
    ) {
        let hands = table(&shown);
        let outcome = resolve_round(&hands);
        let order: Vec<ContestantId> = hands.keys().copied().collect();
        let deltas = settle(&outcome, &order, bet, SettlementMode::Direct);

        let won: i64 = deltas.iter().map(|(_, d)| d).filter(|d| **d > 0).sum();
        let lost: i64 = deltas.iter().map(|(_, d)| d).filter(|d| **d < 0).sum();
        if outcome.is_draw || bet == 0 {
            prop_assert!(deltas.iter().all(|(_, d)| *d == 0));
        } else {
            prop_assert_eq!(won, bet);
            prop_assert_eq!(lost, -bet * outcome.losers.len() as i64);
        }
    }

    #[test]
    fn test_runs_keep_ranking_contiguous_and_coins_accounted(
        seed in any::<u64>(),
        players in 2usize..=3,
        balance in 50i64..400,
        bet in 1i64..50,
        tax in 0i64..20,
        rate in 0u32..4,
        limit in prop::option::of(1u32..60),
        mode in mode_strategy(),
    ) {
        let config = TournamentConfig {
            round_limit: limit,
            max_rounds: Some(5_000),
            ..TournamentConfig::new(bet).with_draw_tax(tax, rate).with_settlement(mode)
        };
        let mut tournament = Tournament::with_config(config)
            .with_picker(RandomPicker::from_seed(seed));
        tournament
            .register_all((1..=players as ContestantId).map(|id| Contestant::new(id, balance)))
            .unwrap();
        let summary = tournament.run().unwrap();

        let ranks: Vec<usize> = summary.ranking.iter().map(|e| e.rank).collect();
        prop_assert_eq!(ranks, (1..=players).collect::<Vec<_>>());
        prop_assert!(tournament.active().is_empty());

        let total: i64 = summary.ranking.iter().map(|e| e.contestant.balance()).sum();
        match mode {
            SettlementMode::Pooled => {
                prop_assert_eq!(total + summary.draw_tax_collected, balance * players as i64);
            }
            SettlementMode::Direct => {
                prop_assert!(total + summary.draw_tax_collected <= balance * players as i64);
            }
        }

        if let Some(limit) = limit {
            prop_assert!(summary.rounds_played <= limit);
        }
        for entry in &summary.ranking {
            let c = &entry.contestant;
            prop_assert!(c.balance() >= 0);
            prop_assert!(c.peak_balance() >= c.balance());
            prop_assert!(c.peak_balance() >= balance);
            prop_assert!(c.wins() <= c.total_rounds());
            prop_assert!(c.total_rounds() <= summary.rounds_played);
            prop_assert!(c.current_hand().is_none());
        }
    }
}
