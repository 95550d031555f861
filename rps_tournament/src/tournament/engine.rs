//! Tournament engine driving rounds from registration to final ranking.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use super::{
    errors::{TournamentError, TournamentResult},
    models::{
        FinishReason, Ranking, TournamentConfig, TournamentEvent, TournamentState,
        TournamentSummary,
    },
    statistics::Statistics,
};
use crate::game::{
    constants::{MAX_CONTESTANTS, MIN_CONTESTANTS},
    entities::{Coins, Contestant, ContestantId, Hand},
    picker::{HandPicker, PickHand},
    settlement::{SettlementMode, resolve_round, settle},
};

/// A single elimination tournament.
///
/// Contestants and configuration go in while the tournament is
/// `Registering`. [`Tournament::run`] validates everything, plays rounds
/// until the tournament is `Finished`, and hands back a summary. The
/// tournament owns its contestants for the whole run.
#[derive(Debug)]
pub struct Tournament {
    config: TournamentConfig,
    state: TournamentState,
    /// Contestants still playing, in registration order.
    active: Vec<Contestant>,
    ranking: Ranking,
    /// Contestants seated when the run started.
    seated: usize,
    round: u32,
    draw_streak: u32,
    statistics: Statistics,
    picker: HandPicker,
    cancel: Option<Arc<AtomicBool>>,
    events: VecDeque<TournamentEvent>,
    finish_reason: Option<FinishReason>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::with_config(TournamentConfig::default())
    }
}

impl Tournament {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: TournamentConfig) -> Self {
        Self {
            config,
            state: TournamentState::Registering,
            active: Vec::with_capacity(MAX_CONTESTANTS),
            ranking: Ranking::default(),
            seated: 0,
            round: 0,
            draw_streak: 0,
            statistics: Statistics::default(),
            picker: HandPicker::default(),
            cancel: None,
            events: VecDeque::new(),
            finish_reason: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// Replace the hand source, e.g. with a seeded or scripted picker.
    #[must_use]
    pub fn with_picker(mut self, picker: impl Into<HandPicker>) -> Self {
        self.picker = picker.into();
        self
    }

    /// Stop the run at the next round boundary once `flag` is set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.config.max_rounds = Some(rounds);
        self
    }

    fn ensure_state(&self, expected: TournamentState) -> TournamentResult<()> {
        if self.state != expected {
            return Err(TournamentError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    /// Add a contestant.
    ///
    /// # Errors
    ///
    /// `DuplicateContestantId` if the ID is taken, `InvalidState` once
    /// the tournament has started.
    pub fn register(&mut self, contestant: Contestant) -> TournamentResult<&mut Self> {
        self.ensure_state(TournamentState::Registering)?;
        if self.active.iter().any(|c| c.id == contestant.id) {
            return Err(TournamentError::DuplicateContestantId(contestant.id));
        }
        debug!("registered {contestant}");
        self.active.push(contestant);
        Ok(self)
    }

    /// Add several contestants at once. Nothing is added if any ID
    /// collides with a registered contestant or with another one in
    /// the batch.
    pub fn register_all(
        &mut self,
        contestants: impl IntoIterator<Item = Contestant>,
    ) -> TournamentResult<&mut Self> {
        self.ensure_state(TournamentState::Registering)?;
        let batch: Vec<Contestant> = contestants.into_iter().collect();

        let mut seen: BTreeSet<ContestantId> = self.active.iter().map(|c| c.id).collect();
        for contestant in &batch {
            if !seen.insert(contestant.id) {
                return Err(TournamentError::DuplicateContestantId(contestant.id));
            }
        }

        for contestant in batch {
            debug!("registered {contestant}");
            self.active.push(contestant);
        }
        Ok(self)
    }

    /// Set the run parameters. Keeps any `max_rounds` cap and settlement
    /// mode already set.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a negative bet or tax, or a zero round
    /// limit. `InvalidState` once the tournament has started.
    pub fn configure(
        &mut self,
        bet: Coins,
        round_limit: Option<u32>,
        draw_tax: Coins,
        draw_tax_rate: u32,
    ) -> TournamentResult<&mut Self> {
        self.ensure_state(TournamentState::Registering)?;
        let mut config = TournamentConfig::new(bet)
            .with_draw_tax(draw_tax, draw_tax_rate)
            .with_settlement(self.config.settlement);
        config.round_limit = round_limit;
        config.max_rounds = self.config.max_rounds;
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    fn validate_start(&self) -> TournamentResult<()> {
        self.config.validate()?;

        let count = self.active.len();
        if !(MIN_CONTESTANTS..=MAX_CONTESTANTS).contains(&count) {
            return Err(TournamentError::InvalidContestantCount {
                count,
                min: MIN_CONTESTANTS,
                max: MAX_CONTESTANTS,
            });
        }

        // Settlement never raises the table total, so every later
        // balance and bank fits once the starting total does.
        let mut total: Coins = 0;
        for contestant in &self.active {
            total = total.checked_add(contestant.balance).ok_or_else(|| {
                TournamentError::InvalidParameter {
                    name: "balance",
                    reason: format!("table total overflows at contestant {}", contestant.id),
                }
            })?;
        }

        let required = self.config.required_balance();
        if let Some(short) = self.active.iter().find(|c| c.balance < required) {
            return Err(TournamentError::InsufficientFunds {
                id: short.id,
                balance: short.balance,
                required,
            });
        }

        Ok(())
    }

    /// Play the tournament to completion.
    ///
    /// # Errors
    ///
    /// Any configuration error, raised before the first round so no
    /// balance changes. The tournament stays `Registering` and can be
    /// fixed and run again. `InvalidState` if it has already run.
    pub fn run(&mut self) -> TournamentResult<TournamentSummary> {
        self.ensure_state(TournamentState::Registering)?;
        self.validate_start()?;

        self.state = TournamentState::Running;
        self.seated = self.active.len();
        self.started_at = Some(Utc::now());
        info!(
            "Starting tournament: {} contestants, {} bet {}, round limit {:?}, draw tax {} every {} draw(s)",
            self.seated,
            self.config.settlement,
            self.config.bet,
            self.config.round_limit,
            self.config.draw_tax.amount,
            self.config.draw_tax.threshold(),
        );

        let reason = self.play();

        self.state = TournamentState::Finished;
        self.finish_reason = Some(reason);
        self.finished_at = Some(Utc::now());
        let champion = self.ranking.champion().map(|c| c.id);
        self.push_event(TournamentEvent::Finished { reason, champion });
        info!(
            "Tournament finished after {} rounds ({} draws): {reason}",
            self.round,
            self.statistics.total_draws()
        );

        Ok(self.summary())
    }

    fn play(&mut self) -> FinishReason {
        loop {
            self.eliminate_insolvent();

            if self.active.len() < MIN_CONTESTANTS {
                self.crown_survivor();
                return FinishReason::LastSurvivor;
            }

            if self.is_cancelled() {
                warn!("Tournament cancelled after {} rounds", self.round);
                self.rank_by_balance();
                return FinishReason::Cancelled;
            }

            if self.config.max_rounds.is_some_and(|cap| self.round >= cap) {
                warn!("Tournament hit the safety cap of {} rounds", self.round);
                self.rank_by_balance();
                return FinishReason::SafetyCap;
            }

            self.play_round();

            if self.config.round_limit.is_some_and(|limit| self.round >= limit) {
                self.rank_by_balance();
                return FinishReason::RoundLimit;
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Next free rank counting up from the bottom.
    fn next_worst_rank(&self) -> usize {
        self.seated - self.ranking.len()
    }

    /// Move everyone who can't cover the bet into the ranking, worst
    /// rank first, in table order.
    fn eliminate_insolvent(&mut self) {
        let bet = self.config.bet;
        let (insolvent, solvent): (Vec<Contestant>, Vec<Contestant>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|c| c.balance < bet);
        self.active = solvent;

        for contestant in insolvent {
            let rank = self.next_worst_rank();
            self.push_event(TournamentEvent::Eliminated {
                id: contestant.id,
                rank,
                balance: contestant.balance,
            });
            self.ranking.place(rank, contestant);
        }
    }

    fn crown_survivor(&mut self) {
        if let Some(survivor) = self.active.pop() {
            let rank = self.next_worst_rank();
            debug_assert_eq!(rank, 1);
            self.ranking.place(rank, survivor);
        }
    }

    /// Rank everyone still playing by balance, highest first. The sort
    /// is stable so ties keep registration order.
    fn rank_by_balance(&mut self) {
        let mut remaining = std::mem::take(&mut self.active);
        remaining.sort_by_key(|c| Reverse(c.balance));
        for (i, contestant) in remaining.into_iter().enumerate() {
            self.ranking.place(i + 1, contestant);
        }
    }

    fn play_round(&mut self) {
        self.round += 1;
        let round = self.round;
        let bet = self.config.bet;
        let mode = self.config.settlement;

        let mut hands: BTreeMap<ContestantId, Hand> = BTreeMap::new();
        for contestant in &mut self.active {
            let hand = self.picker.pick(contestant.id);
            contestant.show_hand(hand);
            self.statistics.record_hand(hand);
            hands.insert(contestant.id, hand);
        }
        debug_assert!(self.active.iter().all(|c| c.current_hand.is_some()));
        debug!("round {round}: hands {hands:?}");

        let outcome = resolve_round(&hands);
        let order: Vec<ContestantId> = self.active.iter().map(|c| c.id).collect();
        let deltas = settle(&outcome, &order, bet, mode);

        for (contestant, (_, delta)) in self.active.iter_mut().zip(deltas) {
            contestant.apply_delta(delta);
            if outcome.is_winner(contestant.id) {
                contestant.record_win();
            }
            contestant.mark_round(round);
        }

        if outcome.is_draw {
            self.statistics.record_draw();
            self.draw_streak += 1;
            self.push_event(TournamentEvent::Draw {
                round,
                streak: self.draw_streak,
            });
            if self.draw_streak == self.config.draw_tax.threshold() {
                self.levy_draw_tax(round);
                self.draw_streak = 0;
            }
        } else {
            self.statistics.record_decisive();
            self.draw_streak = 0;
            self.push_event(TournamentEvent::RoundSettled {
                round,
                winners: outcome.winners.iter().copied().collect(),
                losers: outcome.losers.iter().copied().collect(),
            });
        }

        for contestant in &mut self.active {
            contestant.free_hand();
        }
    }

    fn levy_draw_tax(&mut self, round: u32) {
        let tax = self.config.draw_tax;
        if !tax.is_enabled() {
            return;
        }
        let collected: Coins = self
            .active
            .iter_mut()
            .map(|c| c.debit_capped(tax.amount))
            .sum();
        self.statistics.record_tax(collected);
        self.push_event(TournamentEvent::DrawTaxed { round, collected });
    }

    fn push_event(&mut self, event: TournamentEvent) {
        debug!("{event}");
        self.events.push_back(event);
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> VecDeque<TournamentEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn state(&self) -> TournamentState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    #[must_use]
    pub fn bet(&self) -> Coins {
        self.config.bet
    }

    #[must_use]
    pub fn draw_tax(&self) -> Coins {
        self.config.draw_tax.amount
    }

    #[must_use]
    pub fn draw_tax_rate(&self) -> u32 {
        self.config.draw_tax.rate
    }

    /// `None` when no round limit was configured.
    #[must_use]
    pub fn round_limit(&self) -> Option<u32> {
        self.config.round_limit
    }

    #[must_use]
    pub fn settlement(&self) -> SettlementMode {
        self.config.settlement
    }

    #[must_use]
    pub fn max_rounds(&self) -> Option<u32> {
        self.config.max_rounds
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn total_draws(&self) -> u32 {
        self.statistics.total_draws()
    }

    /// Hand counts, most frequent first.
    #[must_use]
    pub fn hand_frequency(&self) -> Vec<(Hand, u64)> {
        self.statistics.hand_frequency()
    }

    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    #[must_use]
    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Contestants not yet placed in the ranking.
    #[must_use]
    pub fn active(&self) -> &[Contestant] {
        &self.active
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    #[must_use]
    pub fn summary(&self) -> TournamentSummary {
        TournamentSummary {
            bet: self.config.bet,
            settlement: self.config.settlement,
            draw_tax: self.config.draw_tax.amount,
            draw_tax_rate: self.config.draw_tax.rate,
            round_limit: self.config.round_limit,
            rounds_played: self.round,
            total_draws: self.statistics.total_draws(),
            draw_tax_collected: self.statistics.draw_tax_collected(),
            hand_frequency: self.statistics.hand_frequency(),
            finish_reason: self.finish_reason,
            ranking: self.ranking.entries(),
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}
