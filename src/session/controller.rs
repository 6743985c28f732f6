//! Progression controller.
//!
//! `GameSession` owns everything a running game needs: level/round position,
//! the match engine, the round timer, the scheduler and the session bridge.
//! All mutation goes through four entry points:
//!
//! - `flip`: player input
//! - `advance_by`: the host moves the clock; due callbacks are applied in order
//! - `advance` / `retry` / `start_new_game`: phase-transition commands
//!
//! ## Dealing a round
//!
//! Every round start, whether it comes from a new game, an advance or a retry,
//! goes through the same path:
//! 1. Look up the level and deal a fresh deck (fails before touching state)
//! 2. Cancel every outstanding callback and stop the timer
//! 3. Bump the generation and enter Previewing
//! 4. Replace the board (`matched_pairs` -> 0, score kept) and reset the clock
//! 5. Schedule the end of the preview
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use memory_match::session::{GameSessionBuilder, MemoryStore, SessionEvent};
//! use memory_match::Phase;
//!
//! let store = MemoryStore::new().with_entry("currentPlayer", "Aiko");
//! let mut session = GameSessionBuilder::new().seed(42).start(store).unwrap();
//! assert_eq!(session.phase(), Phase::Previewing);
//!
//! let events = session.advance_by(Duration::from_secs(3));
//! assert!(matches!(events[0], SessionEvent::PlayStarted { level: 1, round: 1 }));
//! assert_eq!(session.phase(), Phase::Playing);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::bridge::SessionBridge;
use super::events::SessionEvent;
use super::store::KeyValueStore;
use super::view::{CardView, SessionView};
use crate::cards::{Card, CardId, DeckGenerator, SymbolPool};
use crate::core::catalog::LevelConfig;
use crate::core::config::GameSettings;
use crate::core::error::GameError;
use crate::core::rng::GameRng;
use crate::core::state::{Phase, SessionState};
use crate::rules::{FlipResult, MatchEngine, Resolution};
use crate::timing::{Fired, RoundTimer, Scheduler, TickOutcome, TimerEvent};

/// Where a session starts: a fresh game, or a restart carrying progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePoint {
    pub level: u32,
    pub round: u32,
    pub score: u64,
}

impl Default for ResumePoint {
    fn default() -> Self {
        Self {
            level: 1,
            round: 1,
            score: 0,
        }
    }
}

/// Builder for a [`GameSession`].
#[derive(Clone, Debug, Default)]
pub struct GameSessionBuilder {
    settings: GameSettings,
    pool: SymbolPool,
    seed: Option<u64>,
    resume: ResumePoint,
}

impl GameSessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use these settings instead of the defaults.
    pub fn settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Deal from this symbol pool instead of the default one.
    pub fn symbol_pool(mut self, pool: SymbolPool) -> Self {
        self.pool = pool;
        self
    }

    /// Fix the RNG seed. Without one the session seeds from OS entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start at a given level/round with a carried score.
    pub fn resume_from(mut self, resume: ResumePoint) -> Self {
        self.resume = resume;
        self
    }

    /// Start the session and deal the first round.
    ///
    /// Fails with `NoCurrentPlayer` if the store holds no player name, and with
    /// `InvalidLevel`/`InsufficientSymbols` if the first round can't be dealt.
    pub fn start<S: KeyValueStore>(self, store: S) -> Result<GameSession<S>, GameError> {
        self.settings.session.validate()?;

        let bridge = SessionBridge::new(store, self.settings.session.leaderboard_capacity);
        let player = bridge.current_player_name()?.ok_or(GameError::NoCurrentPlayer)?;

        check_round(self.resume.round, self.settings.session.rounds_per_level)?;

        let rng = match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let tick_ms = self.settings.session.tick_ms;

        let mut session = GameSession {
            deck: DeckGenerator::new(self.pool),
            rng,
            state: SessionState::new(self.resume.level, self.resume.round),
            engine: MatchEngine::new(self.resume.score),
            timer: RoundTimer::new(0, tick_ms),
            scheduler: Scheduler::new(),
            bridge,
            player,
            score_recorded: false,
            player_cleared: false,
            settings: self.settings,
        };

        info!(
            player = %session.player,
            level = self.resume.level,
            round = self.resume.round,
            score = self.resume.score,
            seed = session.rng.seed(),
            "Session started"
        );
        session.deal_round(self.resume.level, self.resume.round)?;
        Ok(session)
    }
}

fn check_round(round: u32, rounds_per_level: u32) -> Result<(), GameError> {
    if (1..=rounds_per_level).contains(&round) {
        Ok(())
    } else {
        Err(GameError::invalid_catalog(format!(
            "round {round} is outside 1..={rounds_per_level}"
        )))
    }
}

/// A running game for one player.
#[derive(Debug)]
pub struct GameSession<S> {
    settings: GameSettings,
    deck: DeckGenerator,
    rng: GameRng,
    state: SessionState,
    engine: MatchEngine,
    timer: RoundTimer,
    scheduler: Scheduler,
    bridge: SessionBridge<S>,
    player: String,
    /// Final score is on the leaderboard.
    score_recorded: bool,
    /// Current-player marker removed after the final score.
    player_cleared: bool,
}

impl<S: KeyValueStore> GameSession<S> {
    // === Commands ===

    /// Flip a card. Rejected flips change nothing.
    pub fn flip(&mut self, id: CardId) -> FlipResult {
        let result = self.engine.flip(id, self.state.phase, self.timer.remaining());

        if let Some(pair) = result.pending_pair() {
            let delay = if pair.is_match {
                self.settings.session.match_reveal_ms
            } else {
                self.settings.session.mismatch_reveal_ms
            };
            self.scheduler
                .schedule(delay, self.state.generation(), TimerEvent::Resolve(pair));
        }

        result
    }

    /// Move on from a completed round: next round, next level, or game over.
    ///
    /// Only valid in RoundComplete. Returns the phase entered.
    pub fn advance(&mut self) -> Result<Phase, GameError> {
        self.expect_phase("advance", Phase::RoundComplete)?;

        let (level, round) = (self.state.level, self.state.round);
        if round < self.settings.session.rounds_per_level {
            self.deal_round(level, round + 1)?;
        } else if level < self.settings.levels.max_level() {
            self.deal_round(level + 1, 1)?;
        } else {
            self.complete_game()?;
        }

        Ok(self.state.phase)
    }

    /// Replay the current level/round with a fresh deck after time ran out.
    ///
    /// Only valid in TimeUp. The score is kept.
    pub fn retry(&mut self) -> Result<Phase, GameError> {
        self.expect_phase("retry", Phase::TimeUp)?;
        self.deal_round(self.state.level, self.state.round)?;
        Ok(self.state.phase)
    }

    /// Start over at level 1, round 1, score 0.
    pub fn start_new_game(&mut self) -> Result<Phase, GameError> {
        self.restart_from(ResumePoint::default())
    }

    /// Start a new game at `resume`, valid from any phase.
    ///
    /// Re-reads the current player, which the previous game may have cleared.
    pub fn restart_from(&mut self, resume: ResumePoint) -> Result<Phase, GameError> {
        let player = self
            .bridge
            .current_player_name()?
            .ok_or(GameError::NoCurrentPlayer)?;
        check_round(resume.round, self.settings.session.rounds_per_level)?;

        self.deal_round(resume.level, resume.round)?;
        self.engine.reset_score(resume.score);
        self.player = player;
        self.score_recorded = false;
        self.player_cleared = false;

        info!(
            player = %self.player,
            level = resume.level,
            round = resume.round,
            score = resume.score,
            "New game"
        );
        Ok(self.state.phase)
    }

    /// Record the final score and clear the current player.
    ///
    /// Runs automatically when the game completes. Call again if the store
    /// failed: a step that already succeeded is not repeated, so the score is
    /// appended once. Returns `false` if there was nothing left to do.
    pub fn submit_final_score(&mut self) -> Result<bool, GameError> {
        if self.state.phase != Phase::GameComplete || (self.score_recorded && self.player_cleared) {
            return Ok(false);
        }

        if !self.score_recorded {
            self.bridge.append_score(&self.player, self.engine.score())?;
            self.score_recorded = true;
        }
        if !self.player_cleared {
            self.bridge.clear_current_player()?;
            self.player_cleared = true;
        }
        Ok(true)
    }

    // === Clock ===

    /// Advance the session clock by `elapsed`, applying every callback that
    /// comes due, in order.
    pub fn advance_by(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let until = self.scheduler.now_ms().saturating_add(elapsed_ms);

        let mut events = Vec::new();
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.dispatch(fired, &mut events);
        }
        self.scheduler.advance_clock(until);

        events
    }

    /// Time until the next callback is due, if any. A host may sleep this long.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler
            .next_due_ms()
            .map(|due| Duration::from_millis(due.saturating_sub(self.scheduler.now_ms())))
    }

    fn dispatch(&mut self, fired: Fired, events: &mut Vec<SessionEvent>) {
        if !self.state.is_current(fired.generation) {
            trace!(
                timer = %fired.id,
                generation = fired.generation,
                current = self.state.generation(),
                "Dropped stale callback"
            );
            return;
        }

        match fired.event {
            TimerEvent::PreviewEnd => self.on_preview_end(events),
            TimerEvent::Tick => self.on_tick(&fired, events),
            TimerEvent::Resolve(pair) => {
                // A pair still pending when time ran out stays as it is.
                if self.state.phase != Phase::Playing {
                    trace!(phase = ?self.state.phase, "Resolution skipped outside play");
                    return;
                }
                match self.engine.resolve(pair) {
                    Resolution::Matched { points } => {
                        events.push(SessionEvent::PairMatched {
                            first: pair.first,
                            second: pair.second,
                            points,
                            score: self.engine.score(),
                        });
                        if self.engine.is_complete() {
                            self.finish_round(events);
                        }
                    }
                    Resolution::Hidden => events.push(SessionEvent::PairHidden {
                        first: pair.first,
                        second: pair.second,
                    }),
                    Resolution::Stale => {}
                }
            }
        }
    }

    fn on_preview_end(&mut self, events: &mut Vec<SessionEvent>) {
        if self.state.phase != Phase::Previewing {
            return;
        }
        self.engine.end_preview();
        self.state.phase = Phase::Playing;
        self.timer.start(&mut self.scheduler, self.state.generation());

        debug!(level = self.state.level, round = self.state.round, "Transition: Previewing -> Playing");
        events.push(SessionEvent::PlayStarted {
            level: self.state.level,
            round: self.state.round,
        });
    }

    fn on_tick(&mut self, fired: &Fired, events: &mut Vec<SessionEvent>) {
        if !self.state.phase.is_timed() {
            return;
        }
        match self.timer.on_tick(&mut self.scheduler, fired) {
            TickOutcome::Running { remaining } => events.push(SessionEvent::Ticked { remaining }),
            TickOutcome::Expired => {
                self.state.phase = Phase::TimeUp;
                info!(
                    level = self.state.level,
                    round = self.state.round,
                    matched_pairs = self.engine.matched_pairs(),
                    "Time up"
                );
                debug!("Transition: Playing -> TimeUp");
                events.push(SessionEvent::Ticked { remaining: 0 });
                events.push(SessionEvent::TimeUp {
                    level: self.state.level,
                    round: self.state.round,
                });
            }
            TickOutcome::Stale => trace!(timer = %fired.id, "Ignored stray tick"),
        }
    }

    fn finish_round(&mut self, events: &mut Vec<SessionEvent>) {
        self.timer.stop(&mut self.scheduler);
        self.state.phase = Phase::RoundComplete;

        info!(
            level = self.state.level,
            round = self.state.round,
            score = self.engine.score(),
            time_remaining = self.timer.remaining(),
            "Round complete"
        );
        debug!("Transition: Playing -> RoundComplete");
        events.push(SessionEvent::RoundComplete {
            level: self.state.level,
            round: self.state.round,
        });
    }

    fn deal_round(&mut self, level: u32, round: u32) -> Result<(), GameError> {
        let config = *self.settings.levels.config_for(level)?;
        let cards = self.deck.generate(&config, &mut self.rng)?;

        let cancelled = self.scheduler.cancel_all();
        self.timer.reset(&mut self.scheduler, config.round_seconds);

        self.state.level = level;
        self.state.round = round;
        let generation = self.state.begin_round();

        self.engine.deal(
            cards,
            config.pair_count,
            self.settings.session.points_for_match(level),
        );
        self.engine.begin_preview();
        self.scheduler
            .schedule(self.settings.session.preview_ms, generation, TimerEvent::PreviewEnd);

        info!(
            player = %self.player,
            level,
            round,
            pairs = config.pair_count,
            seconds = config.round_seconds,
            generation,
            cancelled,
            "Round dealt"
        );
        Ok(())
    }

    fn complete_game(&mut self) -> Result<(), GameError> {
        self.scheduler.cancel_all();
        self.timer.stop(&mut self.scheduler);
        self.state.phase = Phase::GameComplete;

        info!(player = %self.player, score = self.engine.score(), "Game complete");
        debug!("Transition: RoundComplete -> GameComplete");
        self.submit_final_score()?;
        Ok(())
    }

    fn expect_phase(&self, command: &'static str, expected: Phase) -> Result<(), GameError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            debug!(command, phase = ?self.state.phase, "Command rejected");
            Err(GameError::InvalidCommand {
                command,
                phase: self.state.phase,
            })
        }
    }

    // === Queries ===

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Current level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.state.level
    }

    /// Current round within the level.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.state.round
    }

    /// Cumulative score.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.engine.score()
    }

    /// Pairs matched this round.
    #[must_use]
    pub fn matched_pairs(&self) -> u32 {
        self.engine.matched_pairs()
    }

    /// Seconds left on the round clock.
    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    /// Cards in grid order, symbols included.
    #[must_use]
    pub fn cards(&self) -> &im::Vector<Card> {
        self.engine.cards()
    }

    /// The match engine.
    #[must_use]
    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Level/round position and generation.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Name of the player this game is for.
    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player
    }

    /// Configuration of the current level.
    pub fn level_config(&self) -> Result<&LevelConfig, GameError> {
        self.settings.levels.config_for(self.state.level)
    }

    /// Settings the session runs with.
    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Progress to hand to a later restart.
    #[must_use]
    pub fn resume_point(&self) -> ResumePoint {
        ResumePoint {
            level: self.state.level,
            round: self.state.round,
            score: self.engine.score(),
        }
    }

    /// The session bridge.
    #[must_use]
    pub fn bridge(&self) -> &SessionBridge<S> {
        &self.bridge
    }

    /// Mutable access to the session bridge.
    pub fn bridge_mut(&mut self) -> &mut SessionBridge<S> {
        &mut self.bridge
    }

    /// Snapshot for a renderer.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let (rows, cols, round_seconds) = self
            .level_config()
            .map(|c| (c.rows, c.cols, c.round_seconds))
            .unwrap_or((0, 0, 0));

        SessionView {
            player: self.player.clone(),
            level: self.state.level,
            round: self.state.round,
            score: self.engine.score(),
            matched_pairs: self.engine.matched_pairs(),
            pair_count: self.engine.pair_count(),
            rows,
            cols,
            phase: self.state.phase,
            time_remaining_seconds: self.timer.remaining(),
            round_seconds,
            cards: self.engine.cards().iter().map(CardView::from).collect(),
        }
    }
}
