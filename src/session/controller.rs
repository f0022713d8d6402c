//! Game session controller.
//!
//! `GameSession` wires the engine, the scheduler, persistence and a
//! presenter together for one running game instance. All work happens on
//! the caller's thread: commands (`on_reveal`, restarts) run immediately,
//! and deferred work fires from `advance`.
//!
//! ## Deferred work
//!
//! | Task          | Scheduled                    | Effect                          |
//! |---------------|------------------------------|---------------------------------|
//! | `Tick`        | repeating, while active      | `elapsed_seconds += 1`          |
//! | `Conceal`     | once, after a mismatch       | turn the pair face down, unlock |
//! | `AnnounceWin` | once, after the winning pair | `show_game_over`                |
//!
//! Every task carries the `GameId` it was scheduled for. Starting a new
//! game cancels the old game's tasks, and a task that fires for a game
//! that is no longer current does nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

use super::presenter::Presenter;
use crate::core::{BoardPhase, CardId, EngineConfig, GameError, GameRng, GameState, GridSize};
use crate::deck::{CatalogRegistry, DeckBuilder, ThemeId};
use crate::persist::Persistence;
use crate::rules::{MatchEngine, RevealOutcome, Transition};
use crate::timer::{Scheduler, TaskHandle};

/// Identifies one dealt game within a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl GameId {
    /// Create a new game ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The ID after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

/// Deferred work owned by a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduledTask {
    /// One second of game clock.
    Tick {
        /// Game the clock belongs to.
        game: GameId,
    },
    /// Turn a mismatched pair face down.
    Conceal {
        /// Game the pair belongs to.
        game: GameId,
        /// First card of the pair.
        first: CardId,
        /// Second card of the pair.
        second: CardId,
    },
    /// Show the game-over announcement.
    AnnounceWin {
        /// Game that was won.
        game: GameId,
    },
}

impl ScheduledTask {
    /// Game this task was scheduled for.
    #[must_use]
    pub fn game(&self) -> GameId {
        match self {
            ScheduledTask::Tick { game }
            | ScheduledTask::Conceal { game, .. }
            | ScheduledTask::AnnounceWin { game } => *game,
        }
    }
}

/// One running game instance and everything it drives.
pub struct GameSession<P: Presenter> {
    config: EngineConfig,
    catalogs: CatalogRegistry,
    engine: MatchEngine,
    state: GameState,
    rng: GameRng,
    scheduler: Scheduler<ScheduledTask>,
    tick: Option<TaskHandle>,
    persistence: Persistence,
    presenter: P,
    game_id: GameId,
    total_moves: u64,
}

impl<P: Presenter> GameSession<P> {
    /// Start a session.
    ///
    /// A valid stored snapshot is resumed as-is, including a mismatched
    /// pair still waiting to be turned back over. Otherwise a fresh game
    /// is dealt from `config.grid_size` and `config.theme`, and catalog
    /// errors are returned.
    #[instrument(skip_all)]
    pub fn start(
        mut config: EngineConfig,
        catalogs: CatalogRegistry,
        persistence: Persistence,
        presenter: P,
    ) -> Result<Self, GameError> {
        let mut rng = GameRng::from_seed_or_entropy(config.seed);

        let restored = persistence.load_state().filter(|state| {
            let known = catalogs.contains(&state.theme);
            if !known {
                warn!(theme = %state.theme, "snapshot theme not registered, dealing fresh");
            }
            known
        });

        let (state, resumed) = match restored {
            Some(state) => {
                config.grid_size = state.grid_size;
                config.theme = state.theme.clone();
                (state, true)
            }
            None => {
                let catalog = catalogs.require(&config.theme)?;
                let state = DeckBuilder::new(catalog, config.grid_size)?.build(&mut rng);
                (state, false)
            }
        };

        let total_moves = persistence.read_counter().unwrap_or(0);

        let mut session = Self {
            config,
            catalogs,
            engine: MatchEngine::new(),
            state,
            rng,
            scheduler: Scheduler::new(),
            tick: None,
            persistence,
            presenter,
            game_id: GameId::default(),
            total_moves,
        };

        if resumed {
            info!(
                grid = %session.state.grid_size,
                theme = %session.state.theme,
                moves = session.state.moves,
                pairs = session.state.matched_pairs,
                seconds = session.state.elapsed_seconds,
                "resumed stored game"
            );
        } else {
            info!(
                grid = %session.state.grid_size,
                theme = %session.state.theme,
                "new game"
            );
        }

        session.render_all();
        session.start_timer();

        if let Some((first, second)) = session.state.selection.pair() {
            session.schedule_conceal(first, second);
        }
        if !resumed {
            session.persistence.save_state(&session.state);
        }

        Ok(session)
    }

    /// Handle a request to turn a card face up.
    #[instrument(skip(self))]
    pub fn on_reveal(&mut self, id: CardId) -> RevealOutcome {
        let outcome = self.engine.reveal(&mut self.state, id);
        let RevealOutcome::Applied(transition) = &outcome else {
            return outcome;
        };

        self.render_changes(transition);

        if transition.counted_move() {
            self.presenter
                .render_stats(self.state.moves, self.state.elapsed_seconds);
            let total = self
                .persistence
                .increment_counter()
                .unwrap_or(self.total_moves.saturating_add(1));
            self.total_moves = total;
            self.presenter.render_total_moves(total);
        }

        if let Some((first, second)) = transition.pending_conceal() {
            self.schedule_conceal(first, second);
        }

        if transition.is_win() {
            self.stop_timer();
            self.persistence.clear_state();
            self.scheduler.schedule_once(
                self.config.game_over_delay_ms,
                ScheduledTask::AnnounceWin { game: self.game_id },
            );
            info!(game = %self.game_id, moves = self.state.moves, "game won");
        } else {
            self.persistence.save_state(&self.state);
        }

        outcome
    }

    /// Deal a new game with the current grid size and theme.
    #[instrument(skip(self))]
    pub fn on_restart_requested(&mut self) -> Result<(), GameError> {
        let grid_size = self.state.grid_size;
        let theme = self.state.theme.clone();
        self.begin_new_game(grid_size, theme)
    }

    /// Deal a new game on a different board size.
    #[instrument(skip(self))]
    pub fn on_grid_size_changed(&mut self, grid_size: GridSize) -> Result<(), GameError> {
        let theme = self.state.theme.clone();
        self.begin_new_game(grid_size, theme)
    }

    /// Deal a new game from a different symbol catalog.
    #[instrument(skip(self))]
    pub fn on_theme_changed(&mut self, theme: ThemeId) -> Result<(), GameError> {
        let grid_size = self.state.grid_size;
        self.begin_new_game(grid_size, theme)
    }

    /// Move the clock forward and run everything that came due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until_ms = self.scheduler.now_ms().saturating_add(elapsed_ms);
        while let Some(fired) = self.scheduler.pop_due(until_ms) {
            self.run_task(fired.task);
        }
        self.scheduler.advance_to(until_ms);
        self.sync_total_moves();
    }

    /// Cancel all deferred work. The state stays as it is.
    pub fn stop(&mut self) {
        self.scheduler.clear();
        self.tick = None;
        debug!(game = %self.game_id, "session stopped");
    }

    /// Pick up a cumulative total written by another instance.
    ///
    /// Returns the new total if one arrived.
    pub fn sync_total_moves(&mut self) -> Option<u64> {
        let total = self.persistence.take_external_change()?;
        if total != self.total_moves {
            debug!(total, "external move total");
            self.total_moves = total;
            self.presenter.render_total_moves(total);
        }
        Some(total)
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current phase of the pair-attempt cycle.
    #[must_use]
    pub fn phase(&self) -> BoardPhase {
        self.state.phase()
    }

    /// ID of the current game.
    #[must_use]
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Cumulative moves across all games, as last seen.
    #[must_use]
    pub fn total_moves(&self) -> u64 {
        self.total_moves
    }

    /// Session clock in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Check if the game clock is ticking.
    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.tick
            .map_or(false, |handle| self.scheduler.is_scheduled(handle))
    }

    /// Number of deferred tasks waiting to fire.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    /// The presenter.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The presenter, mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Session configuration, tracking the current grid size and theme.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registered symbol catalogs.
    #[must_use]
    pub fn catalogs(&self) -> &CatalogRegistry {
        &self.catalogs
    }

    fn begin_new_game(&mut self, grid_size: GridSize, theme: ThemeId) -> Result<(), GameError> {
        // Deal first: a bad theme or grid leaves the running game alone.
        let catalog = self.catalogs.require(&theme)?;
        let state = DeckBuilder::new(catalog, grid_size)?.build(&mut self.rng);

        let old = self.game_id;
        let cancelled = self.scheduler.cancel_where(|task| task.game() == old);
        self.tick = None;
        self.persistence.clear_state();

        self.game_id = old.next();
        self.state = state;
        self.config.grid_size = grid_size;
        self.config.theme = theme;

        info!(
            game = %self.game_id,
            grid = %grid_size,
            theme = %self.config.theme,
            cancelled,
            "new game"
        );

        self.presenter.hide_game_over();
        self.render_all();
        self.start_timer();
        self.persistence.save_state(&self.state);
        Ok(())
    }

    fn run_task(&mut self, task: ScheduledTask) {
        if task.game() != self.game_id {
            debug!(?task, current = %self.game_id, "stale task ignored");
            return;
        }

        match task {
            ScheduledTask::Tick { .. } => {
                if !self.state.active {
                    self.stop_timer();
                    return;
                }
                self.state.elapsed_seconds = self.state.elapsed_seconds.saturating_add(1);
                trace!(seconds = self.state.elapsed_seconds, "tick");
                self.presenter
                    .render_stats(self.state.moves, self.state.elapsed_seconds);
                self.persistence.save_state(&self.state);
            }
            ScheduledTask::Conceal { first, second, .. } => {
                let transition = self.engine.conceal(&mut self.state, first, second);
                if transition.is_empty() {
                    return;
                }
                self.render_changes(&transition);
                self.persistence.save_state(&self.state);
            }
            ScheduledTask::AnnounceWin { .. } => {
                info!(
                    game = %self.game_id,
                    moves = self.state.moves,
                    seconds = self.state.elapsed_seconds,
                    "announcing win"
                );
                self.presenter
                    .show_game_over(self.state.moves, self.state.elapsed_seconds);
            }
        }
    }

    fn start_timer(&mut self) {
        self.stop_timer();
        if !self.state.active {
            return;
        }
        let handle = self.scheduler.schedule_repeating(
            self.config.tick_interval_ms,
            ScheduledTask::Tick { game: self.game_id },
        );
        self.tick = Some(handle);
    }

    fn stop_timer(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn schedule_conceal(&mut self, first: CardId, second: CardId) {
        self.scheduler.schedule_once(
            self.config.mismatch_delay_ms,
            ScheduledTask::Conceal {
                game: self.game_id,
                first,
                second,
            },
        );
    }

    fn render_changes(&mut self, transition: &Transition) {
        for id in transition.changed_cards() {
            if let Some(card) = self.state.card(id) {
                self.presenter.render_card(card);
            }
        }
    }

    fn render_all(&mut self) {
        self.presenter
            .render_board(self.state.grid_size, &self.state.cards);
        self.presenter
            .render_stats(self.state.moves, self.state.elapsed_seconds);
        self.presenter.render_total_moves(self.total_moves);
    }
}

impl<P: Presenter + std::fmt::Debug> std::fmt::Debug for GameSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("game_id", &self.game_id)
            .field("phase", &self.state.phase())
            .field("now_ms", &self.scheduler.now_ms())
            .field("presenter", &self.presenter)
            .finish_non_exhaustive()
    }
}
