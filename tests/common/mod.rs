//! Shared helpers for integration tests.

#![allow(dead_code)]

use im::Vector;
use memory_pairs::{
    Card, CardId, CatalogRegistry, EngineConfig, GameSession, GameState, GridSize, Persistence,
    Presenter, SymbolRef, ThemeId,
};
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Presenter that records every call.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    pub boards: Vec<(GridSize, usize)>,
    pub cards: Vec<Card>,
    pub stats: Vec<(u32, u32)>,
    pub totals: Vec<u64>,
    pub game_overs: Vec<(u32, u32)>,
    pub hides: usize,
}

impl RecordingPresenter {
    /// Last displayed cumulative total.
    pub fn last_total(&self) -> Option<u64> {
        self.totals.last().copied()
    }

    /// Last displayed `(moves, seconds)`.
    pub fn last_stats(&self) -> Option<(u32, u32)> {
        self.stats.last().copied()
    }
}

impl Presenter for RecordingPresenter {
    fn render_board(&mut self, grid_size: GridSize, cards: &Vector<Card>) {
        self.boards.push((grid_size, cards.len()));
    }

    fn render_card(&mut self, card: &Card) {
        self.cards.push(card.clone());
    }

    fn render_stats(&mut self, moves: u32, elapsed_seconds: u32) {
        self.stats.push((moves, elapsed_seconds));
    }

    fn render_total_moves(&mut self, total: u64) {
        self.totals.push(total);
    }

    fn show_game_over(&mut self, moves: u32, elapsed_seconds: u32) {
        self.game_overs.push((moves, elapsed_seconds));
    }

    fn hide_game_over(&mut self) {
        self.hides += 1;
    }
}

/// Fixed 4x4 board laid out `A A B B C C ... H H`.
pub fn sorted_board() -> GameState {
    let symbols = (b'A'..=b'H')
        .flat_map(|c| {
            let s = SymbolRef::new((c as char).to_string());
            [s.clone(), s]
        })
        .collect();
    GameState::from_symbols(GridSize::Four, ThemeId::new("letters"), symbols).unwrap()
}

/// Two unmatched cards sharing a symbol, lowest IDs first.
pub fn find_pair(state: &GameState) -> Option<(CardId, CardId)> {
    let cards: Vec<&Card> = state.cards.iter().filter(|c| !c.matched).collect();
    for (i, a) in cards.iter().enumerate() {
        if let Some(b) = cards[i + 1..].iter().find(|b| b.symbol == a.symbol) {
            return Some((a.id, b.id));
        }
    }
    None
}

/// Two unmatched cards with different symbols.
pub fn find_mismatch(state: &GameState) -> Option<(CardId, CardId)> {
    let first = state.cards.iter().find(|c| !c.matched)?;
    let second = state
        .cards
        .iter()
        .find(|c| !c.matched && c.symbol != first.symbol)?;
    Some((first.id, second.id))
}

/// Seeded 4x4 letters session over the given stores.
pub fn start_session(persistence: Persistence) -> GameSession<RecordingPresenter> {
    start_with(EngineConfig::default().with_seed(42), persistence)
}

/// Session with a custom config over the given stores.
pub fn start_with(
    config: EngineConfig,
    persistence: Persistence,
) -> GameSession<RecordingPresenter> {
    GameSession::start(
        config,
        CatalogRegistry::with_builtin(),
        persistence,
        RecordingPresenter::default(),
    )
    .unwrap()
}

/// Match every remaining pair.
pub fn solve(session: &mut GameSession<RecordingPresenter>) {
    while let Some((a, b)) = find_pair(session.state()) {
        session.on_reveal(a);
        session.on_reveal(b);
    }
}
