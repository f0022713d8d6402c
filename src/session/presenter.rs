//! Presentation boundary.
//!
//! The session pushes every visible change through a `Presenter`. Only
//! `render_card` and `show_game_over` are required; a board render falls
//! back to rendering each card.

use im::Vector;

use crate::core::{Card, GridSize};

/// Receives display updates from a `GameSession`.
pub trait Presenter {
    /// Lay out a whole new board.
    fn render_board(&mut self, _grid_size: GridSize, cards: &Vector<Card>) {
        for card in cards.iter() {
            self.render_card(card);
        }
    }

    /// Show one card's face state.
    fn render_card(&mut self, card: &Card);

    /// Update the move count and game clock.
    fn render_stats(&mut self, _moves: u32, _elapsed_seconds: u32) {}

    /// Update the cumulative move total.
    fn render_total_moves(&mut self, _total: u64) {}

    /// Announce a finished game.
    fn show_game_over(&mut self, moves: u32, elapsed_seconds: u32);

    /// Dismiss the game-over announcement.
    fn hide_game_over(&mut self) {}
}

/// Presenter that displays nothing, for headless hosts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render_card(&mut self, _card: &Card) {}

    fn show_game_over(&mut self, _moves: u32, _elapsed_seconds: u32) {}
}

/// Format a game clock as `MM:SS`. Minutes keep counting past 99.
#[must_use]
pub fn format_clock(elapsed_seconds: u32) -> String {
    format!("{:02}:{:02}", elapsed_seconds / 60, elapsed_seconds % 60)
}
