//! Session control: one running game wired to timers, storage and display.
//!
//! A host creates a `GameSession` with a `Presenter`, forwards player input
//! to it (`on_reveal`, `on_restart_requested`, `on_grid_size_changed`,
//! `on_theme_changed`) and calls `advance` as real time passes.

mod controller;
mod presenter;

pub use controller::{GameId, GameSession, ScheduledTask};
pub use presenter::{format_clock, NullPresenter, Presenter};
