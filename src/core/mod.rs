//! Core types: cards, grid, game state, RNG, configuration, errors.

pub mod card;
pub mod config;
pub mod error;
pub mod grid;
pub mod rng;
pub mod state;

pub use card::{Card, CardId, SymbolRef};
pub use config::{EngineConfig, GAME_OVER_DELAY_MS, MISMATCH_DELAY_MS, TICK_INTERVAL_MS};
pub use error::{DeckError, GameError, GridSizeError};
pub use grid::GridSize;
pub use rng::GameRng;
pub use state::{BoardPhase, GameState, Selection};
