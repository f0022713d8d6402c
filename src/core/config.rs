//! Engine configuration parameters.

use serde::{Deserialize, Serialize};

use super::grid::GridSize;
use crate::deck::ThemeId;

/// Pause before a mismatched pair is turned face down again.
pub const MISMATCH_DELAY_MS: u64 = 1_000;

/// Pause between the winning match and the game-over announcement, so the
/// final match animation can finish.
pub const GAME_OVER_DELAY_MS: u64 = 500;

/// Game clock granularity.
pub const TICK_INTERVAL_MS: u64 = 1_000;

/// Engine configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Board size for fresh games.
    pub grid_size: GridSize,

    /// Symbol catalog for fresh games.
    pub theme: ThemeId,

    /// Delay before a mismatched pair is concealed (default: 1000ms).
    /// The board stays locked for the whole delay.
    pub mismatch_delay_ms: u64,

    /// Delay before the game-over notification (default: 500ms).
    pub game_over_delay_ms: u64,

    /// Interval between clock ticks (default: 1000ms).
    /// Each tick adds one second to the game clock.
    pub tick_interval_ms: u64,

    /// Shuffle seed. `None` seeds from entropy.
    /// Same seed produces the same sequence of layouts.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::Four,
            theme: ThemeId::new(crate::deck::LETTERS),
            mismatch_delay_ms: MISMATCH_DELAY_MS,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            tick_interval_ms: TICK_INTERVAL_MS,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with a custom grid size.
    pub fn with_grid_size(mut self, grid_size: GridSize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Create a new config with a custom theme.
    pub fn with_theme(mut self, theme: ThemeId) -> Self {
        self.theme = theme;
        self
    }

    /// Create a new config with a custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Create a new config with a custom mismatch delay.
    pub fn with_mismatch_delay_ms(mut self, delay_ms: u64) -> Self {
        self.mismatch_delay_ms = delay_ms;
        self
    }

    /// Create a new config with a custom game-over delay.
    pub fn with_game_over_delay_ms(mut self, delay_ms: u64) -> Self {
        self.game_over_delay_ms = delay_ms;
        self
    }

    /// Create a new config with a custom tick interval.
    ///
    /// Zero is clamped to 1ms so the clock can never spin in place.
    pub fn with_tick_interval_ms(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms.max(1);
        self
    }
}
