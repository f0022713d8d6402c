//! Board dimensions.

use serde::{Deserialize, Serialize};

use super::error::GridSizeError;

/// Square board dimension. Only even sizes are playable, so every board
/// splits cleanly into pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridSize {
    /// 4x4: 16 cards, 8 pairs.
    #[default]
    Four,
    /// 6x6: 36 cards, 18 pairs.
    Six,
    /// 8x8: 64 cards, 32 pairs.
    Eight,
}

impl GridSize {
    /// All playable sizes, smallest first.
    pub const ALL: [GridSize; 3] = [GridSize::Four, GridSize::Six, GridSize::Eight];

    /// Side length of the board.
    #[must_use]
    pub const fn dimension(self) -> u8 {
        match self {
            GridSize::Four => 4,
            GridSize::Six => 6,
            GridSize::Eight => 8,
        }
    }

    /// Total number of cards (`dimension²`).
    #[must_use]
    pub const fn card_count(self) -> usize {
        let d = self.dimension() as usize;
        d * d
    }

    /// Number of pairs needed to win (`dimension² / 2`).
    #[must_use]
    pub const fn pair_count(self) -> usize {
        self.card_count() / 2
    }
}

impl TryFrom<u8> for GridSize {
    type Error = GridSizeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(GridSize::Four),
            6 => Ok(GridSize::Six),
            8 => Ok(GridSize::Eight),
            other => Err(GridSizeError(other)),
        }
    }
}

impl From<GridSize> for u8 {
    fn from(value: GridSize) -> Self {
        value.dimension()
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = self.dimension();
        write!(f, "{}x{}", d, d)
    }
}
