//! Engine error types.
//!
//! Rejected reveal requests are not errors (see `rules::RevealOutcome`).
//! The types here cover board construction: bad grid sizes, layouts that
//! break the pairing invariant, and catalogs too small for the board.

use derive_more::{Display, From};

use super::card::SymbolRef;
use crate::deck::CatalogError;

/// An integer outside the playable grid sizes {4, 6, 8}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("Unsupported grid size {} (expected 4, 6 or 8)", _0)]
pub struct GridSizeError(pub u8);

impl std::error::Error for GridSizeError {}

/// A card layout that cannot form a valid board.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DeckError {
    /// Layout length does not match the grid.
    #[display("Expected {} cards, found {}", expected, found)]
    WrongCardCount {
        /// `grid²`.
        expected: usize,
        /// Cards supplied.
        found: usize,
    },

    /// A symbol does not appear exactly twice.
    #[display("Symbol {} appears {} times (expected 2)", symbol, count)]
    UnpairedSymbol {
        /// The offending symbol.
        symbol: SymbolRef,
        /// How often it appears.
        count: usize,
    },
}

impl std::error::Error for DeckError {}

/// Errors that prevent a game from starting.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum GameError {
    /// The symbol catalog cannot supply the requested board.
    #[display("{}", _0)]
    Catalog(CatalogError),

    /// A caller-supplied layout is not a valid board.
    #[display("{}", _0)]
    Deck(DeckError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Catalog(err) => Some(err),
            GameError::Deck(err) => Some(err),
        }
    }
}
