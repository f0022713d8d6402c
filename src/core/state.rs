//! Game state: the authoritative model of one game.
//!
//! ## GameState
//!
//! - Board: grid size, theme, the card list
//! - Selection: the 0-2 face-up cards of the current pair-attempt
//! - Counters: moves, matched pairs, elapsed seconds
//! - Flags: `locked` (a mismatch awaits concealment), `active` (not won)
//!
//! The state is mutated only by `rules::MatchEngine` and by the session's
//! timer tick (`elapsed_seconds`). Everything else reads it.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardId, SymbolRef};
use super::error::DeckError;
use super::grid::GridSize;
use crate::deck::ThemeId;

/// Cards of the current pair-attempt, kept in ascending id order.
///
/// Ordering by id (rather than click order) makes a selection rebuilt from
/// card flags compare equal to the one it was saved from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection(SmallVec<[CardId; 2]>);

impl Selection {
    /// Maximum cards in one pair-attempt.
    pub const CAPACITY: usize = 2;

    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card, keeping id order. Returns false if full or present.
    pub fn insert(&mut self, id: CardId) -> bool {
        if self.0.len() >= Self::CAPACITY || self.0.contains(&id) {
            return false;
        }
        let pos = self.0.partition_point(|&c| c < id);
        self.0.insert(pos, id);
        true
    }

    /// Check if a card is selected.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.0.contains(&id)
    }

    /// Number of selected cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Both cards, if the selection is full.
    #[must_use]
    pub fn pair(&self) -> Option<(CardId, CardId)> {
        match self.0.as_slice() {
            [a, b] => Some((*a, *b)),
            _ => None,
        }
    }

    /// Iterate over selected card IDs.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.0.iter().copied()
    }

    /// Remove all cards.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Where the board is in the pair-attempt cycle.
///
/// Derived from `selection`, `locked` and `active`; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardPhase {
    /// No card face up. Accepts any unmatched card.
    Idle,
    /// One card face up. Accepts a different unmatched card.
    OneSelected,
    /// A mismatched pair is face up and the board is locked until it is
    /// concealed.
    Evaluating,
    /// All pairs matched. Terminal.
    Won,
}

/// Complete state of one game.
///
/// Uses an `im` vector for the cards so taking a snapshot is O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Board dimension.
    pub grid_size: GridSize,

    /// Catalog the symbols were drawn from.
    pub theme: ThemeId,

    /// Cards in board order (`cards[i].id == i`).
    pub cards: Vector<Card>,

    /// Face-up cards of the current pair-attempt.
    pub selection: Selection,

    /// Completed pair-attempts.
    pub moves: u32,

    /// Pairs found so far.
    pub matched_pairs: u32,

    /// Seconds on the game clock.
    pub elapsed_seconds: u32,

    /// Input gate while a mismatched pair awaits concealment.
    pub locked: bool,

    /// False once the game is won.
    pub active: bool,
}

impl GameState {
    /// Create a fresh game from a fixed layout.
    ///
    /// `symbols[i]` becomes card `i`. The layout must have `grid²` entries
    /// with every symbol appearing exactly twice.
    pub fn from_symbols(
        grid_size: GridSize,
        theme: ThemeId,
        symbols: Vec<SymbolRef>,
    ) -> Result<Self, DeckError> {
        check_pairing(grid_size, &symbols)?;
        Ok(Self::dealt(grid_size, theme, symbols))
    }

    /// Lay out a layout already known to be paired.
    pub(crate) fn dealt(grid_size: GridSize, theme: ThemeId, symbols: Vec<SymbolRef>) -> Self {
        let cards = symbols
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| Card::new(CardId::new(i as u16), symbol))
            .collect();

        Self {
            grid_size,
            theme,
            cards,
            selection: Selection::new(),
            moves: 0,
            matched_pairs: 0,
            elapsed_seconds: 0,
            locked: false,
            active: true,
        }
    }

    /// Get a card by ID.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Get a mutable card by ID.
    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id.index())
    }

    /// Pairs needed to win.
    #[must_use]
    pub fn target_pairs(&self) -> u32 {
        self.grid_size.pair_count() as u32
    }

    /// Pairs not yet found.
    #[must_use]
    pub fn pairs_remaining(&self) -> u32 {
        self.target_pairs().saturating_sub(self.matched_pairs)
    }

    /// Check if every pair has been found.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.matched_pairs >= self.target_pairs()
    }

    /// Current phase of the pair-attempt cycle.
    #[must_use]
    pub fn phase(&self) -> BoardPhase {
        if !self.active {
            return BoardPhase::Won;
        }
        match self.selection.len() {
            0 => BoardPhase::Idle,
            1 => BoardPhase::OneSelected,
            _ => BoardPhase::Evaluating,
        }
    }

    /// Cards that are face up but not matched.
    pub fn pending_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.is_pending())
    }

    /// Verify every structural invariant of the state.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let symbols: Vec<SymbolRef> = self.cards.iter().map(|c| c.symbol.clone()).collect();
        check_pairing(self.grid_size, &symbols).map_err(|e| e.to_string())?;

        for (i, card) in self.cards.iter().enumerate() {
            if card.id.index() != i {
                return Err(format!("{} stored at position {}", card.id, i));
            }
            if card.matched && !card.revealed {
                return Err(format!("{} is matched but face down", card.id));
            }
        }

        if self.selection.len() > Selection::CAPACITY {
            return Err(format!("selection holds {} cards", self.selection.len()));
        }
        if self.locked != (self.selection.len() == Selection::CAPACITY) {
            return Err(format!(
                "locked={} with {} selected",
                self.locked,
                self.selection.len()
            ));
        }
        for id in self.selection.iter() {
            match self.card(id) {
                Some(card) if card.is_pending() => {}
                Some(_) => return Err(format!("selected {} is not pending", id)),
                None => return Err(format!("selected {} is off the board", id)),
            }
        }
        let pending = self.pending_cards().count();
        if pending != self.selection.len() {
            return Err(format!(
                "{} pending cards but {} selected",
                pending,
                self.selection.len()
            ));
        }

        let matched = self.cards.iter().filter(|c| c.matched).count();
        if matched != self.matched_pairs as usize * 2 {
            return Err(format!(
                "{} matched cards but matched_pairs={}",
                matched, self.matched_pairs
            ));
        }
        for card in self.cards.iter().filter(|c| c.matched) {
            let partner_matched = self
                .cards
                .iter()
                .any(|o| o.id != card.id && o.symbol == card.symbol && o.matched);
            if !partner_matched {
                return Err(format!("{} matched without its partner", card.id));
            }
        }

        if self.active == self.is_won() {
            return Err(format!(
                "active={} with {}/{} pairs",
                self.active,
                self.matched_pairs,
                self.target_pairs()
            ));
        }

        Ok(())
    }
}

/// Check that a layout fits the grid and pairs every symbol exactly twice.
pub(crate) fn check_pairing(grid_size: GridSize, symbols: &[SymbolRef]) -> Result<(), DeckError> {
    let expected = grid_size.card_count();
    if symbols.len() != expected {
        return Err(DeckError::WrongCardCount {
            expected,
            found: symbols.len(),
        });
    }

    let mut counts: FxHashMap<&SymbolRef, usize> = FxHashMap::default();
    for symbol in symbols {
        *counts.entry(symbol).or_insert(0) += 1;
    }

    // Report in board order so the error is deterministic.
    for symbol in symbols {
        let count = counts[symbol];
        if count != 2 {
            return Err(DeckError::UnpairedSymbol {
                symbol: symbol.clone(),
                count,
            });
        }
    }

    Ok(())
}
