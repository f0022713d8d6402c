//! Cards and the identifiers that name them.
//!
//! A card's `CardId` is its board position. It is assigned once when the
//! deck is laid out and never changes for the lifetime of the game, so the
//! presentation layer can key its rendering projection by it.

use serde::{Deserialize, Serialize};

/// Board position of a card (0-indexed, row-major).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u16);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the position as an index into the card list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Opaque face identifier: a letter, an emoji, or a theme asset reference.
///
/// The engine only ever compares symbols for equality. Interpreting them
/// is the presenter's business.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolRef(pub String);

impl SymbolRef {
    /// Create a new symbol reference.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Get the symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SymbolRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SymbolRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single card on the board.
///
/// `revealed` means the face is currently visible; `matched` means the card
/// has been paired and is out of play. A matched card stays revealed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Board position.
    pub id: CardId,

    /// Face symbol shared with exactly one other card.
    pub symbol: SymbolRef,

    /// Paired and out of play.
    pub matched: bool,

    /// Face currently visible.
    pub revealed: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub fn new(id: CardId, symbol: SymbolRef) -> Self {
        Self {
            id,
            symbol,
            matched: false,
            revealed: false,
        }
    }

    /// Check if the card is face up but not yet paired.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.revealed && !self.matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_face_down() {
        let card = Card::new(CardId::new(3), SymbolRef::from("A"));

        assert_eq!(card.id.index(), 3);
        assert!(!card.revealed);
        assert!(!card.matched);
        assert!(!card.is_pending());
    }

    #[test]
    fn test_pending_excludes_matched() {
        let mut card = Card::new(CardId::new(0), SymbolRef::from("B"));
        card.revealed = true;
        assert!(card.is_pending());

        card.matched = true;
        assert!(!card.is_pending());
    }

    #[test]
    fn test_display() {
        assert_eq!(CardId::new(7).to_string(), "Card(7)");
        assert_eq!(SymbolRef::from("Q").to_string(), "Q");
    }
}
