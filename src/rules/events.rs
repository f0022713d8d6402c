//! Board events: descriptions of what one engine step changed.
//!
//! The engine never renders, persists, or schedules anything itself. Each
//! step returns a `Transition` listing its events in the order they
//! happened, and the session turns those into presenter calls, counter
//! updates, snapshot writes, and scheduled follow-ups.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::CardId;

/// Something that happened on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A card was turned face up.
    CardRevealed(CardId),

    /// A pair-attempt completed; `moves` is the new total.
    MoveCounted { moves: u32 },

    /// The two face-up cards share a symbol and are now matched.
    PairMatched { first: CardId, second: CardId },

    /// The two face-up cards differ. The board is locked until they are
    /// concealed.
    PairMismatched { first: CardId, second: CardId },

    /// A mismatched pair was turned face down and the board unlocked.
    CardsConcealed { first: CardId, second: CardId },

    /// The last pair was found. The game is no longer active.
    GameWon { moves: u32, elapsed_seconds: u32 },
}

/// Why a reveal request was ignored.
///
/// Ignored requests leave the state untouched and are not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// The game is already won.
    GameOver,
    /// A mismatched pair is awaiting concealment.
    Locked,
    /// No card has this ID.
    UnknownCard,
    /// The card is already matched.
    AlreadyMatched,
    /// The card is already face up in the current pair-attempt.
    AlreadySelected,
}

/// The ordered events of one engine step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    events: SmallVec<[BoardEvent; 4]>,
}

impl Transition {
    /// Create an empty transition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: BoardEvent) {
        self.events.push(event);
    }

    /// Events in the order they happened.
    #[must_use]
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Check if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Cards whose flags changed, each listed once, in event order.
    #[must_use]
    pub fn changed_cards(&self) -> SmallVec<[CardId; 2]> {
        let mut out: SmallVec<[CardId; 2]> = SmallVec::new();
        let mut add = |id: CardId| {
            if !out.contains(&id) {
                out.push(id);
            }
        };

        for event in &self.events {
            match *event {
                BoardEvent::CardRevealed(id) => add(id),
                BoardEvent::PairMatched { first, second }
                | BoardEvent::CardsConcealed { first, second } => {
                    add(first);
                    add(second);
                }
                BoardEvent::PairMismatched { .. }
                | BoardEvent::MoveCounted { .. }
                | BoardEvent::GameWon { .. } => {}
            }
        }
        out
    }

    /// Check if this step completed a pair-attempt.
    #[must_use]
    pub fn counted_move(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, BoardEvent::MoveCounted { .. }))
    }

    /// The mismatched pair that must be concealed later, if any.
    #[must_use]
    pub fn pending_conceal(&self) -> Option<(CardId, CardId)> {
        self.events.iter().find_map(|e| match *e {
            BoardEvent::PairMismatched { first, second } => Some((first, second)),
            _ => None,
        })
    }

    /// Final `(moves, elapsed_seconds)` if this step won the game.
    #[must_use]
    pub fn win(&self) -> Option<(u32, u32)> {
        self.events.iter().find_map(|e| match *e {
            BoardEvent::GameWon {
                moves,
                elapsed_seconds,
            } => Some((moves, elapsed_seconds)),
            _ => None,
        })
    }

    /// Check if this step won the game.
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.win().is_some()
    }
}

/// Result of a reveal request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// The request was dropped without touching the state.
    Ignored(IgnoreReason),
    /// The request changed the state.
    Applied(Transition),
}

impl RevealOutcome {
    /// The transition, if the request was applied.
    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            RevealOutcome::Applied(t) => Some(t),
            RevealOutcome::Ignored(_) => None,
        }
    }

    /// Check if the request was ignored.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, RevealOutcome::Ignored(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mismatch_step() -> Transition {
        let mut t = Transition::new();
        t.push(BoardEvent::CardRevealed(CardId::new(5)));
        t.push(BoardEvent::MoveCounted { moves: 3 });
        t.push(BoardEvent::PairMismatched {
            first: CardId::new(2),
            second: CardId::new(5),
        });
        t
    }

    #[test]
    fn test_changed_cards_deduplicates() {
        let mut t = Transition::new();
        t.push(BoardEvent::CardRevealed(CardId::new(5)));
        t.push(BoardEvent::MoveCounted { moves: 3 });
        t.push(BoardEvent::PairMatched {
            first: CardId::new(2),
            second: CardId::new(5),
        });

        assert_eq!(t.changed_cards().as_slice(), &[CardId::new(5), CardId::new(2)]);
    }

    #[test]
    fn test_mismatch_changes_only_new_card() {
        assert_eq!(mismatch_step().changed_cards().as_slice(), &[CardId::new(5)]);
    }

    #[test]
    fn test_queries() {
        let t = mismatch_step();

        assert!(t.counted_move());
        assert_eq!(t.pending_conceal(), Some((CardId::new(2), CardId::new(5))));
        assert!(!t.is_win());
        assert_eq!(t.events().len(), 3);
    }

    #[test]
    fn test_win_query() {
        let mut t = Transition::new();
        t.push(BoardEvent::GameWon {
            moves: 12,
            elapsed_seconds: 40,
        });

        assert_eq!(t.win(), Some((12, 40)));
        assert!(t.pending_conceal().is_none());
        assert!(t.changed_cards().is_empty());
    }

    #[test]
    fn test_outcome_helpers() {
        let ignored = RevealOutcome::Ignored(IgnoreReason::Locked);
        assert!(ignored.is_ignored());
        assert!(ignored.transition().is_none());

        let applied = RevealOutcome::Applied(mismatch_step());
        assert!(!applied.is_ignored());
        assert!(applied.transition().unwrap().counted_move());
    }

    #[test]
    fn test_serialization() {
        let t = mismatch_step();
        let json = serde_json::to_string(&t).unwrap();
        let deserialized: Transition = serde_json::from_str(&json).unwrap();
        assert_eq!(t, deserialized);
    }
}
