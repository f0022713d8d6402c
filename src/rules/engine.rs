//! Match resolution engine: the pair-attempt state machine.
//!
//! ## States
//!
//! - **Idle**: nothing face up. Any unmatched card may be revealed.
//! - **OneSelected**: one card face up. A different unmatched card may be
//!   revealed; that completes a pair-attempt and counts a move.
//! - **Evaluating**: two cards face up. Equal symbols are matched on the
//!   spot and the board returns to Idle (or Won). Different symbols keep
//!   the board locked until `conceal` turns them face down again.
//! - **Won**: every pair matched. All reveal requests are ignored.
//!
//! The engine holds no state of its own and never waits. The delay before
//! concealment belongs to the caller, which schedules `conceal` when a
//! transition reports `PairMismatched`.

use tracing::{debug, info};

use super::events::{BoardEvent, IgnoreReason, RevealOutcome, Transition};
use crate::core::{CardId, GameState};

/// Applies reveal and conceal steps to a `GameState`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchEngine;

impl MatchEngine {
    /// Create a new engine.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check whether a reveal request would be accepted.
    ///
    /// Guards are checked in order: game over, locked board, unknown card,
    /// matched card, card already selected.
    pub fn check_reveal(&self, state: &GameState, id: CardId) -> Result<(), IgnoreReason> {
        if !state.active {
            return Err(IgnoreReason::GameOver);
        }
        if state.locked {
            return Err(IgnoreReason::Locked);
        }
        let card = state.card(id).ok_or(IgnoreReason::UnknownCard)?;
        if card.matched {
            return Err(IgnoreReason::AlreadyMatched);
        }
        if state.selection.contains(id) {
            return Err(IgnoreReason::AlreadySelected);
        }
        Ok(())
    }

    /// Cards that would currently accept a reveal request.
    #[must_use]
    pub fn legal_reveals(&self, state: &GameState) -> Vec<CardId> {
        state
            .cards
            .iter()
            .map(|c| c.id)
            .filter(|&id| self.check_reveal(state, id).is_ok())
            .collect()
    }

    /// Handle a request to turn a card face up.
    pub fn reveal(&self, state: &mut GameState, id: CardId) -> RevealOutcome {
        if let Err(reason) = self.check_reveal(state, id) {
            debug!(card = %id, ?reason, "reveal ignored");
            return RevealOutcome::Ignored(reason);
        }

        let mut transition = Transition::new();

        // First card of the attempt: just show it.
        let Some(first) = state.selection.iter().next() else {
            set_revealed(state, id, true);
            state.selection.insert(id);
            transition.push(BoardEvent::CardRevealed(id));
            debug!(card = %id, "first card revealed");
            return RevealOutcome::Applied(transition);
        };

        // Second card: count the attempt and compare.
        set_revealed(state, id, true);
        state.selection.insert(id);
        state.locked = true;
        state.moves += 1;
        transition.push(BoardEvent::CardRevealed(id));
        transition.push(BoardEvent::MoveCounted { moves: state.moves });

        let same = match (state.card(first), state.card(id)) {
            (Some(a), Some(b)) => a.symbol == b.symbol,
            _ => false,
        };

        if same {
            for card in [first, id] {
                if let Some(c) = state.card_mut(card) {
                    c.matched = true;
                }
            }
            state.matched_pairs += 1;
            state.selection.clear();
            state.locked = false;
            transition.push(BoardEvent::PairMatched { first, second: id });
            debug!(first = %first, second = %id, pairs = state.matched_pairs, "pair matched");

            if state.is_won() {
                state.active = false;
                transition.push(BoardEvent::GameWon {
                    moves: state.moves,
                    elapsed_seconds: state.elapsed_seconds,
                });
                info!(
                    moves = state.moves,
                    seconds = state.elapsed_seconds,
                    "all pairs matched"
                );
            }
        } else {
            transition.push(BoardEvent::PairMismatched { first, second: id });
            debug!(first = %first, second = %id, "pair mismatched");
        }

        RevealOutcome::Applied(transition)
    }

    /// Turn a mismatched pair face down and unlock the board.
    ///
    /// Only acts when the board is locked on exactly this pair (in either
    /// order). Anything else, such as a concealment left over from a game
    /// that has since been replaced, is a no-op returning an empty
    /// transition.
    pub fn conceal(&self, state: &mut GameState, first: CardId, second: CardId) -> Transition {
        let mut transition = Transition::new();

        let expected = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        if !state.locked || state.selection.pair() != Some(expected) {
            debug!(first = %first, second = %second, "stale conceal ignored");
            return transition;
        }

        set_revealed(state, first, false);
        set_revealed(state, second, false);
        state.selection.clear();
        state.locked = false;
        transition.push(BoardEvent::CardsConcealed { first, second });
        debug!(first = %first, second = %second, "pair concealed");

        transition
    }
}

fn set_revealed(state: &mut GameState, id: CardId, revealed: bool) {
    if let Some(card) = state.card_mut(id) {
        card.revealed = revealed;
    }
}
