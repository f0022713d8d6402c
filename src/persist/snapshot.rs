//! Versioned session snapshot schema.
//!
//! ## Wire format
//!
//! ```text
//! SnapshotEnvelope { version: u16, payload: bincode(SessionSnapshot) }
//! ```
//!
//! The envelope is decoded first so a snapshot written by a different
//! schema version is rejected before its payload is looked at. Rejected
//! snapshots are treated as absent by the persistence layer.
//!
//! `selection` and `locked` are not stored: they are rebuilt from the
//! cards that are face up but not matched.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::state::check_pairing;
use crate::core::{CardId, GameState, GridSize, SymbolRef};
use crate::deck::ThemeId;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Why a snapshot could not be written or restored.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SnapshotError {
    /// Written by a different schema version.
    #[display("Snapshot version {} (expected {})", found, expected)]
    VersionMismatch {
        /// Version found in the envelope.
        found: u16,
        /// Version this build reads.
        expected: u16,
    },

    /// Bytes could not be decoded.
    #[display("Snapshot decode failed: {}", _0)]
    Decode(String),

    /// State could not be encoded.
    #[display("Snapshot encode failed: {}", _0)]
    Encode(String),

    /// Decoded fine but describes an impossible game.
    #[display("Inconsistent snapshot: {}", _0)]
    Inconsistent(String),
}

impl std::error::Error for SnapshotError {}

#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u16,
    payload: Vec<u8>,
}

/// One card in a snapshot. Its ID is its position in the list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Face symbol.
    pub symbol: String,
    /// Paired and out of play.
    pub matched: bool,
    /// Face up.
    pub revealed: bool,
}

/// Serialized copy of a `GameState` for crash/reload recovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Board dimension (4, 6 or 8).
    pub grid_size: u8,
    /// Theme the symbols came from.
    pub theme: String,
    /// Cards in board order.
    pub cards: Vec<CardRecord>,
    /// Completed pair-attempts.
    pub moves: u32,
    /// Seconds on the game clock.
    pub elapsed_seconds: u32,
    /// Pairs found.
    pub matched_pairs: u32,
    /// False once won.
    pub active: bool,
}

impl SessionSnapshot {
    /// Capture the persistent parts of a state.
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        Self {
            grid_size: state.grid_size.dimension(),
            theme: state.theme.as_str().to_string(),
            cards: state
                .cards
                .iter()
                .map(|c| CardRecord {
                    symbol: c.symbol.as_str().to_string(),
                    matched: c.matched,
                    revealed: c.revealed,
                })
                .collect(),
            moves: state.moves,
            elapsed_seconds: state.elapsed_seconds,
            matched_pairs: state.matched_pairs,
            active: state.active,
        }
    }

    /// Encode into the versioned wire format.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        let payload = bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))?;
        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_VERSION,
            payload,
        };
        bincode::serialize(&envelope).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Decode from the versioned wire format.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let envelope: SnapshotEnvelope =
            bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))?;

        if envelope.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: envelope.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        bincode::deserialize(&envelope.payload).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Rebuild a live state, validating every invariant on the way.
    ///
    /// Finished games are rejected: a won game is never resumed.
    pub fn into_state(self) -> Result<GameState, SnapshotError> {
        let grid_size = GridSize::try_from(self.grid_size).map_err(inconsistent)?;

        if self.theme.is_empty() {
            return Err(inconsistent("empty theme"));
        }
        if !self.active {
            return Err(inconsistent("game already finished"));
        }

        let symbols: Vec<SymbolRef> = self
            .cards
            .iter()
            .map(|c| SymbolRef::new(c.symbol.clone()))
            .collect();
        check_pairing(grid_size, &symbols).map_err(inconsistent)?;

        let mut state = GameState::dealt(grid_size, ThemeId::new(self.theme), symbols);
        state.moves = self.moves;
        state.elapsed_seconds = self.elapsed_seconds;
        state.matched_pairs = self.matched_pairs;

        for (i, record) in self.cards.iter().enumerate() {
            if record.matched && !record.revealed {
                return Err(inconsistent(format!("card {} matched but face down", i)));
            }
            if let Some(card) = state.card_mut(CardId::new(i as u16)) {
                card.matched = record.matched;
                card.revealed = record.revealed;
            }
        }

        if state.is_won() {
            return Err(inconsistent("all pairs already matched"));
        }
        if state.moves < state.matched_pairs {
            return Err(inconsistent(format!(
                "{} pairs found in {} moves",
                state.matched_pairs, state.moves
            )));
        }

        let pending: Vec<CardId> = state.pending_cards().map(|c| c.id).collect();
        if pending.len() > 2 {
            return Err(inconsistent(format!("{} cards face up", pending.len())));
        }
        for id in pending {
            state.selection.insert(id);
        }
        if let Some((a, b)) = state.selection.pair() {
            let same = state.card(a).map(|c| &c.symbol) == state.card(b).map(|c| &c.symbol);
            if same {
                return Err(inconsistent("face-up pair matches but was not resolved"));
            }
            state.locked = true;
        }

        state.check_invariants().map_err(inconsistent)?;
        Ok(state)
    }
}

fn inconsistent(reason: impl ToString) -> SnapshotError {
    SnapshotError::Inconsistent(reason.to_string())
}
