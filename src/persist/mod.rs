//! Persistence: session snapshots and the cumulative move counter.
//!
//! ## Scopes
//!
//! - **Session**: the in-progress game, written after every change so a
//!   reload resumes where the player left off. Cleared on win and on
//!   every new game.
//! - **Global**: total pair-attempts across all games and sessions.
//!
//! ## Failure policy
//!
//! Storage is optional. `Persistence` logs every failure with `warn!` and
//! carries on; a snapshot that cannot be decoded or validated is treated
//! as absent. Nothing here can stop a game from being played.

mod file;
mod memory;
mod snapshot;
mod store;

use tracing::{debug, warn};

pub use file::{FileCounterStore, FileSessionStore, COUNTER_FILE_VERSION};
pub use memory::{MemoryCounterStore, MemorySessionStore, SharedCounter};
pub use snapshot::{CardRecord, SessionSnapshot, SnapshotError, SNAPSHOT_VERSION};
pub use store::{CounterStore, SessionStore, StorageError, UnavailableStore};

use crate::core::GameState;

/// Both persistence scopes behind one fail-open facade.
pub struct Persistence {
    session: Box<dyn SessionStore>,
    counter: Box<dyn CounterStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Combine a session store and a counter store.
    pub fn new(
        session: impl SessionStore + 'static,
        counter: impl CounterStore + 'static,
    ) -> Self {
        Self {
            session: Box::new(session),
            counter: Box::new(counter),
        }
    }

    /// Fresh private in-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new(), MemoryCounterStore::new())
    }

    /// Stores that refuse everything. The game still runs.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(UnavailableStore, UnavailableStore)
    }

    /// Write a snapshot of `state`. Returns false on failure.
    pub fn save_state(&mut self, state: &GameState) -> bool {
        let bytes = match SessionSnapshot::capture(state).encode() {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%err, "snapshot not written");
                return false;
            }
        };
        match self.session.save(&bytes) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "snapshot not written");
                false
            }
        }
    }

    /// Restore the stored game, if there is a valid one.
    pub fn load_state(&self) -> Option<GameState> {
        let bytes = match self.session.load() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("no stored snapshot");
                return None;
            }
            Err(err) => {
                warn!(%err, "snapshot not readable");
                return None;
            }
        };

        match SessionSnapshot::decode(&bytes).and_then(SessionSnapshot::into_state) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(%err, "stored snapshot discarded");
                None
            }
        }
    }

    /// Remove the stored snapshot. Returns false on failure.
    pub fn clear_state(&mut self) -> bool {
        match self.session.clear() {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "snapshot not cleared");
                false
            }
        }
    }

    /// Add one to the cumulative counter, returning the new total.
    pub fn increment_counter(&mut self) -> Option<u64> {
        match self.counter.increment() {
            Ok(total) => Some(total),
            Err(err) => {
                warn!(%err, "move counter not updated");
                None
            }
        }
    }

    /// Current cumulative total.
    pub fn read_counter(&self) -> Option<u64> {
        match self.counter.read() {
            Ok(total) => Some(total),
            Err(err) => {
                warn!(%err, "move counter not readable");
                None
            }
        }
    }

    /// Total written by another instance since the last call, if any.
    pub fn take_external_change(&mut self) -> Option<u64> {
        self.counter.take_external_change()
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self::in_memory()
    }
}
