//! # memory-pairs
//!
//! A matching-pairs memory card game engine.
//!
//! Players turn over two cards at a time. A matching pair stays face up;
//! a mismatched pair is shown briefly and then turned face down again.
//! The game is won when every pair is found.
//!
//! ## Design Principles
//!
//! 1. **Single-threaded and explicit**: every game instance is a
//!    `GameSession` value. No globals, no background threads. Deferred
//!    steps run on a virtual clock the host advances.
//!
//! 2. **Stale work is harmless**: timers belong to a `GameId`. Starting a
//!    new game cancels the old game's timers, and anything that still
//!    fires for an old game is ignored.
//!
//! 3. **Storage is optional**: snapshots and the cumulative counter are
//!    best-effort. Corrupt or missing data means a fresh game, never a
//!    failure.
//!
//! ## Modules
//!
//! - `core`: card and board types, game state, RNG, configuration, errors
//! - `deck`: symbol catalogs, themes, shuffled deck construction
//! - `rules`: the reveal/compare/conceal state machine
//! - `timer`: virtual-clock scheduler for delays and the game clock
//! - `persist`: versioned session snapshots and the move counter
//! - `session`: the controller tying it all to a `Presenter`
//!
//! ## Example
//!
//! ```
//! use memory_pairs::{
//!     CatalogRegistry, EngineConfig, GameSession, NullPresenter, Persistence,
//! };
//!
//! let mut session = GameSession::start(
//!     EngineConfig::default().with_seed(7),
//!     CatalogRegistry::with_builtin(),
//!     Persistence::in_memory(),
//!     NullPresenter,
//! )
//! .unwrap();
//!
//! let first = session.state().cards[0].id;
//! session.on_reveal(first);
//! session.advance(1_000);
//! assert_eq!(session.state().elapsed_seconds, 1);
//! ```

pub mod core;
pub mod deck;
pub mod persist;
pub mod rules;
pub mod session;
pub mod timer;

// Re-export commonly used types
pub use crate::core::{
    BoardPhase, Card, CardId, DeckError, EngineConfig, GameError, GameRng, GameState, GridSize,
    GridSizeError, Selection, SymbolRef,
};

pub use crate::deck::{CatalogError, CatalogRegistry, DeckBuilder, SymbolCatalog, ThemeId};

pub use crate::rules::{BoardEvent, IgnoreReason, MatchEngine, RevealOutcome, Transition};

pub use crate::timer::{Fired, Scheduler, TaskHandle};

pub use crate::persist::{
    CounterStore, FileCounterStore, FileSessionStore, MemoryCounterStore, MemorySessionStore,
    Persistence, SessionSnapshot, SessionStore, SharedCounter, SnapshotError, StorageError,
};

pub use crate::session::{format_clock, GameId, GameSession, NullPresenter, Presenter, ScheduledTask};
