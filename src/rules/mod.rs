//! Match resolution: the reveal/compare/conceal state machine.
//!
//! `MatchEngine` applies one step at a time to a `GameState` and returns a
//! `Transition` describing what changed. It does not know about timers,
//! storage, or rendering; the session controller reacts to the events.

mod engine;
mod events;

pub use engine::MatchEngine;
pub use events::{BoardEvent, IgnoreReason, RevealOutcome, Transition};
