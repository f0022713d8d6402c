//! Timer service: deferred and periodic work on a virtual clock.
//!
//! Everything runs on the caller's thread. The host advances the clock and
//! the owner of the `Scheduler` handles each `Fired` task in due order.
//! Handles make every task cancellable, which is how the session keeps at
//! most one game-clock tick alive at a time.

mod scheduler;

pub use scheduler::{Fired, Scheduler, TaskHandle};
