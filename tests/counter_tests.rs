//! Cumulative move counter integration tests.
//!
//! The counter is shared by every open instance and updated
//! last-writer-wins: a read followed by a write, with no merge.

mod common;

use common::{find_mismatch, find_pair, start_session};
use memory_pairs::{
    CounterStore, FileCounterStore, MemorySessionStore, Persistence, SharedCounter,
};

fn attempt(session: &mut memory_pairs::GameSession<common::RecordingPresenter>) {
    let (a, b) = find_mismatch(session.state()).unwrap();
    session.on_reveal(a);
    session.on_reveal(b);
    session.advance(1_000);
}

// =============================================================================
// Last-writer-wins
// =============================================================================

/// Counter at 5, two instances each finish one attempt, one after the
/// other: both increments land.
#[test]
fn test_sequential_instances_reach_seven() {
    let shared = SharedCounter::new(5);
    let mut first = start_session(Persistence::new(MemorySessionStore::new(), shared.handle()));
    let mut second = start_session(Persistence::new(MemorySessionStore::new(), shared.handle()));

    attempt(&mut first);
    attempt(&mut second);

    assert_eq!(shared.value(), 7);
}

/// Counter at 5, both instances read before either writes: one increment
/// is lost.
#[test]
fn test_interleaved_instances_reach_six() {
    let shared = SharedCounter::new(5);
    let mut first = shared.handle();
    let mut second = shared.handle();

    let seen_first = first.read().unwrap();
    let seen_second = second.read().unwrap();
    first.write(seen_first + 1).unwrap();
    second.write(seen_second + 1).unwrap();

    assert_eq!(shared.value(), 6);
}

/// Only completed pair-attempts count, once each.
#[test]
fn test_counts_attempts_not_reveals() {
    let shared = SharedCounter::new(0);
    let mut session = start_session(Persistence::new(MemorySessionStore::new(), shared.handle()));

    let (a, b) = find_pair(session.state()).unwrap();
    session.on_reveal(a);
    assert_eq!(shared.value(), 0);
    session.on_reveal(a);
    assert_eq!(shared.value(), 0);
    session.on_reveal(b);
    assert_eq!(shared.value(), 1);
    assert_eq!(session.total_moves(), 1);
    assert_eq!(session.presenter().last_total(), Some(1));
}

/// The total survives a restart.
#[test]
fn test_total_spans_games() {
    let shared = SharedCounter::new(0);
    let mut session = start_session(Persistence::new(MemorySessionStore::new(), shared.handle()));

    attempt(&mut session);
    session.on_restart_requested().unwrap();
    attempt(&mut session);

    assert_eq!(session.state().moves, 1);
    assert_eq!(session.total_moves(), 2);
}

// =============================================================================
// External changes
// =============================================================================

/// A write by one instance shows up in the other on its next advance.
#[test]
fn test_external_change_reaches_other_instance() {
    let shared = SharedCounter::new(10);
    let mut first = start_session(Persistence::new(MemorySessionStore::new(), shared.handle()));
    let mut second = start_session(Persistence::new(MemorySessionStore::new(), shared.handle()));
    assert_eq!(second.total_moves(), 10);

    attempt(&mut first);
    assert_eq!(second.total_moves(), 10);

    second.advance(0);
    assert_eq!(second.total_moves(), 11);
    assert_eq!(second.presenter().last_total(), Some(11));
    assert_eq!(second.sync_total_moves(), None);
}

/// An instance's own increment supersedes an older write by another
/// instance, so the displayed total never rolls back.
#[test]
fn test_own_increment_supersedes_older_external_write() {
    let shared = SharedCounter::new(5);
    let mut first = start_session(Persistence::new(MemorySessionStore::new(), shared.handle()));
    let mut second = start_session(Persistence::new(MemorySessionStore::new(), shared.handle()));

    attempt(&mut first);
    attempt(&mut second);
    assert_eq!(second.total_moves(), 7);

    second.advance(0);
    assert_eq!(shared.value(), 7);
    assert_eq!(second.total_moves(), 7);
    assert_eq!(second.presenter().last_total(), Some(7));

    first.advance(0);
    assert_eq!(first.total_moves(), 7);
}

/// File counters shared by two instances see each other's writes.
#[test]
fn test_file_counter_between_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.json");
    FileCounterStore::new(&path).write(5).unwrap();

    let open = || Persistence::new(MemorySessionStore::new(), FileCounterStore::new(&path));
    let mut first = start_session(open());
    let mut second = start_session(open());

    attempt(&mut first);
    assert_eq!(second.sync_total_moves(), Some(6));

    attempt(&mut second);
    assert_eq!(second.total_moves(), 7);
    assert_eq!(first.sync_total_moves(), Some(7));
    assert_eq!(FileCounterStore::new(&path).read().unwrap(), 7);
}
