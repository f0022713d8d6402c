//! In-memory stores.
//!
//! Handles share their backing data through `Rc<RefCell<_>>`, so a store
//! outlives any one `GameSession` that holds a clone of it. Dropping a
//! session and starting a new one over the same handle is how tests model
//! a page reload.

use std::cell::RefCell;
use std::rc::Rc;

use super::store::{CounterStore, SessionStore, StorageError};

/// Session store over shared in-memory bytes. Clones share the slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    slot: Rc<RefCell<Option<Vec<u8>>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a snapshot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }

    /// Overwrite the stored bytes directly, bypassing snapshot encoding.
    pub fn put_raw(&self, bytes: Vec<u8>) {
        *self.slot.borrow_mut() = Some(bytes);
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.slot.borrow().clone())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CounterCell {
    value: u64,
    next_id: u64,
    /// Per-handle queue of the latest value written by someone else.
    inboxes: Vec<(u64, Option<u64>)>,
}

/// One shared cumulative counter, standing in for storage that several
/// concurrently open instances can see.
///
/// Each instance takes its own `MemoryCounterStore` via `handle()`. A write
/// through one handle is reported to every other handle by
/// `take_external_change`.
#[derive(Clone, Debug, Default)]
pub struct SharedCounter {
    cell: Rc<RefCell<CounterCell>>,
}

impl SharedCounter {
    /// Create a counter starting at `value`.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self {
            cell: Rc::new(RefCell::new(CounterCell {
                value,
                ..CounterCell::default()
            })),
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.cell.borrow().value
    }

    /// Open a new handle onto the counter.
    #[must_use]
    pub fn handle(&self) -> MemoryCounterStore {
        let mut cell = self.cell.borrow_mut();
        let id = cell.next_id;
        cell.next_id += 1;
        cell.inboxes.push((id, None));
        MemoryCounterStore {
            cell: Rc::clone(&self.cell),
            id,
        }
    }
}

/// One instance's view of a `SharedCounter`.
#[derive(Debug)]
pub struct MemoryCounterStore {
    cell: Rc<RefCell<CounterCell>>,
    id: u64,
}

impl MemoryCounterStore {
    /// Standalone counter with no other holders.
    #[must_use]
    pub fn new() -> Self {
        SharedCounter::default().handle()
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterStore for MemoryCounterStore {
    fn read(&self) -> Result<u64, StorageError> {
        let mut cell = self.cell.borrow_mut();
        // Whatever was queued for us is no newer than what we just saw.
        if let Some((_, inbox)) = cell.inboxes.iter_mut().find(|(id, _)| *id == self.id) {
            *inbox = None;
        }
        Ok(cell.value)
    }

    fn write(&mut self, value: u64) -> Result<(), StorageError> {
        let mut cell = self.cell.borrow_mut();
        cell.value = value;
        for (id, inbox) in cell.inboxes.iter_mut() {
            *inbox = if *id == self.id { None } else { Some(value) };
        }
        Ok(())
    }

    fn take_external_change(&mut self) -> Option<u64> {
        let mut cell = self.cell.borrow_mut();
        cell.inboxes
            .iter_mut()
            .find(|(id, _)| *id == self.id)
            .and_then(|(_, inbox)| inbox.take())
    }
}

impl Drop for MemoryCounterStore {
    fn drop(&mut self) {
        if let Ok(mut cell) = self.cell.try_borrow_mut() {
            cell.inboxes.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_store_shared_between_clones() {
        let mut a = MemorySessionStore::new();
        let b = a.clone();

        a.save(b"snapshot").unwrap();
        assert_eq!(b.load().unwrap(), Some(b"snapshot".to_vec()));

        a.clear().unwrap();
        assert!(b.is_empty());
        assert_eq!(b.load().unwrap(), None);
    }

    #[test]
    fn test_clear_empty_store() {
        let mut store = MemorySessionStore::new();
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_counter_broadcasts_to_other_handles() {
        let shared = SharedCounter::new(5);
        let mut a = shared.handle();
        let mut b = shared.handle();

        assert_eq!(a.increment().unwrap(), 6);
        assert_eq!(a.take_external_change(), None);
        assert_eq!(b.take_external_change(), Some(6));
        assert_eq!(b.take_external_change(), None);
        assert_eq!(shared.value(), 6);
    }

    #[test]
    fn test_interleaved_increments_lose_one() {
        let shared = SharedCounter::new(5);
        let mut a = shared.handle();
        let mut b = shared.handle();

        let seen_a = a.read().unwrap();
        let seen_b = b.read().unwrap();
        a.write(seen_a + 1).unwrap();
        b.write(seen_b + 1).unwrap();

        assert_eq!(shared.value(), 6);
    }

    #[test]
    fn test_sequential_increments() {
        let shared = SharedCounter::new(5);
        let mut a = shared.handle();
        let mut b = shared.handle();

        a.increment().unwrap();
        b.increment().unwrap();

        assert_eq!(shared.value(), 7);
        assert_eq!(a.take_external_change(), Some(7));
    }

    #[test]
    fn test_own_read_clears_pending_change() {
        let shared = SharedCounter::new(5);
        let mut a = shared.handle();
        let mut b = shared.handle();

        a.increment().unwrap();
        assert_eq!(b.increment().unwrap(), 7);
        assert_eq!(b.take_external_change(), None);
        assert_eq!(a.take_external_change(), Some(7));
    }

    #[test]
    fn test_dropped_handle_leaves_inbox() {
        let shared = SharedCounter::new(0);
        let mut a = shared.handle();
        {
            let _b = shared.handle();
        }
        a.increment().unwrap();
        assert_eq!(shared.cell.borrow().inboxes.len(), 1);
    }
}
