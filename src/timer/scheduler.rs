//! Virtual-clock task scheduler.
//!
//! The clock only moves when the host says so (`pop_due` / `advance_to`),
//! which keeps every deferred step on the caller's thread and makes timing
//! fully reproducible in tests.

use serde::{Deserialize, Serialize};

/// Handle to a scheduled task, used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskHandle(pub u64);

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// A task that came due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<T> {
    /// Handle the task was scheduled under.
    pub handle: TaskHandle,
    /// Clock time the task was due (the clock now reads this).
    pub due_ms: u64,
    /// The task payload.
    pub task: T,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    handle: TaskHandle,
    due_ms: u64,
    /// Scheduling order, breaks ties between equal due times.
    seq: u64,
    /// `Some` for repeating tasks.
    interval_ms: Option<u64>,
    task: T,
}

/// Single-threaded scheduler over a virtual millisecond clock.
///
/// ## Example
///
/// ```
/// use memory_pairs::timer::Scheduler;
///
/// let mut scheduler = Scheduler::new();
/// let tick = scheduler.schedule_repeating(1_000, "tick");
/// scheduler.schedule_once(1_500, "conceal");
///
/// let mut fired = Vec::new();
/// while let Some(f) = scheduler.pop_due(2_000) {
///     fired.push((f.due_ms, f.task));
/// }
/// assert_eq!(fired, vec![(1_000, "tick"), (1_500, "conceal"), (2_000, "tick")]);
///
/// assert!(scheduler.cancel(tick));
/// assert_eq!(scheduler.pending(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_handle: u64,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_handle: 0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    /// Create an empty scheduler with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Check if a task is still live.
    #[must_use]
    pub fn is_scheduled(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Run `task` once, `delay_ms` from now.
    pub fn schedule_once(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        self.insert(delay_ms, None, task)
    }

    /// Run `task` every `interval_ms`, first after one interval.
    ///
    /// A zero interval is treated as 1ms.
    pub fn schedule_repeating(&mut self, interval_ms: u64, task: T) -> TaskHandle {
        let interval_ms = interval_ms.max(1);
        self.insert(interval_ms, Some(interval_ms), task)
    }

    /// Cancel a task. Returns false if it was not live.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Cancel every task whose payload matches. Returns how many.
    pub fn cancel_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|e| !predicate(&e.task));
        before - self.entries.len()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Due time of the earliest live task.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    /// Pop the earliest task due at or before `until_ms`.
    ///
    /// The clock moves to the task's due time. Repeating tasks are re-armed
    /// one interval later before being returned, so the handler may cancel
    /// them. Returns `None` when nothing is due; the clock is left alone.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired<T>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq))
            .map(|(i, _)| i)?;

        let entry = self.entries.swap_remove(idx);
        self.now_ms = self.now_ms.max(entry.due_ms);

        let fired = Fired {
            handle: entry.handle,
            due_ms: entry.due_ms,
            task: entry.task.clone(),
        };

        if let Some(interval_ms) = entry.interval_ms {
            let seq = self.bump_seq();
            self.entries.push(Entry {
                due_ms: entry.due_ms + interval_ms,
                seq,
                ..entry
            });
        }

        Some(fired)
    }

    /// Move the clock forward to `until_ms` without firing anything.
    ///
    /// Call after draining `pop_due(until_ms)`. The clock never moves back.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn insert(&mut self, delay_ms: u64, interval_ms: Option<u64>, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.bump_seq();

        self.entries.push(Entry {
            handle,
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            interval_ms,
            task,
        });
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
