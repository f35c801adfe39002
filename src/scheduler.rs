use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle returned by [`TimerQueue::after`]; the only way to cancel a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Single-threaded timer queue running on virtual time.
///
/// Time only moves when the owner calls [`TimerQueue::pop_due`] or
/// [`TimerQueue::advance_to`], so the whole game can be driven from a real
/// frame loop or stepped deterministically from tests.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, u64), T>,
    deadlines: HashMap<u64, Duration>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `payload` to fire `delay` after the current time.
    pub fn after(&mut self, delay: Duration, payload: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = self.now + delay;
        self.pending.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        TimerHandle(id)
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(deadline) => self.pending.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle.0)
    }

    /// Remove the earliest timer due at or before `until`.
    ///
    /// The clock jumps to the fired deadline so anything scheduled while
    /// handling the payload is relative to when it was due, not to `until`.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, T)> {
        let (&(deadline, id), _) = self.pending.iter().next()?;
        if deadline > until {
            return None;
        }
        let payload = self.pending.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some((deadline, payload))
    }

    /// Move the clock forward. Never moves backwards.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.deadlines.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Duration, &T)> {
        self.pending
            .iter()
            .map(|(&(deadline, _), payload)| (deadline, payload))
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
