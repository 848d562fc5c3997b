// Kanaboard Timer Queue
// Cancellable delayed-commit timers driven by the host's clock

use indexmap::IndexMap;

use super::sample::PointerId;

/// Handle to a scheduled timer. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    pointer_id: PointerId,
    deadline: u64,
}

/// A timer that became due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub handle: TimerHandle,
    pub pointer_id: PointerId,
    pub deadline: u64,
}

/// Single-threaded queue of pending timers.
///
/// Nothing fires on its own: the owner polls with [`TimerQueue::pop_due`].
/// Cancelling a handle that already fired or was already cancelled does
/// nothing.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_handle: u64,
    pending: IndexMap<TimerHandle, PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, pointer_id: PointerId, deadline: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert(
            handle,
            PendingTimer {
                pointer_id,
                deadline,
            },
        );
        handle
    }

    /// Remove a pending timer. Returns whether it was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.shift_remove(&handle).is_some()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.values().map(|timer| timer.deadline).min()
    }

    /// Remove and return the earliest timer due at `now`.
    ///
    /// Timers with equal deadlines come out in scheduling order.
    pub fn pop_due(&mut self, now: u64) -> Option<DueTimer> {
        let (handle, timer) = self
            .pending
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(handle, timer)| (timer.deadline, **handle))
            .map(|(handle, timer)| (*handle, *timer))?;
        self.pending.shift_remove(&handle);
        Some(DueTimer {
            handle,
            pointer_id: timer.pointer_id,
            deadline: timer.deadline,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
