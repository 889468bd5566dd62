use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use ludo::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Idle,
    Pending(Point),
    /// The agent took the click and has not finished handling it.
    Busy,
}

/// Hands clicks from the orchestrator to a single agent.
///
/// Holds at most one click. A delivered click stays in the mailbox until the
/// agent has finished handling it, so the orchestrator can tell when the
/// effects of a click are visible.
#[derive(Debug)]
pub struct ClickMailbox {
    slot: Mutex<Slot>,
    signal: Condvar,
}

impl Default for ClickMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickMailbox {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Idle),
            signal: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `false` without delivering if the mailbox is not idle.
    pub fn deliver(&self, point: Point) -> bool {
        let mut slot = self.lock();
        if *slot != Slot::Idle {
            return false;
        }
        *slot = Slot::Pending(point);
        self.signal.notify_one();
        true
    }

    /// Waits up to `timeout` for a click.
    ///
    /// The mailbox stays busy until [`finish`](Self::finish) is called.
    pub fn take(&self, timeout: Duration) -> Option<Point> {
        let slot = self.lock();
        let (mut slot, _) = self
            .signal
            .wait_timeout_while(slot, timeout, |slot| !matches!(slot, Slot::Pending(_)))
            .unwrap_or_else(PoisonError::into_inner);
        match *slot {
            Slot::Pending(point) => {
                *slot = Slot::Busy;
                Some(point)
            }
            Slot::Idle | Slot::Busy => None,
        }
    }

    pub fn finish(&self) {
        *self.lock() = Slot::Idle;
    }

    pub fn is_idle(&self) -> bool {
        *self.lock() == Slot::Idle
    }

    /// Wakes up a waiting agent, e.g. so that it notices it was cancelled.
    pub fn wake(&self) {
        self.signal.notify_all();
    }
}
