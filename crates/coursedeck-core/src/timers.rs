//! Deferred work
//!
//! Timers are owned by a key. Scheduling a key again replaces the pending
//! timer, so there is never more than one timer per key.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    /// End of a swipe slide
    TabSettle,
    /// End of the leave grace period of an action link
    LinkLeave(usize),
    /// Debounced viewport resize
    Resize,
}

impl std::fmt::Display for TimerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerKey::TabSettle => write!(f, "tab-settle"),
            TimerKey::LinkLeave(link) => write!(f, "link-leave-{}", link),
            TimerKey::Resize => write!(f, "resize"),
        }
    }
}

/// Timer backend. When a timer elapses the owner calls `App::fire` with its
/// key.
pub trait Scheduler {
    /// Start a timer, cancelling any pending one with the same key
    fn schedule(&self, key: TimerKey, delay_ms: u32);
    fn cancel(&self, key: TimerKey);
}

#[derive(Debug, Default)]
struct Clock {
    now: u64,
    due: BTreeMap<TimerKey, u64>,
    scheduled: usize,
}

/// Scheduler driven by hand. Clones share the same clock.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.clock.borrow().due.contains_key(&key)
    }

    /// Milliseconds until `key` fires
    pub fn remaining(&self, key: TimerKey) -> Option<u64> {
        let clock = self.clock.borrow();
        clock.due.get(&key).map(|due| due.saturating_sub(clock.now))
    }

    pub fn pending(&self) -> Vec<TimerKey> {
        self.clock.borrow().due.keys().copied().collect()
    }

    /// Total `schedule` calls, including replacements
    pub fn scheduled_count(&self) -> usize {
        self.clock.borrow().scheduled
    }

    /// Move the clock forward and return the timers that elapsed, earliest
    /// first.
    pub fn advance(&self, ms: u64) -> Vec<TimerKey> {
        let mut clock = self.clock.borrow_mut();
        clock.now += ms;
        let now = clock.now;

        let mut fired: Vec<(u64, TimerKey)> = clock
            .due
            .iter()
            .filter(|(_, due)| **due <= now)
            .map(|(key, due)| (*due, *key))
            .collect();
        fired.sort();

        for (_, key) in &fired {
            clock.due.remove(key);
        }

        fired.into_iter().map(|(_, key)| key).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, key: TimerKey, delay_ms: u32) {
        let mut clock = self.clock.borrow_mut();
        let due = clock.now + u64::from(delay_ms);
        clock.due.insert(key, due);
        clock.scheduled += 1;
    }

    fn cancel(&self, key: TimerKey) {
        self.clock.borrow_mut().due.remove(&key);
    }
}
