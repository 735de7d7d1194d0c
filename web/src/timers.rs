//! Browser timers

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use coursedeck_core::{Scheduler, TimerKey};
use gloo::timers::callback::Timeout;

#[derive(Default)]
struct Timers {
    pending: HashMap<TimerKey, Timeout>,
    /// Elapsed timeouts. A timeout is never dropped inside its own callback;
    /// these are released when the next one fires.
    spent: Vec<Timeout>,
}

/// `Scheduler` over `setTimeout`. Dropping a `Timeout` clears it, so
/// replacing or removing an entry cancels the pending timer.
pub struct BrowserScheduler {
    timers: Rc<RefCell<Timers>>,
    fire: Rc<dyn Fn(TimerKey)>,
}

impl BrowserScheduler {
    pub fn new(fire: impl Fn(TimerKey) + 'static) -> Self {
        Self {
            timers: Rc::new(RefCell::new(Timers::default())),
            fire: Rc::new(fire),
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, key: TimerKey, delay_ms: u32) {
        let timers = Rc::clone(&self.timers);
        let fire = Rc::clone(&self.fire);

        let timeout = Timeout::new(delay_ms, move || {
            {
                let mut timers = timers.borrow_mut();
                timers.spent.clear();
                if let Some(own) = timers.pending.remove(&key) {
                    timers.spent.push(own);
                }
            }
            fire(key);
        });

        if self.timers.borrow_mut().pending.insert(key, timeout).is_some() {
            tracing::trace!(key = %key, "Timer replaced");
        }
    }

    fn cancel(&self, key: TimerKey) {
        if self.timers.borrow_mut().pending.remove(&key).is_some() {
            tracing::trace!(key = %key, "Timer cancelled");
        }
    }
}
