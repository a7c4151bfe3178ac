use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Collapses bursts of calls into a single trailing invocation. Each
/// `schedule` cancels the previously scheduled task, so only the last
/// call within the delay window runs.
pub struct Debouncer {
    delay_ms: u32,
    pending: Rc<RefCell<Option<Timeout>>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        if let Some(previous) = self.pending.borrow_mut().take() {
            previous.cancel();
        }
        let slot = Rc::clone(&self.pending);
        let timeout = Timeout::new(self.delay_ms, move || {
            slot.borrow_mut().take();
            task();
        });
        *self.pending.borrow_mut() = Some(timeout);
    }

    pub fn cancel(&self) {
        if let Some(pending) = self.pending.borrow_mut().take() {
            pending.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

/// Rate-limits calls to at most one per interval: the first call runs
/// immediately, later calls within the interval are deferred to a single
/// trailing task carrying the most recent arguments.
pub struct Throttler {
    interval_ms: u32,
    last_fired: Rc<Cell<Option<f64>>>,
    trailing: Rc<RefCell<Option<Timeout>>>,
}

impl Throttler {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_fired: Rc::new(Cell::new(None)),
            trailing: Rc::new(RefCell::new(None)),
        }
    }

    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        let now = js_sys::Date::now();
        match throttle_wait(now, self.last_fired.get(), self.interval_ms) {
            None => {
                if let Some(previous) = self.trailing.borrow_mut().take() {
                    previous.cancel();
                }
                self.last_fired.set(Some(now));
                task();
            }
            Some(wait_ms) => {
                if let Some(previous) = self.trailing.borrow_mut().take() {
                    previous.cancel();
                }
                let slot = Rc::clone(&self.trailing);
                let last_fired = Rc::clone(&self.last_fired);
                let timeout = Timeout::new(wait_ms, move || {
                    slot.borrow_mut().take();
                    last_fired.set(Some(js_sys::Date::now()));
                    task();
                });
                *self.trailing.borrow_mut() = Some(timeout);
            }
        }
    }

    pub fn cancel(&self) {
        if let Some(trailing) = self.trailing.borrow_mut().take() {
            trailing.cancel();
        }
    }
}

/// How long a throttled call still has to wait, or `None` when it may run
/// immediately.
pub fn throttle_wait(now_ms: f64, last_fired_ms: Option<f64>, interval_ms: u32) -> Option<u32> {
    let last = last_fired_ms?;
    let elapsed = now_ms - last;
    if elapsed >= f64::from(interval_ms) {
        None
    } else {
        Some((f64::from(interval_ms) - elapsed).ceil() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_wait_allows_first_call() {
        assert_eq!(throttle_wait(1_000.0, None, 300), None);
    }

    #[test]
    fn throttle_wait_allows_calls_past_the_interval() {
        assert_eq!(throttle_wait(1_300.0, Some(1_000.0), 300), None);
        assert_eq!(throttle_wait(1_500.0, Some(1_000.0), 300), None);
    }

    #[test]
    fn throttle_wait_defers_calls_inside_the_interval() {
        assert_eq!(throttle_wait(1_100.0, Some(1_000.0), 300), Some(200));
        assert_eq!(throttle_wait(1_299.5, Some(1_000.0), 300), Some(1));
    }
}
