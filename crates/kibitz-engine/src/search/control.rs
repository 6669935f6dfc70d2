//! Search control: the time budget and the periodic clock check.

use std::time::{Duration, Instant};

/// Decides when a search must abort.
///
/// The clock is read only every `check_interval` nodes; once the budget is
/// spent the control latches into the stopped state so every later check
/// returns immediately.
pub struct SearchControl {
    start: Instant,
    budget: Option<Duration>,
    check_mask: u64,
    stopped: bool,
}

impl SearchControl {
    /// Control with a wall-clock budget measured from now.
    ///
    /// `check_interval` must be a power of two.
    pub fn timed(budget: Duration, check_interval: u64) -> Self {
        Self {
            start: Instant::now(),
            budget: Some(budget),
            check_mask: check_interval.max(1) - 1,
            stopped: false,
        }
    }

    /// Control that never stops on its own.
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            budget: None,
            check_mask: 0,
            stopped: false,
        }
    }

    /// Called once per node; `true` means unwind now.
    #[inline]
    pub fn should_stop(&mut self, nodes: u64) -> bool {
        if self.stopped {
            return true;
        }
        if nodes & self.check_mask != 0 {
            return false;
        }
        self.stopped = self.budget_spent();
        self.stopped
    }

    /// Called between iterations: whether the budget is used up.
    pub fn budget_spent(&self) -> bool {
        self.budget.is_some_and(|budget| self.elapsed() >= budget)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::SearchControl;

    #[test]
    fn unbounded_never_stops() {
        let mut control = SearchControl::unbounded();
        for nodes in 0..10_000 {
            assert!(!control.should_stop(nodes));
        }
        assert!(!control.budget_spent());
    }

    #[test]
    fn zero_budget_stops_on_first_check() {
        let mut control = SearchControl::timed(Duration::ZERO, 1024);
        // Off-interval nodes skip the clock.
        assert!(!control.should_stop(1));
        assert!(control.should_stop(1024));
        // Latched: off-interval nodes now stop too.
        assert!(control.should_stop(1025));
    }

    #[test]
    fn generous_budget_keeps_running() {
        let mut control = SearchControl::timed(Duration::from_secs(3600), 1);
        assert!(!control.should_stop(0));
        assert!(!control.budget_spent());
    }

    #[test]
    fn budget_spent_after_sleep() {
        let control = SearchControl::timed(Duration::from_millis(5), 64);
        std::thread::sleep(Duration::from_millis(10));
        assert!(control.budget_spent());
    }
}
