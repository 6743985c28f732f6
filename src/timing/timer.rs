//! Round countdown.

use tracing::trace;

use super::scheduler::{Fired, Scheduler, TimerEvent, TimerId};

/// Result of a tick callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// One second removed; the next tick is scheduled.
    Running { remaining: u32 },
    /// The clock reached zero and the timer stopped.
    Expired,
    /// The tick doesn't belong to the running timer; ignored.
    Stale,
}

/// Countdown that ticks once per period while running.
#[derive(Clone, Debug)]
pub struct RoundTimer {
    remaining_secs: u32,
    period_ms: u64,
    handle: Option<TimerId>,
}

impl RoundTimer {
    /// Create a stopped timer with `seconds` on the clock.
    #[must_use]
    pub fn new(seconds: u32, period_ms: u64) -> Self {
        Self {
            remaining_secs: seconds,
            period_ms,
            handle: None,
        }
    }

    /// Seconds left on the clock.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining_secs
    }

    /// Is a tick outstanding?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop and put `seconds` back on the clock.
    pub fn reset(&mut self, scheduler: &mut Scheduler, seconds: u32) {
        self.stop(scheduler);
        self.remaining_secs = seconds;
    }

    /// Schedule the first tick. No-op if already running or out of time.
    pub fn start(&mut self, scheduler: &mut Scheduler, generation: u64) {
        if self.handle.is_some() || self.remaining_secs == 0 {
            return;
        }
        self.handle = Some(scheduler.schedule(self.period_ms, generation, TimerEvent::Tick));
    }

    /// Cancel the outstanding tick, if any.
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.handle.take() {
            scheduler.cancel(id);
        }
    }

    /// Handle a fired tick: count down and schedule the next one.
    pub fn on_tick(&mut self, scheduler: &mut Scheduler, fired: &Fired) -> TickOutcome {
        if self.handle != Some(fired.id) {
            return TickOutcome::Stale;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        trace!(remaining = self.remaining_secs, "Tick");

        if self.remaining_secs == 0 {
            self.handle = None;
            return TickOutcome::Expired;
        }

        self.handle = Some(scheduler.schedule(self.period_ms, fired.generation, TimerEvent::Tick));
        TickOutcome::Running {
            remaining: self.remaining_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(timer: &mut RoundTimer, sched: &mut Scheduler, until_ms: u64) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        while let Some(fired) = sched.pop_due(until_ms) {
            outcomes.push(timer.on_tick(sched, &fired));
        }
        outcomes
    }

    #[test]
    fn test_counts_down_once_per_period() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new(3, 1000);
        timer.start(&mut sched, 1);

        let outcomes = run_ticks(&mut timer, &mut sched, 2000);
        assert_eq!(
            outcomes,
            vec![
                TickOutcome::Running { remaining: 2 },
                TickOutcome::Running { remaining: 1 },
            ]
        );
        assert_eq!(timer.remaining(), 1);
        assert!(timer.is_running());
    }

    #[test]
    fn test_expires_and_stops() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new(2, 1000);
        timer.start(&mut sched, 1);

        let outcomes = run_ticks(&mut timer, &mut sched, 10_000);
        assert_eq!(outcomes.last(), Some(&TickOutcome::Expired));
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_stop_cancels_tick() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new(30, 1000);
        timer.start(&mut sched, 1);
        timer.stop(&mut sched);

        assert!(!timer.is_running());
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(timer.remaining(), 30);
    }

    #[test]
    fn test_reset_restores_clock() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new(3, 1000);
        timer.start(&mut sched, 1);
        run_ticks(&mut timer, &mut sched, 1000);

        timer.reset(&mut sched, 45);
        assert_eq!(timer.remaining(), 45);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_foreign_tick_is_stale() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new(3, 1000);
        sched.schedule(10, 1, TimerEvent::Tick);
        timer.start(&mut sched, 1);

        let foreign = sched.pop_due(10).unwrap();
        assert_eq!(timer.on_tick(&mut sched, &foreign), TickOutcome::Stale);
        assert_eq!(timer.remaining(), 3);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut sched = Scheduler::new();
        let mut timer = RoundTimer::new(3, 1000);
        timer.start(&mut sched, 1);
        timer.start(&mut sched, 1);
        assert_eq!(sched.pending_count(), 1);
    }
}
