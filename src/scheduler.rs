// ⏱️ Sync Schedule - the periodic server check as an owned, stoppable task
//
// Nothing here reads the clock. Callers pass `Instant`s in, so tests can
// step time forward deterministically and the UI loop can poll between
// key events.

use std::time::{Duration, Instant};

/// Default period between server checks
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct SyncSchedule {
    period: Duration,
    next_due: Option<Instant>,
}

impl SyncSchedule {
    pub fn new(period: Duration) -> Self {
        SyncSchedule {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the schedule; the first run is one period after `now`
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Time left until the next run, zero if overdue
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
    }

    /// True when a run is due; re-arms one period after `now`.
    ///
    /// Several missed periods collapse into a single run.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

impl Default for SyncSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_INTERVAL)
    }
}
