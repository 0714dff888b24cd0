//! Wall-clock source for timestamps and identifier periods

use chrono::{Duration, Local, NaiveDateTime, SubsecRound};
use parking_lot::Mutex;

/// Source of the current local time
pub trait Clock: Send + Sync {
    /// Current local wall-clock time, second precision
    fn now(&self) -> NaiveDateTime;
}

/// Host local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local().trunc_subsecs(0)
    }
}

/// Manually driven clock
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Create clock stopped at `now`
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now.trunc_subsecs(0)),
        }
    }

    /// Move to an absolute time
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now.trunc_subsecs(0);
    }

    /// Move forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn system_clock_drops_subseconds() {
        assert_eq!(SystemClock.now().nanosecond(), 0);
    }

    #[test]
    fn fixed_clock_advances() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let clock = FixedClock::new(start);
        clock.advance(Duration::seconds(1));
        assert_eq!(clock.now().date(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }
}
