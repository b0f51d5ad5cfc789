/// Wall-clock source for record ids and creation stamps
use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Real time. On wasm32 chrono reads `Date.now()` through js-sys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Cell<i64>,
}

impl ManualClock {
    pub fn at_millis(millis: i64) -> ManualClock {
        ManualClock {
            millis: Cell::new(millis),
        }
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis.set(millis);
    }

    pub fn advance_millis(&self, delta: i64) {
        self.millis.set(self.millis.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.millis.get())
            .single()
            .unwrap_or_default()
    }

    fn now_millis(&self) -> i64 {
        self.millis.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::at_millis(1698508200000);
        assert_eq!(clock.now_millis(), 1698508200000);
        assert_eq!(clock.now().to_rfc3339(), "2023-10-28T15:50:00+00:00");

        clock.advance_millis(5);
        assert_eq!(clock.now_millis(), 1698508200005);

        clock.set_millis(0);
        assert_eq!(clock.now().timestamp_millis(), 0);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
