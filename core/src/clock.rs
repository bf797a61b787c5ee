//! Clock port. The store asks a `Clock` for "now" instead of reading the
//! system time directly, so daily resets and timestamps are testable.

use std::cell::Cell;

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date on the device (local time zone).
    fn today(&self) -> NaiveDate;
}

/// Reads the real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to. `today()` is the UTC date of the
/// current instant, which keeps tests independent of the host time zone.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        FixedClock { now: Cell::new(now) }
    }

    /// Parse an RFC 3339 instant. Intended for test fixtures.
    pub fn at(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        let now = DateTime::parse_from_rfc3339(rfc3339)?.with_timezone(&Utc);
        Ok(FixedClock::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date_naive()
    }
}

/// Clocks are shared between the store and the code driving it.
impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Format a timestamp the way every persisted record stores it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::at("2026-03-01T23:30:00Z").unwrap();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        clock.advance(chrono::Duration::hours(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }

    #[test]
    fn shared_clock_sees_updates() {
        let clock = std::rc::Rc::new(FixedClock::at("2026-03-01T08:00:00Z").unwrap());
        let shared: Box<dyn Clock> = Box::new(clock.clone());
        clock.advance(chrono::Duration::days(2));
        assert_eq!(shared.today(), NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    }

    #[test]
    fn timestamp_format_is_millisecond_utc() {
        let clock = FixedClock::at("2026-03-01T08:00:00.250+09:00").unwrap();
        assert_eq!(format_timestamp(&clock.now()), "2026-02-28T23:00:00.250Z");
    }

    #[test]
    fn system_clock_today_is_plausible() {
        let clock = SystemClock;
        let diff = (clock.now().date_naive() - clock.today()).num_days().abs();
        assert!(diff <= 1);
    }
}
