use crate::application::interface::Clock;
use chrono::{FixedOffset, Local, NaiveDateTime, TimeZone, Utc};

#[cfg(test)]
use chrono::NaiveDate;
#[cfg(test)]
use std::cell::Cell;

/// System time seen from one explicit zone.
pub struct SystemClock<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> SystemClock<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl SystemClock<Local> {
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl SystemClock<FixedOffset> {
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self::new(offset)
    }
}

impl<Tz: TimeZone> Clock for SystemClock<Tz> {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// Always answers the same instant.
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

/// Fixed instant that also counts how often it was read.
#[cfg(test)]
pub struct CountingClock {
    now: NaiveDateTime,
    pub reads: Cell<usize>,
}

#[cfg(test)]
impl CountingClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            reads: Cell::new(0),
        }
    }
}

#[cfg(test)]
impl Clock for CountingClock {
    fn now(&self) -> NaiveDateTime {
        self.reads.set(self.reads.get() + 1);
        self.now
    }
}

#[test]
fn test_fixed_clock_returns_the_same_instant() {
    let fixed = NaiveDate::from_ymd_opt(2023, 7, 16)
        .unwrap()
        .and_hms_opt(8, 15, 0)
        .unwrap();
    let clock = FixedClock::new(fixed);

    assert_eq!(clock.now(), fixed);
    assert_eq!(clock.now(), fixed);
}

#[test]
fn test_system_clock_with_offset_follows_the_offset() {
    let utc = SystemClock::new(Utc);
    let offset = FixedOffset::east_opt(3 * 3600).unwrap();
    let shifted = SystemClock::with_offset(offset);

    let before = utc.now();
    let actual = shifted.now();
    let after = utc.now();

    let lower = before + chrono::Duration::hours(3);
    let upper = after + chrono::Duration::hours(3);
    assert!(lower <= actual && actual <= upper);
}

#[test]
fn test_system_clock_as_trait_object() {
    let clock: Box<dyn Clock> = Box::new(SystemClock::local());
    let before = Local::now().naive_local();
    let actual = clock.now();

    assert!(actual >= before);
}
