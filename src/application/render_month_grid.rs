use crate::application::interface::Clock;
use crate::entity::error::AgendaResult;
use crate::entity::month::MonthGrid;

pub fn render_month_grid(clock: &dyn Clock, month: u32) -> AgendaResult<MonthGrid> {
    let now = clock.now();
    crate::entity::month::render_month_grid(&now, month)
}

#[cfg(test)]
use crate::adapter::gateway::clock::{CountingClock, FixedClock};
#[cfg(test)]
use crate::entity::error::AgendaError;
#[cfg(test)]
use chrono::NaiveDate;

#[cfg(test)]
fn june_clock() -> FixedClock {
    FixedClock::new(
        NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    )
}

#[test]
fn test_render_month_grid_past_month_fails() {
    let actual = render_month_grid(&june_clock(), 5);
    assert_eq!(actual, Err(AgendaError::InvalidMonth(5)));
}

#[test]
fn test_render_month_grid_current_month() {
    let actual = render_month_grid(&june_clock(), 6).unwrap();
    assert_eq!(actual.get_month(), 6);
    assert_eq!(actual.get_year(), 2023);
    assert_eq!(actual.cells().count() % 7, 0);
}

#[test]
fn test_render_month_grid_reads_the_clock_once() {
    let clock = CountingClock::new(june_clock().now());

    render_month_grid(&clock, 6).unwrap();
    assert_eq!(clock.reads.get(), 1);

    // also when the month is rejected
    let clock = CountingClock::new(june_clock().now());
    assert!(render_month_grid(&clock, 5).is_err());
    assert_eq!(clock.reads.get(), 1);
}
