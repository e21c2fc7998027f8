use crate::application::interface::Clock;
use crate::entity::month::{render_month_options, MonthOption};

pub fn list_selectable_months(clock: &dyn Clock) -> Vec<MonthOption> {
    let now = clock.now();
    render_month_options(&now)
}

#[cfg(test)]
use crate::adapter::gateway::clock::{CountingClock, FixedClock};
#[cfg(test)]
use chrono::NaiveDate;

#[test]
fn test_list_selectable_months_uses_the_clock() {
    let clock = FixedClock::new(
        NaiveDate::from_ymd_opt(2023, 10, 31)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap(),
    );

    let actual: Vec<String> = list_selectable_months(&clock)
        .iter()
        .map(|o| o.get_label().to_string())
        .collect();
    let expected = vec![
        "--- Escolha ---",
        "Outubro / 2023",
        "Novembro / 2023",
        "Dezembro / 2023",
    ];
    assert_eq!(actual, expected);
}

#[test]
fn test_list_selectable_months_reads_the_clock_once() {
    let clock = CountingClock::new(
        NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    );

    list_selectable_months(&clock);
    assert_eq!(clock.reads.get(), 1);
}
