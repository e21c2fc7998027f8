use crate::entity::error::{AgendaError, AgendaResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

#[cfg(test)]
use chrono::NaiveTime;

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub const NO_SELECTION_LABEL: &str = "--- Escolha ---";

pub fn month_name(month: u32) -> Option<&'static str> {
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(MONTH_NAMES[(month - 1) as usize])
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthOption {
    // None for the leading "no selection" entry
    value: Option<u32>,
    year: i32,
    label: String,
}

impl MonthOption {
    fn no_selection(year: i32) -> Self {
        Self {
            value: None,
            year,
            label: NO_SELECTION_LABEL.to_string(),
        }
    }

    fn new(month: u32, name: &str, year: i32) -> Self {
        Self {
            value: Some(month),
            year,
            label: format!("{} / {}", name, year),
        }
    }

    pub fn get_value(&self) -> Option<u32> {
        self.value
    }

    pub fn get_year(&self) -> i32 {
        self.year
    }

    pub fn get_label(&self) -> &str {
        &self.label
    }
}

/// Sentinel first, then the current month through December of the current year.
pub fn render_month_options(now: &NaiveDateTime) -> Vec<MonthOption> {
    let year = now.year();
    let current_month = now.month();

    let mut options = vec![MonthOption::no_selection(year)];

    for month in current_month..=12 {
        if let Some(name) = month_name(month) {
            options.push(MonthOption::new(month, name, year));
        }
    }

    options
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DayCell {
    Blank,
    Day {
        day: u32,
        is_weekend: bool,
        is_selectable: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    // Sunday first, always 7 cells per week
    weeks: Vec<Vec<DayCell>>,
}

impl MonthGrid {
    pub fn get_year(&self) -> i32 {
        self.year
    }

    pub fn get_month(&self) -> u32 {
        self.month
    }

    pub fn get_weeks(&self) -> &Vec<Vec<DayCell>> {
        &self.weeks
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flatten()
    }
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some(next_first.signed_duration_since(first).num_days() as u32)
}

pub fn is_weekend(date: &NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Calendar of `target_month` in the current year. Months before the current
/// one cannot be browsed.
pub fn render_month_grid(now: &NaiveDateTime, target_month: u32) -> AgendaResult<MonthGrid> {
    let current_month = now.month();
    let current_day = now.day();
    let year = now.year();

    if target_month < current_month || !(1..=12).contains(&target_month) {
        return Err(AgendaError::InvalidMonth(target_month));
    }

    let first = NaiveDate::from_ymd_opt(year, target_month, 1)
        .ok_or(AgendaError::InvalidMonth(target_month))?;
    let day_count =
        days_in_month(year, target_month).ok_or(AgendaError::InvalidMonth(target_month))?;
    let start_weekday = first.weekday().num_days_from_sunday() as usize;

    let mut cells = vec![DayCell::Blank; start_weekday];

    for (day, date) in (1..=day_count).zip(first.iter_days()) {
        let weekend = is_weekend(&date);
        let past_day = day < current_day && target_month == current_month;

        cells.push(DayCell::Day {
            day,
            is_weekend: weekend,
            is_selectable: !weekend && !past_day,
        });
    }

    while cells.len() % 7 != 0 {
        cells.push(DayCell::Blank);
    }

    let weeks = cells.chunks(7).map(|week| week.to_vec()).collect();

    Ok(MonthGrid {
        year,
        month: target_month,
        weeks,
    })
}

#[cfg(test)]
fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

#[cfg(test)]
fn day_numbers(grid: &MonthGrid) -> Vec<u32> {
    grid.cells()
        .filter_map(|cell| match cell {
            DayCell::Day { day, .. } => Some(*day),
            DayCell::Blank => None,
        })
        .collect()
}

#[cfg(test)]
fn find_day(grid: &MonthGrid, wanted: u32) -> DayCell {
    *grid
        .cells()
        .find(|cell| matches!(cell, DayCell::Day { day, .. } if *day == wanted))
        .unwrap()
}

#[test]
fn test_render_month_options_from_current_month_to_december() {
    let now = at(2023, 6, 15, 10, 0);
    let actual = render_month_options(&now);

    assert_eq!(actual.len(), 1 + 7);
    assert_eq!(actual[0].get_value(), None);
    assert_eq!(actual[0].get_label(), "--- Escolha ---");

    let values: Vec<u32> = actual.iter().filter_map(|o| o.get_value()).collect();
    assert_eq!(values, vec![6, 7, 8, 9, 10, 11, 12]);
    assert!(actual.iter().all(|o| o.get_year() == 2023));
    assert_eq!(actual[1].get_label(), "Junho / 2023");
    assert_eq!(actual[7].get_label(), "Dezembro / 2023");
}

#[test]
fn test_render_month_options_in_december_only_december() {
    let now = at(2024, 12, 31, 23, 59);
    let actual = render_month_options(&now);

    assert_eq!(actual.len(), 2);
    assert_eq!(actual[1].get_value(), Some(12));
    assert_eq!(actual[1].get_label(), "Dezembro / 2024");
}

#[test]
fn test_render_month_options_in_january_all_months() {
    let now = at(2025, 1, 1, 0, 0);
    let actual = render_month_options(&now);

    let values: Vec<u32> = actual.iter().filter_map(|o| o.get_value()).collect();
    assert_eq!(values, (1..=12).collect::<Vec<u32>>());
    assert_eq!(actual[3].get_label(), "Março / 2025");
}

#[test]
fn test_render_month_grid_past_month_is_invalid() {
    let now = at(2023, 6, 15, 10, 0);
    let actual = render_month_grid(&now, 5);
    assert_eq!(actual, Err(AgendaError::InvalidMonth(5)));
}

#[test]
fn test_render_month_grid_out_of_range_is_invalid() {
    let now = at(2023, 1, 15, 10, 0);
    assert_eq!(render_month_grid(&now, 0), Err(AgendaError::InvalidMonth(0)));
    assert_eq!(render_month_grid(&now, 13), Err(AgendaError::InvalidMonth(13)));
}

#[test]
fn test_render_month_grid_leading_blanks_and_whole_weeks() {
    // 2023-07-01 is a Saturday
    let now = at(2023, 6, 15, 10, 0);
    let actual = render_month_grid(&now, 7).unwrap();

    assert_eq!(actual.get_year(), 2023);
    assert_eq!(actual.get_month(), 7);
    assert!(actual.get_weeks().iter().all(|week| week.len() == 7));

    let cells: Vec<&DayCell> = actual.cells().collect();
    assert_eq!(cells.len() % 7, 0);
    assert!(cells[..6].iter().all(|cell| **cell == DayCell::Blank));
    assert!(matches!(cells[6], DayCell::Day { day: 1, .. }));
    // 6 blanks + 31 days = 37, padded to 42
    assert_eq!(cells.len(), 42);
    assert_eq!(day_numbers(&actual), (1..=31).collect::<Vec<u32>>());
}

#[test]
fn test_render_month_grid_no_blanks_when_month_starts_on_sunday() {
    // 2023-10-01 is a Sunday
    let now = at(2023, 6, 15, 10, 0);
    let actual = render_month_grid(&now, 10).unwrap();

    let first = actual.get_weeks()[0][0];
    assert!(matches!(first, DayCell::Day { day: 1, .. }));
}

#[test]
fn test_render_month_grid_leap_year_february() {
    let now = at(2024, 2, 1, 9, 0);
    let actual = render_month_grid(&now, 2).unwrap();
    assert_eq!(day_numbers(&actual), (1..=29).collect::<Vec<u32>>());

    let now = at(2023, 2, 1, 9, 0);
    let actual = render_month_grid(&now, 2).unwrap();
    assert_eq!(day_numbers(&actual), (1..=28).collect::<Vec<u32>>());
    // 2023-02-01 is a Wednesday: 3 blanks + 28 days, padded to 35
    assert_eq!(actual.cells().count(), 35);
}

#[test]
fn test_render_month_grid_current_month_past_days_are_not_selectable() {
    // 2023-06-15 is a Thursday
    let now = at(2023, 6, 15, 10, 0);
    let actual = render_month_grid(&now, 6).unwrap();

    assert_eq!(
        find_day(&actual, 14),
        DayCell::Day {
            day: 14,
            is_weekend: false,
            is_selectable: false
        }
    );
    assert_eq!(
        find_day(&actual, 15),
        DayCell::Day {
            day: 15,
            is_weekend: false,
            is_selectable: true
        }
    );
    assert_eq!(
        find_day(&actual, 16),
        DayCell::Day {
            day: 16,
            is_weekend: false,
            is_selectable: true
        }
    );
}

#[test]
fn test_render_month_grid_weekends_are_never_selectable() {
    let now = at(2023, 6, 15, 10, 0);
    let actual = render_month_grid(&now, 7).unwrap();

    // 2023-07-01 Saturday, 2023-07-02 Sunday, 2023-07-03 Monday
    assert_eq!(
        find_day(&actual, 1),
        DayCell::Day {
            day: 1,
            is_weekend: true,
            is_selectable: false
        }
    );
    assert_eq!(
        find_day(&actual, 2),
        DayCell::Day {
            day: 2,
            is_weekend: true,
            is_selectable: false
        }
    );
    assert_eq!(
        find_day(&actual, 3),
        DayCell::Day {
            day: 3,
            is_weekend: false,
            is_selectable: true
        }
    );
}

#[test]
fn test_render_month_grid_future_month_early_days_are_selectable() {
    // day 3 is before the current day 15, but in a later month
    let now = at(2023, 6, 15, 10, 0);
    let actual = render_month_grid(&now, 8).unwrap();

    // 2023-08-03 is a Thursday
    assert_eq!(
        find_day(&actual, 3),
        DayCell::Day {
            day: 3,
            is_weekend: false,
            is_selectable: true
        }
    );
}

#[test]
fn test_render_month_grid_weekend_column_positions() {
    let now = at(2023, 6, 15, 10, 0);
    let actual = render_month_grid(&now, 9).unwrap();

    for week in actual.get_weeks() {
        for (column, cell) in week.iter().enumerate() {
            if let DayCell::Day { is_weekend, .. } = cell {
                assert_eq!(*is_weekend, column == 0 || column == 6);
            }
        }
    }
}

#[test]
fn test_days_in_month() {
    assert_eq!(days_in_month(2023, 1), Some(31));
    assert_eq!(days_in_month(2023, 4), Some(30));
    assert_eq!(days_in_month(2023, 12), Some(31));
    assert_eq!(days_in_month(2000, 2), Some(29));
    assert_eq!(days_in_month(1900, 2), Some(28));
    assert_eq!(days_in_month(2023, 13), None);
}

#[test]
fn test_month_name() {
    assert_eq!(month_name(1), Some("Janeiro"));
    assert_eq!(month_name(12), Some("Dezembro"));
    assert_eq!(month_name(0), None);
}
