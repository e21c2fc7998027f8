use crate::entity::time_slot::TimeSlot;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

#[cfg(test)]
use chrono::NaiveTime;

/// An appointment already taken at a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Schedule {
    unit_id: String,
    chosen_at: NaiveDateTime,
}

impl Schedule {
    pub fn new(unit_id: String, chosen_at: NaiveDateTime) -> Self {
        Self { unit_id, chosen_at }
    }

    pub fn get_unit_id(&self) -> &str {
        &self.unit_id
    }

    pub fn get_chosen_at(&self) -> NaiveDateTime {
        self.chosen_at
    }
}

pub fn booked_times<'a, I>(schedules: I, unit_id: &str, date: NaiveDate) -> HashSet<TimeSlot>
where
    I: IntoIterator<Item = &'a Schedule>,
{
    schedules
        .into_iter()
        .filter(|s| s.unit_id == unit_id && s.chosen_at.date() == date)
        .map(|s| TimeSlot::from_time(&s.chosen_at.time()))
        .collect()
}

#[cfg(test)]
fn schedule(unit_id: &str, y: i32, m: u32, d: u32, hour: u32, minute: u32) -> Schedule {
    Schedule::new(
        unit_id.to_string(),
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap()),
    )
}

#[test]
fn test_booked_times_only_matching_unit_and_date() {
    let schedules = vec![
        schedule("1", 2023, 7, 17, 8, 30),
        schedule("1", 2023, 7, 17, 10, 0),
        schedule("2", 2023, 7, 17, 9, 0),
        schedule("1", 2023, 7, 18, 8, 0),
    ];
    let date = NaiveDate::from_ymd_opt(2023, 7, 17).unwrap();

    let actual = booked_times(&schedules, "1", date);
    let expected: HashSet<TimeSlot> = ["08:30", "10:00"]
        .iter()
        .map(|l| TimeSlot::parse(l).unwrap())
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_booked_times_no_schedules() {
    let date = NaiveDate::from_ymd_opt(2023, 7, 17).unwrap();
    let actual = booked_times(&Vec::<Schedule>::new(), "1", date);
    assert!(actual.is_empty());
}
