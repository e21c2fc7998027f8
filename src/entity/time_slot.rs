use crate::entity::error::{AgendaError, AgendaResult};
use chrono::{NaiveTime, Timelike};
use std::collections::HashSet;
use std::fmt;

#[cfg(test)]
use chrono::NaiveDate;

// Minutes since midnight. Ordering is chronological, which matches the
// lexicographic ordering of the zero-padded "HH:mm" label.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    minute_of_day: u32,
}

impl TimeSlot {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }

        Some(Self {
            minute_of_day: hour * 60 + minute,
        })
    }

    pub(crate) fn from_minute_of_day(minute_of_day: u32) -> Self {
        Self { minute_of_day }
    }

    /// Truncates seconds, so 08:15:59 becomes "08:15".
    pub fn from_time(time: &NaiveTime) -> Self {
        Self {
            minute_of_day: time.hour() * 60 + time.minute(),
        }
    }

    /// Accepts "HH:mm" and "HH:mm:ss" (as stored by SQL TIME columns).
    pub fn parse(s: &str) -> AgendaResult<Self> {
        let s = s.trim();
        let time = NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .map_err(|_| AgendaError::InvalidWindow(format!("invalid time {:?}", s)))?;

        Ok(Self::from_time(&time))
    }

    pub fn get_minute_of_day(&self) -> u32 {
        self.minute_of_day
    }

    pub fn get_hour(&self) -> u32 {
        self.minute_of_day / 60
    }

    pub fn get_minute(&self) -> u32 {
        self.minute_of_day % 60
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.get_hour(), self.get_minute())
    }
}

/// Removes every booked slot, keeping the order of `slots`.
pub fn filter_available(slots: Vec<TimeSlot>, booked: &HashSet<TimeSlot>) -> Vec<TimeSlot> {
    slots
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect()
}

#[cfg(test)]
fn slots(labels: &[&str]) -> Vec<TimeSlot> {
    labels.iter().map(|l| TimeSlot::parse(l).unwrap()).collect()
}

#[test]
fn test_parse_hh_mm() {
    let actual = TimeSlot::parse("08:30").unwrap();
    assert_eq!(actual, TimeSlot::from_hm(8, 30).unwrap());
    assert_eq!(actual.to_string(), "08:30");
}

#[test]
fn test_parse_seconds_are_dropped() {
    let actual = TimeSlot::parse("17:05:00").unwrap();
    assert_eq!(actual.to_string(), "17:05");
}

#[test]
fn test_parse_garbage_is_invalid_window() {
    let actual = TimeSlot::parse("8h30");
    assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));

    let actual = TimeSlot::parse("25:00");
    assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));
}

#[test]
fn test_from_hm_out_of_range() {
    assert_eq!(TimeSlot::from_hm(24, 0), None);
    assert_eq!(TimeSlot::from_hm(9, 60), None);
}

#[test]
fn test_from_time_truncates_seconds() {
    let now = NaiveDate::from_ymd_opt(2023, 7, 16)
        .unwrap()
        .and_hms_opt(8, 15, 59)
        .unwrap();
    let actual = TimeSlot::from_time(&now.time());
    assert_eq!(actual.to_string(), "08:15");
}

#[test]
fn test_ordering_matches_label_ordering() {
    let mut actual = slots(&["10:00", "09:30", "09:05", "23:59", "00:00"]);
    actual.sort();
    let labels: Vec<String> = actual.iter().map(|s| s.to_string()).collect();

    let mut expected = labels.clone();
    expected.sort();
    assert_eq!(labels, expected);
    assert_eq!(labels[0], "00:00");
}

#[test]
fn test_filter_available_removes_booked_times() {
    let booked: HashSet<TimeSlot> = slots(&["08:30"]).into_iter().collect();
    let actual = filter_available(slots(&["08:00", "08:30", "09:00"]), &booked);
    let expected = slots(&["08:00", "09:00"]);
    assert_eq!(actual, expected);
}

#[test]
fn test_filter_available_empty_booked_set_is_identity() {
    let input = slots(&["08:00", "08:30", "09:00"]);
    let actual = filter_available(input.clone(), &HashSet::new());
    assert_eq!(actual, input);
}

#[test]
fn test_filter_available_empty_slots() {
    let booked: HashSet<TimeSlot> = slots(&["08:30"]).into_iter().collect();
    let actual = filter_available(vec![], &booked);
    assert!(actual.is_empty());
}

#[test]
fn test_filter_available_set_difference_keeps_order() {
    let input = slots(&["08:00", "08:20", "08:40", "09:00", "09:20", "09:40"]);
    // booked times that are not generated slots are ignored
    let booked: HashSet<TimeSlot> = slots(&["08:20", "09:00", "12:00"]).into_iter().collect();
    let actual = filter_available(input.clone(), &booked);

    assert!(actual.iter().all(|slot| !booked.contains(slot)));
    let expected: Vec<TimeSlot> = input
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect();
    assert_eq!(actual, expected);
    assert_eq!(actual, slots(&["08:00", "08:40", "09:20", "09:40"]));
}
