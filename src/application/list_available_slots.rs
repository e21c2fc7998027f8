use crate::application::interface::{Clock, ScheduleRepositoryTrait, UnitRepositoryTrait};
use crate::entity::error::{AgendaError, AgendaResult};
use crate::entity::time_slot::{filter_available, TimeSlot};
use crate::entity::unit::generate_slots;
use chrono::{Datelike, NaiveDate};

#[cfg(test)]
use crate::adapter::gateway::clock::{CountingClock, FixedClock};
#[cfg(test)]
use crate::entity::unit::Unit;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::{HashMap, HashSet};

/// Free appointment times of a unit on `month`/`day` of the current year.
pub fn list_available_slots(
    unit_repository: &dyn UnitRepositoryTrait,
    schedule_repository: &dyn ScheduleRepositoryTrait,
    clock: &dyn Clock,
    unit_id: &str,
    month: u32,
    day: u32,
) -> AgendaResult<Vec<TimeSlot>> {
    let unit = unit_repository.get_active_unit(unit_id)?;

    // read once; every decision below uses this instant
    let now = clock.now();

    let date = NaiveDate::from_ymd_opt(now.year(), month, day)
        .ok_or(AgendaError::InvalidDate { month, day })?;

    let window = unit.window_for(date)?;
    let slots = generate_slots(&window, &now)?;
    let booked =
        schedule_repository.get_booked_times(unit.get_id(), window.get_target_date())?;
    let available = filter_available(slots, &booked);

    log::debug!(
        "unit {} on {}: {} available, {} booked",
        unit.get_id(),
        date,
        available.len(),
        booked.len()
    );

    Ok(available)
}

#[cfg(test)]
struct InMemoryUnitRepository {
    units: Vec<Unit>,
}

#[cfg(test)]
impl UnitRepositoryTrait for InMemoryUnitRepository {
    fn get_active_unit(&self, unit_id: &str) -> AgendaResult<Unit> {
        self.units
            .iter()
            .find(|u| u.get_id() == unit_id && u.is_bookable())
            .cloned()
            .ok_or_else(|| AgendaError::UnitNotFound(unit_id.to_string()))
    }
}

#[cfg(test)]
struct InMemoryScheduleRepository {
    booked: HashMap<(String, NaiveDate), Vec<&'static str>>,
    calls: RefCell<Vec<(String, NaiveDate)>>,
    unavailable: bool,
}

#[cfg(test)]
impl InMemoryScheduleRepository {
    fn new(booked: Vec<(&str, NaiveDate, Vec<&'static str>)>) -> Self {
        Self {
            booked: booked
                .into_iter()
                .map(|(id, date, times)| ((id.to_string(), date), times))
                .collect(),
            calls: RefCell::new(vec![]),
            unavailable: false,
        }
    }
}

#[cfg(test)]
impl ScheduleRepositoryTrait for InMemoryScheduleRepository {
    fn get_booked_times(&self, unit_id: &str, date: NaiveDate) -> AgendaResult<HashSet<TimeSlot>> {
        self.calls.borrow_mut().push((unit_id.to_string(), date));

        if self.unavailable {
            return Err(AgendaError::StoreUnavailable("connection refused".to_string()));
        }

        let times = self
            .booked
            .get(&(unit_id.to_string(), date))
            .cloned()
            .unwrap_or_default();
        times.iter().map(|t| TimeSlot::parse(t)).collect()
    }
}

#[cfg(test)]
fn unit_repository() -> InMemoryUnitRepository {
    let unit = |id: &str, active: bool, services: Vec<&str>, start: &str, end: &str, step: &str| {
        Unit::new(
            id.to_string(),
            format!("Unidade {}", id),
            active,
            services.into_iter().map(|s| s.to_string()).collect(),
            TimeSlot::parse(start).unwrap(),
            TimeSlot::parse(end).unwrap(),
            step.to_string(),
        )
    };

    InMemoryUnitRepository {
        units: vec![
            unit("1", true, vec!["Clínica geral"], "08:00", "09:00", "30 minutes"),
            unit("2", false, vec!["Pediatria"], "08:00", "12:00", "30 minutes"),
            unit("3", true, vec![], "08:00", "12:00", "30 minutes"),
            unit("4", true, vec!["Pediatria"], "12:00", "08:00", "30 minutes"),
            unit("5", true, vec!["Pediatria"], "08:00", "12:00", "0 minutes"),
            unit("6", true, vec!["Pediatria"], "08:00", "10:00", "20 minutes"),
        ],
    }
}

#[cfg(test)]
fn clock_at(month: u32, day: u32, hour: u32, minute: u32) -> FixedClock {
    FixedClock::new(
        NaiveDate::from_ymd_opt(2023, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap(),
    )
}

#[cfg(test)]
fn ymd(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, month, day).unwrap()
}

#[cfg(test)]
fn labels(slots: &[TimeSlot]) -> Vec<String> {
    slots.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_list_available_slots_future_date_all_slots() {
    let units = unit_repository();
    let schedules = InMemoryScheduleRepository::new(vec![]);
    let clock = clock_at(7, 16, 8, 15);

    let actual = list_available_slots(&units, &schedules, &clock, "1", 7, 17).unwrap();
    assert_eq!(labels(&actual), vec!["08:00", "08:30"]);
}

#[test]
fn test_list_available_slots_today_drops_past_times() {
    let units = unit_repository();
    let schedules = InMemoryScheduleRepository::new(vec![]);
    let clock = clock_at(7, 16, 8, 15);

    let actual = list_available_slots(&units, &schedules, &clock, "1", 7, 16).unwrap();
    assert_eq!(labels(&actual), vec!["08:30"]);
}

#[test]
fn test_list_available_slots_removes_booked_times() {
    let units = unit_repository();
    let schedules = InMemoryScheduleRepository::new(vec![
        ("6", ymd(7, 17), vec!["08:20", "09:00"]),
        ("6", ymd(7, 18), vec!["08:00"]),
        ("1", ymd(7, 17), vec!["08:40"]),
    ]);
    let clock = clock_at(7, 16, 8, 15);

    let actual = list_available_slots(&units, &schedules, &clock, "6", 7, 17).unwrap();
    assert_eq!(
        labels(&actual),
        vec!["08:00", "08:40", "09:20", "09:40"]
    );
    assert_eq!(
        *schedules.calls.borrow(),
        vec![("6".to_string(), ymd(7, 17))]
    );
}

#[test]
fn test_list_available_slots_all_booked_is_empty() {
    let units = unit_repository();
    let schedules =
        InMemoryScheduleRepository::new(vec![("1", ymd(7, 17), vec!["08:00", "08:30"])]);
    let clock = clock_at(7, 16, 8, 15);

    let actual = list_available_slots(&units, &schedules, &clock, "1", 7, 17).unwrap();
    assert!(actual.is_empty());
}

#[test]
fn test_list_available_slots_inactive_or_serviceless_unit_not_found() {
    let units = unit_repository();
    let schedules = InMemoryScheduleRepository::new(vec![]);
    let clock = clock_at(7, 16, 8, 15);

    for id in ["2", "3", "99"] {
        let actual = list_available_slots(&units, &schedules, &clock, id, 7, 17);
        assert_eq!(actual, Err(AgendaError::UnitNotFound(id.to_string())));
    }
    assert!(schedules.calls.borrow().is_empty());
}

#[test]
fn test_list_available_slots_malformed_window() {
    let units = unit_repository();
    let schedules = InMemoryScheduleRepository::new(vec![]);
    let clock = clock_at(7, 16, 8, 15);

    for id in ["4", "5"] {
        let actual = list_available_slots(&units, &schedules, &clock, id, 7, 17);
        assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));
    }
}

#[test]
fn test_list_available_slots_impossible_date() {
    let units = unit_repository();
    let schedules = InMemoryScheduleRepository::new(vec![]);
    let clock = clock_at(1, 16, 8, 15);

    let actual = list_available_slots(&units, &schedules, &clock, "1", 2, 30);
    assert_eq!(actual, Err(AgendaError::InvalidDate { month: 2, day: 30 }));
}

#[test]
fn test_list_available_slots_store_failure_is_propagated() {
    let units = unit_repository();
    let mut schedules = InMemoryScheduleRepository::new(vec![]);
    schedules.unavailable = true;
    let clock = clock_at(7, 16, 8, 15);

    let actual = list_available_slots(&units, &schedules, &clock, "1", 7, 17);
    assert!(matches!(actual, Err(AgendaError::StoreUnavailable(_))));
}

#[test]
fn test_list_available_slots_reads_the_clock_once() {
    let units = unit_repository();
    let schedules = InMemoryScheduleRepository::new(vec![("1", ymd(7, 16), vec!["08:30"])]);
    let clock = CountingClock::new(clock_at(7, 16, 8, 15).now());

    let actual = list_available_slots(&units, &schedules, &clock, "1", 7, 16).unwrap();
    assert!(actual.is_empty());
    assert_eq!(clock.reads.get(), 1);
}
