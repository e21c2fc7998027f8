use crate::entity::error::{AgendaError, AgendaResult};
use crate::entity::interval::ServiceInterval;
use crate::entity::time_slot::TimeSlot;
use chrono::{NaiveDate, NaiveDateTime};

#[cfg(test)]
use chrono::NaiveTime;

/// A service location (clinic, office) with its operating hours.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    id: String,
    name: String,
    active: bool,
    services: Vec<String>,
    start_time: TimeSlot,
    end_time: TimeSlot,
    // free text as stored, e.g. "30 minutes"
    service_time: String,
}

impl Unit {
    pub fn new(
        id: String,
        name: String,
        active: bool,
        services: Vec<String>,
        start_time: TimeSlot,
        end_time: TimeSlot,
        service_time: String,
    ) -> Self {
        Self {
            id,
            name,
            active,
            services,
            start_time,
            end_time,
            service_time,
        }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_service_time(&self) -> &str {
        &self.service_time
    }

    /// Only active units offering at least one service take appointments.
    pub fn is_bookable(&self) -> bool {
        self.active && self.services.iter().any(|s| !s.trim().is_empty())
    }

    pub fn window_for(&self, target_date: NaiveDate) -> AgendaResult<UnitWindow> {
        let interval = ServiceInterval::parse(&self.service_time)?;
        UnitWindow::new(self.start_time, self.end_time, interval, target_date)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnitWindow {
    start_time: TimeSlot,
    end_time: TimeSlot,
    interval: ServiceInterval,
    target_date: NaiveDate,
}

impl UnitWindow {
    pub fn new(
        start_time: TimeSlot,
        end_time: TimeSlot,
        interval: ServiceInterval,
        target_date: NaiveDate,
    ) -> AgendaResult<Self> {
        if start_time >= end_time {
            return Err(AgendaError::InvalidWindow(format!(
                "start {} is not before end {}",
                start_time, end_time
            )));
        }

        Ok(Self {
            start_time,
            end_time,
            interval,
            target_date,
        })
    }

    pub fn get_start_time(&self) -> TimeSlot {
        self.start_time
    }

    pub fn get_end_time(&self) -> TimeSlot {
        self.end_time
    }

    pub fn get_interval(&self) -> ServiceInterval {
        self.interval
    }

    pub fn get_target_date(&self) -> NaiveDate {
        self.target_date
    }
}

/// Candidate start times in [start, end) stepping by the service interval.
/// On the current day, times at or before the current minute are dropped.
pub fn generate_slots(window: &UnitWindow, now: &NaiveDateTime) -> AgendaResult<Vec<TimeSlot>> {
    let start = window.start_time.get_minute_of_day();
    let end = window.end_time.get_minute_of_day();
    let step = window.interval.get_minutes();

    if start >= end || step == 0 {
        return Err(AgendaError::InvalidWindow(format!(
            "{}-{} every {}",
            window.start_time, window.end_time, window.interval
        )));
    }

    let is_current_day = window.target_date == now.date();
    let current = TimeSlot::from_time(&now.time());

    let slots = (start..end)
        .step_by(step as usize)
        .map(TimeSlot::from_minute_of_day)
        .filter(|slot| !is_current_day || *slot > current)
        .collect();

    Ok(slots)
}

#[cfg(test)]
fn window(start: &str, end: &str, interval: &str, date: NaiveDate) -> UnitWindow {
    UnitWindow::new(
        TimeSlot::parse(start).unwrap(),
        TimeSlot::parse(end).unwrap(),
        ServiceInterval::parse(interval).unwrap(),
        date,
    )
    .unwrap()
}

#[cfg(test)]
fn labels(slots: &[TimeSlot]) -> Vec<String> {
    slots.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
fn unit(active: bool, services: Vec<&str>, service_time: &str) -> Unit {
    Unit::new(
        "1".to_string(),
        "Unidade Centro".to_string(),
        active,
        services.into_iter().map(|s| s.to_string()).collect(),
        TimeSlot::parse("08:00").unwrap(),
        TimeSlot::parse("12:00").unwrap(),
        service_time.to_string(),
    )
}

#[test]
fn test_generate_slots_other_day_is_not_filtered() {
    let w = window("08:00", "09:00", "30 minutes", ymd(2023, 7, 17));
    let now = ymd(2023, 7, 16).and_hms_opt(8, 15, 0).unwrap();

    let actual = generate_slots(&w, &now).unwrap();
    assert_eq!(labels(&actual), vec!["08:00", "08:30"]);
}

#[test]
fn test_generate_slots_current_day_drops_past_times() {
    let w = window("08:00", "09:00", "30 minutes", ymd(2023, 7, 16));
    let now = ymd(2023, 7, 16).and_hms_opt(8, 15, 0).unwrap();

    let actual = generate_slots(&w, &now).unwrap();
    assert_eq!(labels(&actual), vec!["08:30"]);
}

#[test]
fn test_generate_slots_current_day_drops_the_current_minute() {
    let w = window("08:00", "10:00", "30 minutes", ymd(2023, 7, 16));
    let now = ymd(2023, 7, 16).and_hms_opt(8, 30, 45).unwrap();

    let actual = generate_slots(&w, &now).unwrap();
    assert_eq!(labels(&actual), vec!["09:00", "09:30"]);
}

#[test]
fn test_generate_slots_current_day_after_closing_is_empty() {
    let w = window("08:00", "12:00", "1 hour", ymd(2023, 7, 16));
    let now = ymd(2023, 7, 16).and_hms_opt(18, 0, 0).unwrap();

    let actual = generate_slots(&w, &now).unwrap();
    assert!(actual.is_empty());
}

#[test]
fn test_generate_slots_interval_not_dividing_window() {
    let w = window("08:00", "09:00", "25 minutes", ymd(2023, 7, 17));
    let now = ymd(2023, 7, 16).and_hms_opt(8, 0, 0).unwrap();

    let actual = generate_slots(&w, &now).unwrap();
    assert_eq!(labels(&actual), vec!["08:00", "08:25", "08:50"]);
}

#[test]
fn test_generate_slots_is_strictly_increasing() {
    let date = ymd(2023, 7, 17);
    let now = ymd(2023, 7, 16).and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());

    for interval in ["1", "7 minutes", "15 min", "45 minutes", "1 hour 10 minutes"] {
        let w = window("07:00", "19:30", interval, date);
        let actual = generate_slots(&w, &now).unwrap();

        assert!(!actual.is_empty());
        assert_eq!(actual[0].to_string(), "07:00");
        assert!(actual.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(actual.iter().all(|slot| slot.to_string().as_str() < "19:30"));
    }
}

#[test]
fn test_generate_slots_up_to_midnight_does_not_roll_over() {
    let w = window("22:00", "23:59", "1 hour", ymd(2023, 7, 17));
    let now = ymd(2023, 7, 16).and_hms_opt(8, 0, 0).unwrap();

    let actual = generate_slots(&w, &now).unwrap();
    assert_eq!(labels(&actual), vec!["22:00", "23:00"]);
}

#[test]
fn test_unit_window_new_start_not_before_end_is_invalid() {
    let actual = UnitWindow::new(
        TimeSlot::parse("09:00").unwrap(),
        TimeSlot::parse("09:00").unwrap(),
        ServiceInterval::from_minutes(30).unwrap(),
        ymd(2023, 7, 17),
    );
    assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));

    let actual = UnitWindow::new(
        TimeSlot::parse("17:00").unwrap(),
        TimeSlot::parse("08:00").unwrap(),
        ServiceInterval::from_minutes(30).unwrap(),
        ymd(2023, 7, 17),
    );
    assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));
}

#[test]
fn test_window_for_parses_service_time() {
    let u = unit(true, vec!["Clínica geral"], "1 hour");
    let actual = u.window_for(ymd(2023, 7, 17)).unwrap();

    assert_eq!(actual.get_interval().get_minutes(), 60);
    assert_eq!(actual.get_start_time().to_string(), "08:00");
    assert_eq!(actual.get_end_time().to_string(), "12:00");
    assert_eq!(actual.get_target_date(), ymd(2023, 7, 17));
}

#[test]
fn test_window_for_bad_service_time_is_invalid_window() {
    let u = unit(true, vec!["Clínica geral"], "sometimes");
    let actual = u.window_for(ymd(2023, 7, 17));
    assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));
}

#[test]
fn test_is_bookable() {
    assert!(unit(true, vec!["Clínica geral"], "30 minutes").is_bookable());
    assert!(!unit(false, vec!["Clínica geral"], "30 minutes").is_bookable());
    assert!(!unit(true, vec![], "30 minutes").is_bookable());
    assert!(!unit(true, vec!["  "], "30 minutes").is_bookable());
}
