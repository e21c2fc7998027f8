use crate::adapter::gateway::yaml::{load_yaml_file, yaml_to_schedules};
use crate::application::interface::ScheduleRepositoryTrait;
use crate::entity::error::{AgendaError, AgendaResult};
use crate::entity::schedule::{booked_times, Schedule};
use crate::entity::time_slot::TimeSlot;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::PathBuf;

#[cfg(test)]
use std::fs;

pub struct ScheduleRepository {
    schedules_file_path: PathBuf,
}

impl ScheduleRepository {
    pub fn new(schedules_file_path: PathBuf) -> Self {
        Self {
            schedules_file_path,
        }
    }

    // no file yet means nothing has been booked
    pub fn get_all_schedules(&self) -> AgendaResult<Vec<Schedule>> {
        if !self.schedules_file_path.exists() {
            return Ok(vec![]);
        }

        let doc =
            load_yaml_file(&self.schedules_file_path).map_err(AgendaError::StoreUnavailable)?;
        Ok(yaml_to_schedules(&doc))
    }
}

impl ScheduleRepositoryTrait for ScheduleRepository {
    fn get_booked_times(&self, unit_id: &str, date: NaiveDate) -> AgendaResult<HashSet<TimeSlot>> {
        let schedules = self.get_all_schedules()?;
        Ok(booked_times(&schedules, unit_id, date))
    }
}

#[cfg(test)]
const SCHEDULES: &str = "
schedules:
  - unit_id: '1'
    chosen_date: '2023-07-17 08:30'
  - unit_id: '1'
    chosen_date: '2023-07-17 11:00:00'
  - unit_id: '1'
    chosen_date: '2023-07-18 09:00'
  - unit_id: '2'
    chosen_date: '2023-07-17 10:00'
";

#[test]
fn test_get_booked_times_for_unit_and_date() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("schedules.yaml");
    fs::write(&path, SCHEDULES).unwrap();
    let repository = ScheduleRepository::new(path);

    let date = NaiveDate::from_ymd_opt(2023, 7, 17).unwrap();
    let actual = repository.get_booked_times("1", date).unwrap();
    let expected: HashSet<TimeSlot> = ["08:30", "11:00"]
        .iter()
        .map(|l| TimeSlot::parse(l).unwrap())
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_get_booked_times_reads_the_file_on_every_call() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("schedules.yaml");
    let repository = ScheduleRepository::new(path.clone());
    let date = NaiveDate::from_ymd_opt(2023, 7, 17).unwrap();

    assert!(repository.get_booked_times("1", date).unwrap().is_empty());

    fs::write(&path, SCHEDULES).unwrap();
    assert_eq!(repository.get_booked_times("1", date).unwrap().len(), 2);
}

#[test]
fn test_get_booked_times_broken_file_is_store_unavailable() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("schedules.yaml");
    fs::write(&path, "schedules: [").unwrap();
    let repository = ScheduleRepository::new(path);

    let date = NaiveDate::from_ymd_opt(2023, 7, 17).unwrap();
    let actual = repository.get_booked_times("1", date);
    assert!(matches!(actual, Err(AgendaError::StoreUnavailable(_))));
}
