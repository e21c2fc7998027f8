use crate::entity::error::{AgendaError, AgendaResult};
use crate::entity::schedule::Schedule;
use crate::entity::time_slot::TimeSlot;
use crate::entity::unit::Unit;
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use yaml_rust::{Yaml, YamlLoader};

#[cfg(test)]
use chrono::NaiveDate;

pub fn load_yaml_file(path: &Path) -> Result<Yaml, String> {
    let mut file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    let mut docs =
        YamlLoader::load_from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))?;
    if docs.is_empty() {
        return Ok(Yaml::Null);
    }
    Ok(docs.remove(0))
}

// ids are written either as '1' or as 1
fn yaml_to_id(yaml: &Yaml) -> Option<String> {
    match yaml {
        Yaml::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Yaml::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

pub fn yaml_to_unit_id(yaml: &Yaml) -> Option<String> {
    yaml_to_id(&yaml["id"])
}

pub fn parse_chosen_at(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .ok()
}

pub fn yaml_to_unit(yaml: &Yaml) -> AgendaResult<Unit> {
    let id = yaml_to_id(&yaml["id"])
        .ok_or_else(|| AgendaError::StoreUnavailable("unit without id".to_string()))?;
    let name = yaml["name"].as_str().unwrap_or("").to_string();

    // active may be stored as a boolean or as 0/1
    let active = match &yaml["active"] {
        Yaml::Boolean(b) => *b,
        Yaml::Integer(i) => *i != 0,
        _ => false,
    };

    let mut services = vec![];
    match &yaml["services"] {
        Yaml::Array(items) => {
            for item in items {
                if let Some(service) = item.as_str() {
                    services.push(service.to_string());
                }
            }
        }
        Yaml::String(s) => {
            services = s
                .split(',')
                .map(|x| x.trim().to_string())
                .filter(|x| !x.is_empty())
                .collect();
        }
        _ => {}
    }

    let start_time = TimeSlot::parse(yaml["starttime"].as_str().unwrap_or(""))?;
    let end_time = TimeSlot::parse(yaml["endtime"].as_str().unwrap_or(""))?;
    let service_time = match &yaml["servicetime"] {
        Yaml::String(s) => s.to_string(),
        Yaml::Integer(i) => i.to_string(),
        _ => String::new(),
    };

    Ok(Unit::new(
        id,
        name,
        active,
        services,
        start_time,
        end_time,
        service_time,
    ))
}

pub fn yaml_to_schedule(yaml: &Yaml) -> Option<Schedule> {
    let unit_id = yaml_to_id(&yaml["unit_id"])?;
    let chosen_at = parse_chosen_at(yaml["chosen_date"].as_str()?)?;

    Some(Schedule::new(unit_id, chosen_at))
}

/// Reads the "schedules" list, skipping entries that cannot be understood.
pub fn yaml_to_schedules(doc: &Yaml) -> Vec<Schedule> {
    let mut schedules = vec![];

    for schedule_yaml in doc["schedules"].as_vec().unwrap_or(&vec![]) {
        match yaml_to_schedule(schedule_yaml) {
            Some(schedule) => schedules.push(schedule),
            None => {
                log::warn!("skipping malformed schedule entry {:?}", schedule_yaml);
            }
        }
    }

    schedules
}

#[cfg(test)]
fn load(s: &str) -> Yaml {
    YamlLoader::load_from_str(s).unwrap().remove(0)
}

#[test]
fn test_yaml_to_unit_full_entry() {
    let doc = load(
        "
id: 1
name: 'Unidade Centro'
active: true
services: ['Clínica geral', 'Pediatria']
starttime: '08:00:00'
endtime: '17:00'
servicetime: '30 minutes'
",
    );

    let actual = yaml_to_unit(&doc).unwrap();
    let expected = Unit::new(
        "1".to_string(),
        "Unidade Centro".to_string(),
        true,
        vec!["Clínica geral".to_string(), "Pediatria".to_string()],
        TimeSlot::parse("08:00").unwrap(),
        TimeSlot::parse("17:00").unwrap(),
        "30 minutes".to_string(),
    );
    assert_eq!(actual, expected);
}

#[test]
fn test_yaml_to_unit_active_as_integer_and_services_as_text() {
    let doc = load(
        "
id: '7'
active: 1
services: 'Clínica geral, Pediatria'
starttime: '08:00'
endtime: '12:00'
servicetime: 45
",
    );

    let actual = yaml_to_unit(&doc).unwrap();
    let expected = Unit::new(
        "7".to_string(),
        String::new(),
        true,
        vec!["Clínica geral".to_string(), "Pediatria".to_string()],
        TimeSlot::parse("08:00").unwrap(),
        TimeSlot::parse("12:00").unwrap(),
        "45".to_string(),
    );
    assert_eq!(actual, expected);
    assert!(actual.is_bookable());
}

#[test]
fn test_yaml_to_unit_missing_active_key_is_inactive() {
    let doc = load(
        "
id: '7'
services: ['Pediatria']
starttime: '08:00'
endtime: '12:00'
servicetime: '30 minutes'
",
    );

    let actual = yaml_to_unit(&doc).unwrap();
    assert!(!actual.is_bookable());
}

#[test]
fn test_yaml_to_unit_bad_time_is_invalid_window() {
    let doc = load(
        "
id: '7'
active: true
services: ['Pediatria']
starttime: 'eight'
endtime: '12:00'
servicetime: '30 minutes'
",
    );

    let actual = yaml_to_unit(&doc);
    assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));
}

#[test]
fn test_yaml_to_unit_without_id() {
    let doc = load("name: 'Sem id'\n");
    let actual = yaml_to_unit(&doc);
    assert!(matches!(actual, Err(AgendaError::StoreUnavailable(_))));
}

#[test]
fn test_yaml_to_schedules_skips_malformed_entries() {
    let doc = load(
        "
schedules:
  - unit_id: 1
    chosen_date: '2023-07-17 08:30'
  - unit_id: '2'
    chosen_date: '2023-07-17 09:00:00'
  - unit_id: '3'
    chosen_date: 'tomorrow'
  - chosen_date: '2023-07-17 10:00'
",
    );

    let actual = yaml_to_schedules(&doc);
    assert_eq!(actual.len(), 2);
    assert_eq!(actual[0].get_unit_id(), "1");
    assert_eq!(
        actual[1].get_chosen_at(),
        NaiveDate::from_ymd_opt(2023, 7, 17)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    );
}

#[test]
fn test_yaml_to_schedules_missing_key_is_empty() {
    let doc = load("other: []\n");
    let actual = yaml_to_schedules(&doc);
    assert!(actual.is_empty());
}

#[test]
fn test_parse_chosen_at_with_and_without_seconds() {
    let expected = NaiveDate::from_ymd_opt(2023, 7, 16)
        .unwrap()
        .and_hms_opt(8, 15, 0);
    assert_eq!(parse_chosen_at("2023-07-16 08:15"), expected);
    assert_eq!(parse_chosen_at("2023-07-16 08:15:00"), expected);
    assert_eq!(parse_chosen_at("16/07/2023 08:15"), None);
}
