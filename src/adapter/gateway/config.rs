use crate::adapter::gateway::clock::{FixedClock, SystemClock};
use crate::adapter::gateway::yaml::{load_yaml_file, parse_chosen_at};
use crate::application::interface::Clock;
use crate::entity::error::{AgendaError, AgendaResult};
use chrono::{FixedOffset, NaiveDateTime};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use yaml_rust::Yaml;

#[cfg(test)]
use chrono::NaiveDate;
#[cfg(test)]
use yaml_rust::YamlLoader;

#[derive(Clone, Debug, PartialEq)]
pub struct AgendaConfig {
    units_dir: PathBuf,
    schedules_file: PathBuf,
    // host local zone when absent
    utc_offset: Option<FixedOffset>,
    // pins the clock, e.g. for demos
    now: Option<NaiveDateTime>,
}

impl AgendaConfig {
    pub fn get_units_dir(&self) -> &Path {
        &self.units_dir
    }

    pub fn get_schedules_file(&self) -> &Path {
        &self.schedules_file
    }

    pub fn clock(&self) -> Box<dyn Clock> {
        match (self.now, self.utc_offset) {
            (Some(now), _) => Box::new(FixedClock::new(now)),
            (None, Some(offset)) => Box::new(SystemClock::with_offset(offset)),
            (None, None) => Box::new(SystemClock::local()),
        }
    }
}

/// "+09:00", "-03:00", "Z"
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s == "Z" || s == "UTC" {
        return FixedOffset::east_opt(0);
    }

    static OFFSET: OnceLock<Regex> = OnceLock::new();
    let re = OFFSET
        .get_or_init(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").expect("valid regex"));
    let cap = re.captures(s)?;
    let hours: i32 = cap[2].parse().ok()?;
    let minutes: i32 = cap[3].parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    let seconds = (hours * 60 + minutes) * 60;
    if &cap[1] == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}

fn resolve(base_dir: &Path, value: &Yaml, default: &str) -> PathBuf {
    let path = Path::new(value.as_str().unwrap_or(default));
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

pub fn yaml_to_config(yaml: &Yaml, base_dir: &Path) -> AgendaResult<AgendaConfig> {
    let agenda = &yaml["agenda"];
    if agenda.is_badvalue() {
        return Err(AgendaError::InvalidConfig("missing agenda key".to_string()));
    }

    let units_dir = resolve(base_dir, &agenda["units_dir"], "units");
    let schedules_file = resolve(base_dir, &agenda["schedules_file"], "schedules.yaml");

    let utc_offset = match agenda["utc_offset"].as_str() {
        None => None,
        Some(s) => Some(
            parse_utc_offset(s)
                .ok_or_else(|| AgendaError::InvalidConfig(format!("bad utc_offset {:?}", s)))?,
        ),
    };

    let now = match agenda["now"].as_str() {
        None => None,
        Some(s) => Some(
            parse_chosen_at(s)
                .ok_or_else(|| AgendaError::InvalidConfig(format!("bad now {:?}", s)))?,
        ),
    };

    Ok(AgendaConfig {
        units_dir,
        schedules_file,
        utc_offset,
        now,
    })
}

pub fn load_config_from_file(config_file_path: &Path) -> AgendaResult<AgendaConfig> {
    let doc = load_yaml_file(config_file_path).map_err(AgendaError::InvalidConfig)?;
    let base_dir = config_file_path.parent().unwrap_or_else(|| Path::new("."));

    yaml_to_config(&doc, base_dir)
}

#[cfg(test)]
fn load(s: &str) -> Yaml {
    YamlLoader::load_from_str(s).unwrap().remove(0)
}

#[test]
fn test_yaml_to_config_defaults() {
    let doc = load("agenda: {}\n");
    let actual = yaml_to_config(&doc, Path::new("/srv/agenda")).unwrap();

    assert_eq!(actual.get_units_dir(), Path::new("/srv/agenda/units"));
    assert_eq!(
        actual.get_schedules_file(),
        Path::new("/srv/agenda/schedules.yaml")
    );
    assert_eq!(actual.utc_offset, None);
}

#[test]
fn test_yaml_to_config_all_keys() {
    let doc = load(
        "
agenda:
  units_dir: '/data/units'
  schedules_file: 'db/schedules.yaml'
  utc_offset: '-03:00'
  now: '2023-07-16 08:15'
",
    );
    let actual = yaml_to_config(&doc, Path::new("/srv/agenda")).unwrap();

    assert_eq!(actual.get_units_dir(), Path::new("/data/units"));
    assert_eq!(
        actual.get_schedules_file(),
        Path::new("/srv/agenda/db/schedules.yaml")
    );
    assert_eq!(actual.utc_offset, FixedOffset::west_opt(3 * 3600));

    let expected_now = NaiveDate::from_ymd_opt(2023, 7, 16)
        .unwrap()
        .and_hms_opt(8, 15, 0)
        .unwrap();
    assert_eq!(actual.clock().now(), expected_now);
}

#[test]
fn test_yaml_to_config_missing_agenda_key() {
    let doc = load("units_dir: 'units'\n");
    let actual = yaml_to_config(&doc, Path::new("."));
    assert!(matches!(actual, Err(AgendaError::InvalidConfig(_))));
}

#[test]
fn test_yaml_to_config_bad_values() {
    let doc = load("agenda:\n  utc_offset: 'Brasilia'\n");
    let actual = yaml_to_config(&doc, Path::new("."));
    assert!(matches!(actual, Err(AgendaError::InvalidConfig(_))));

    let doc = load("agenda:\n  now: 'yesterday'\n");
    let actual = yaml_to_config(&doc, Path::new("."));
    assert!(matches!(actual, Err(AgendaError::InvalidConfig(_))));
}

#[test]
fn test_parse_utc_offset() {
    assert_eq!(parse_utc_offset("+09:00"), FixedOffset::east_opt(9 * 3600));
    assert_eq!(parse_utc_offset("-0330"), FixedOffset::west_opt(3 * 3600 + 1800));
    assert_eq!(parse_utc_offset("Z"), FixedOffset::east_opt(0));
    assert_eq!(parse_utc_offset("+9"), None);
    assert_eq!(parse_utc_offset("+05:75"), None);
}

#[test]
fn test_load_config_from_file_relative_to_the_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("agenda.yaml");
    std::fs::write(&path, "agenda:\n  units_dir: 'unidades'\n").unwrap();

    let actual = load_config_from_file(&path).unwrap();
    assert_eq!(actual.get_units_dir(), tmp.path().join("unidades"));
}

#[test]
fn test_load_config_from_file_missing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let actual = load_config_from_file(&tmp.path().join("agenda.yaml"));
    assert!(matches!(actual, Err(AgendaError::InvalidConfig(_))));
}
