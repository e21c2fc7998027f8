use crate::entity::error::{AgendaError, AgendaResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static WHOLE: OnceLock<Regex> = OnceLock::new();
static TERM: OnceLock<Regex> = OnceLock::new();

/// Appointment length of a unit, with minute granularity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServiceInterval {
    minutes: u32,
}

impl ServiceInterval {
    pub fn from_minutes(minutes: u32) -> AgendaResult<Self> {
        if minutes == 0 {
            return Err(AgendaError::InvalidWindow(
                "service interval must be positive".to_string(),
            ));
        }

        Ok(Self { minutes })
    }

    /// Reads the free-text durations stored with a unit, e.g. "30 minutes",
    /// "1 hour", "1 hour 30 minutes", "45 min" or a bare "30".
    pub fn parse(s: &str) -> AgendaResult<Self> {
        let s = s.trim().to_lowercase();
        let invalid = || AgendaError::InvalidWindow(format!("invalid service interval {:?}", s));

        if let Ok(minutes) = s.parse::<u32>() {
            return Self::from_minutes(minutes);
        }

        let whole = WHOLE
            .get_or_init(|| Regex::new(r"^(\s*\d+\s*[a-z]+\s*)+$").expect("valid regex"));
        if !whole.is_match(&s) {
            return Err(invalid());
        }

        let term = TERM.get_or_init(|| Regex::new(r"(\d+)\s*([a-z]+)").expect("valid regex"));
        let mut minutes: u32 = 0;

        for cap in term.captures_iter(&s) {
            let amount: u32 = cap[1].parse().map_err(|_| invalid())?;
            let factor = match &cap[2] {
                "minute" | "minutes" | "min" | "mins" | "m" => 1,
                "hour" | "hours" | "h" => 60,
                _ => return Err(invalid()),
            };
            minutes = amount
                .checked_mul(factor)
                .and_then(|m| minutes.checked_add(m))
                .ok_or_else(invalid)?;
        }

        Self::from_minutes(minutes)
    }

    pub fn get_minutes(&self) -> u32 {
        self.minutes
    }
}

impl fmt::Display for ServiceInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} minutes", self.minutes)
    }
}

#[test]
fn test_parse_minutes() {
    let actual = ServiceInterval::parse("30 minutes").unwrap();
    assert_eq!(actual.get_minutes(), 30);
}

#[test]
fn test_parse_short_and_singular_units() {
    assert_eq!(ServiceInterval::parse("45 min").unwrap().get_minutes(), 45);
    assert_eq!(ServiceInterval::parse("1 hour").unwrap().get_minutes(), 60);
    assert_eq!(ServiceInterval::parse("2 Hours").unwrap().get_minutes(), 120);
}

#[test]
fn test_parse_compound_duration() {
    let actual = ServiceInterval::parse("1 hour 30 minutes").unwrap();
    assert_eq!(actual.get_minutes(), 90);
}

#[test]
fn test_parse_bare_number_means_minutes() {
    let actual = ServiceInterval::parse(" 20 ").unwrap();
    assert_eq!(actual.get_minutes(), 20);
}

#[test]
fn test_parse_zero_is_invalid() {
    let actual = ServiceInterval::parse("0 minutes");
    assert!(matches!(actual, Err(AgendaError::InvalidWindow(_))));
}

#[test]
fn test_parse_unknown_unit_or_garbage_is_invalid() {
    assert!(ServiceInterval::parse("30 seconds").is_err());
    assert!(ServiceInterval::parse("half an hour").is_err());
    assert!(ServiceInterval::parse("").is_err());
    assert!(ServiceInterval::parse("-30 minutes").is_err());
}
