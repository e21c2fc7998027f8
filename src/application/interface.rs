use crate::entity::error::AgendaResult;
use crate::entity::time_slot::TimeSlot;
use crate::entity::unit::Unit;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

/// Wall-clock time in the single zone shared with the stores.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

pub trait UnitRepositoryTrait {
    // active units with at least one service only
    fn get_active_unit(&self, unit_id: &str) -> AgendaResult<Unit>;
}

pub trait ScheduleRepositoryTrait {
    fn get_booked_times(&self, unit_id: &str, date: NaiveDate) -> AgendaResult<HashSet<TimeSlot>>;
}
