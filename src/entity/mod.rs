pub mod error;
pub mod interval;
pub mod month;
pub mod schedule;
pub mod time_slot;
pub mod unit;
