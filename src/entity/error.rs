pub type AgendaResult<T> = Result<T, AgendaError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgendaError {
    // past month, or outside 1..=12
    #[error("month {0} is not a valid month to render a calendar for")]
    InvalidMonth(u32),

    #[error("day {day} of month {month} is not a calendar date")]
    InvalidDate { month: u32, day: u32 },

    // start >= end, non-positive interval, unparsable times
    #[error("invalid operating window: {0}")]
    InvalidWindow(String),

    #[error("no active unit with services found for id {0}")]
    UnitNotFound(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
