//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulingError {
    /// Timestamps that should share one zone do not (or carry no offset at all).
    #[error("Timezone mismatch: {0}")]
    TimezoneMismatch(String),

    /// A busy period from the calendar could not be turned into an interval.
    #[error("Malformed busy interval: {0}")]
    MalformedBusyInterval(String),

    #[error("Search exhausted: found {found} of {quota} slots within {lookahead_days} days")]
    SearchExhausted {
        found: usize,
        quota: usize,
        lookahead_days: u32,
    },

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A wall-clock time that does not exist in the target zone (DST gap).
    #[error("Invalid local time: {0}")]
    InvalidLocalTime(String),

    #[error("No attendees given")]
    NoAttendees,

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),
}

impl SchedulingError {
    /// Errors that only spoil the day being evaluated; the search moves on.
    pub fn is_day_scoped(&self) -> bool {
        matches!(
            self,
            SchedulingError::MalformedBusyInterval(_) | SchedulingError::InvalidLocalTime(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
