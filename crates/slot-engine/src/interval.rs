//! Time intervals and overlap testing.
//!
//! Intervals are half-open `[start, end)`: an interval that ends exactly when
//! another starts does NOT overlap it. Comparison is by instant, so two
//! intervals in different zones still compare correctly, but callers that need
//! a single zone (the slot generator, the evaluator) normalize first.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};

/// A non-empty span of time in a named zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl TimeInterval {
    /// Build an interval, rejecting `start >= end`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self> {
        if start >= end {
            return Err(SchedulingError::MalformedBusyInterval(format!(
                "start {} is not before end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn zone(&self) -> Tz {
        self.start.timezone()
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Fails with `TimezoneMismatch` unless both intervals use the same zone.
    pub fn same_zone(&self, other: &TimeInterval) -> Result<()> {
        if self.zone() != other.zone() {
            return Err(SchedulingError::TimezoneMismatch(format!(
                "{} vs {}",
                self.zone().name(),
                other.zone().name()
            )));
        }
        Ok(())
    }

    /// The same instants expressed in `tz`.
    pub fn in_zone(&self, tz: Tz) -> TimeInterval {
        TimeInterval {
            start: self.start.with_timezone(&tz),
            end: self.end.with_timezone(&tz),
        }
    }

    /// Shift both endpoints by `minutes`, failing on arithmetic overflow.
    pub fn shifted(&self, minutes: i64) -> Result<TimeInterval> {
        let delta = Duration::try_minutes(minutes)
            .ok_or_else(|| SchedulingError::InvalidOffset(format!("{minutes} minutes")))?;
        let start = self
            .start
            .checked_add_signed(delta)
            .ok_or_else(|| SchedulingError::InvalidOffset(format!("{minutes} minutes")))?;
        let end = self
            .end
            .checked_add_signed(delta)
            .ok_or_else(|| SchedulingError::InvalidOffset(format!("{minutes} minutes")))?;
        TimeInterval::new(start, end)
            .map_err(|e| SchedulingError::InvalidOffset(e.to_string()))
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Free function form of [`TimeInterval::overlaps`].
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.overlaps(b)
}

/// A busy period exactly as the calendar service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyPeriod {
    pub start: String,
    pub end: String,
}

impl BusyPeriod {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// A busy period built from an already-typed interval, as RFC 3339 with offset.
    pub fn from_interval(interval: &TimeInterval) -> Self {
        Self {
            start: interval.start().to_rfc3339(),
            end: interval.end().to_rfc3339(),
        }
    }

    /// Parse both endpoints and normalize them into `tz`.
    ///
    /// # Errors
    /// `TimezoneMismatch` when an endpoint has no UTC offset.
    /// `MalformedBusyInterval` when an endpoint is unparseable or `start >= end`.
    pub fn to_interval(&self, tz: Tz) -> Result<TimeInterval> {
        let start = parse_instant(&self.start, tz)?;
        let end = parse_instant(&self.end, tz)?;
        TimeInterval::new(start, end)
    }
}

fn parse_instant(raw: &str, tz: Tz) -> Result<DateTime<Tz>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&tz)),
        Err(_) if NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").is_ok() => Err(
            SchedulingError::TimezoneMismatch(format!("timestamp '{raw}' has no UTC offset")),
        ),
        Err(e) => Err(SchedulingError::MalformedBusyInterval(format!(
            "'{raw}': {e}"
        ))),
    }
}

/// Convenience for tests and callers holding wall-clock values.
pub fn local(tz: Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| SchedulingError::InvalidLocalTime(format!("{naive} in {}", tz.name())))
}
