//! Day windows and candidate slot generation.
//!
//! Generation only applies calendar policy (working hours, the exclusion
//! window, slots already in the past). Whether a slot collides with anyone's
//! busy time is decided later by the evaluator.

use std::iter::FusedIterator;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;

use crate::error::{Result, SchedulingError};
use crate::interval::{local, TimeInterval};
use crate::policy::SchedulingPolicy;

/// The working hours of one calendar date in the target zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start_of_day: DateTime<Tz>,
    pub end_of_day: DateTime<Tz>,
}

impl DayWindow {
    /// Apply the policy's working hours to `date` in `tz`.
    ///
    /// # Errors
    /// `InvalidLocalTime` if either bound falls in a DST gap.
    pub fn for_date(date: NaiveDate, tz: Tz, policy: &SchedulingPolicy) -> Result<Self> {
        let start_of_day = local(tz, date.and_time(policy.day_start))?;
        let end_of_day = local(tz, date.and_time(policy.day_end))?;
        Ok(Self {
            date,
            start_of_day,
            end_of_day,
        })
    }

    pub fn zone(&self) -> Tz {
        self.start_of_day.timezone()
    }

    pub fn is_weekend(&self) -> bool {
        is_weekend(self.date)
    }

    pub fn as_interval(&self) -> Result<TimeInterval> {
        TimeInterval::new(self.start_of_day, self.end_of_day)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Unchecked,
    Free,
    Busy,
}

/// A fixed-length slot considered for booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateSlot {
    pub interval: TimeInterval,
    pub status: SlotStatus,
}

impl CandidateSlot {
    pub fn is_free(&self) -> bool {
        self.status == SlotStatus::Free
    }
}

/// Lazily tiles a [`DayWindow`] into contiguous slots, skipping excluded and
/// past ones. Once exhausted it stays exhausted.
#[derive(Debug, Clone)]
pub struct CandidateSlots {
    cursor: DateTime<Tz>,
    end_of_day: DateTime<Tz>,
    length: Duration,
    exclusion: Option<TimeInterval>,
    now: DateTime<Tz>,
}

impl CandidateSlots {
    /// # Errors
    /// `TimezoneMismatch` if `now` is not in the window's zone, `InvalidPolicy`
    /// if the policy does not validate.
    pub fn new(window: &DayWindow, now: DateTime<Tz>, policy: &SchedulingPolicy) -> Result<Self> {
        policy.validate()?;
        if now.timezone() != window.zone() {
            return Err(SchedulingError::TimezoneMismatch(format!(
                "now is in {} but the day window is in {}",
                now.timezone().name(),
                window.zone().name()
            )));
        }

        let exclusion = if policy.exclusion_start < policy.exclusion_end {
            let tz = window.zone();
            let start = local(tz, window.date.and_time(policy.exclusion_start))?;
            let end = local(tz, window.date.and_time(policy.exclusion_end))?;
            Some(TimeInterval::new(start, end)?)
        } else {
            None
        };

        Ok(Self {
            cursor: window.start_of_day,
            end_of_day: window.end_of_day,
            length: policy.slot_length(),
            exclusion,
            now,
        })
    }

    fn is_excluded(&self, slot: &TimeInterval) -> bool {
        self.exclusion.is_some_and(|lunch| lunch.overlaps(slot))
    }
}

impl Iterator for CandidateSlots {
    type Item = CandidateSlot;

    fn next(&mut self) -> Option<CandidateSlot> {
        loop {
            let slot_end = self.cursor.checked_add_signed(self.length)?;
            if slot_end > self.end_of_day {
                return None;
            }
            let slot = TimeInterval::new(self.cursor, slot_end).ok()?;
            self.cursor = slot_end;

            if self.is_excluded(&slot) || slot.start() < self.now {
                continue;
            }
            return Some(CandidateSlot {
                interval: slot,
                status: SlotStatus::Unchecked,
            });
        }
    }
}

impl FusedIterator for CandidateSlots {}
