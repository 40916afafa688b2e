//! Scheduling policy: every tunable of the search, with working defaults.

use chrono::{Duration, NaiveTime};

use crate::error::{Result, SchedulingError};

/// Largest number of slots a single search may be asked for.
pub const MAX_QUOTA: usize = 100;

/// All knobs the search and evaluator consult.
///
/// Defaults: 5 slots of 30 minutes between 09:00 and 17:00, nothing between
/// 11:00 and 13:00, days on which the primary attendee already has more than
/// five hours booked are skipped, and the walk gives up after 60 days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingPolicy {
    /// Number of free slots the search must find before stopping.
    pub quota: usize,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub exclusion_start: NaiveTime,
    pub exclusion_end: NaiveTime,
    /// A day is rejected when the primary attendee's busy time exceeds this.
    pub admission_threshold_minutes: i64,
    pub slot_minutes: i64,
    /// Upper bound on the day-by-day walk, weekends included.
    pub max_lookahead_days: u32,
    /// Which attendee's load gates day admission (0 = first listed).
    pub primary_attendee_index: usize,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            quota: 5,
            day_start: hm(9, 0),
            day_end: hm(17, 0),
            exclusion_start: hm(11, 0),
            exclusion_end: hm(13, 0),
            admission_threshold_minutes: 5 * 60,
            slot_minutes: 30,
            max_lookahead_days: 60,
            primary_attendee_index: 0,
        }
    }
}

impl SchedulingPolicy {
    /// Only meaningful on a policy that passed [`validate`](Self::validate).
    pub fn slot_length(&self) -> Duration {
        Duration::try_minutes(self.slot_minutes).unwrap_or(Duration::MAX)
    }

    /// Only meaningful on a policy that passed [`validate`](Self::validate).
    pub fn admission_threshold(&self) -> Duration {
        Duration::try_minutes(self.admission_threshold_minutes).unwrap_or(Duration::MAX)
    }

    /// Reject combinations the search cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.quota == 0 {
            return Err(SchedulingError::InvalidPolicy("quota must be at least 1".into()));
        }
        if self.quota > MAX_QUOTA {
            return Err(SchedulingError::InvalidPolicy(format!(
                "quota must be at most {}, got {}",
                MAX_QUOTA, self.quota
            )));
        }
        if self.day_start >= self.day_end {
            return Err(SchedulingError::InvalidPolicy(format!(
                "working hours {}-{} are empty",
                self.day_start, self.day_end
            )));
        }
        let working_day = self.day_end - self.day_start;
        if self.slot_minutes <= 0 || self.slot_minutes > working_day.num_minutes() {
            return Err(SchedulingError::InvalidPolicy(format!(
                "slot length must be between 1 and {} minutes, got {}",
                working_day.num_minutes(),
                self.slot_minutes
            )));
        }
        if self.exclusion_start > self.exclusion_end {
            return Err(SchedulingError::InvalidPolicy(format!(
                "exclusion window {}-{} is inverted",
                self.exclusion_start, self.exclusion_end
            )));
        }
        if self.admission_threshold_minutes < 0
            || Duration::try_minutes(self.admission_threshold_minutes).is_none()
        {
            return Err(SchedulingError::InvalidPolicy(format!(
                "admission threshold of {} minutes is out of range",
                self.admission_threshold_minutes
            )));
        }
        if self.max_lookahead_days == 0 {
            return Err(SchedulingError::InvalidPolicy(
                "max lookahead must be at least one day".into(),
            ));
        }
        Ok(())
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
