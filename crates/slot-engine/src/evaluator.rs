//! Day admission and slot admission against attendees' busy periods.

use std::collections::HashMap;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{Result, SchedulingError};
use crate::interval::{BusyPeriod, TimeInterval};
use crate::policy::SchedulingPolicy;
use crate::slots::{CandidateSlots, DayWindow, SlotStatus};

/// Busy periods per attendee for a single day, in the order the calendar
/// returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendeeBusyMap {
    periods: HashMap<String, Vec<BusyPeriod>>,
}

impl AttendeeBusyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attendee: impl Into<String>, periods: Vec<BusyPeriod>) {
        self.periods.insert(attendee.into(), periods);
    }

    /// An attendee with no entry is free all day.
    pub fn periods(&self, attendee: &str) -> &[BusyPeriod] {
        self.periods.get(attendee).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.periods.values().all(Vec::is_empty)
    }

    /// The attendee's busy periods parsed into `tz`.
    pub fn intervals(&self, attendee: &str, tz: Tz) -> Result<Vec<TimeInterval>> {
        self.periods(attendee)
            .iter()
            .map(|p| p.to_interval(tz))
            .collect()
    }
}

impl FromIterator<(String, Vec<BusyPeriod>)> for AttendeeBusyMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<BusyPeriod>)>>(iter: I) -> Self {
        Self {
            periods: iter.into_iter().collect(),
        }
    }
}

/// Verdict of the day admission test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAdmission {
    pub admitted: bool,
    /// Total busy time of the primary attendee.
    pub committed: Duration,
}

/// Result of evaluating one day.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Rejected { committed: Duration },
    Admitted { free: Vec<TimeInterval>, busy: usize },
}

impl DayOutcome {
    pub fn into_free(self) -> Vec<TimeInterval> {
        match self {
            DayOutcome::Rejected { .. } => Vec::new(),
            DayOutcome::Admitted { free, .. } => free,
        }
    }
}

/// Decide whether the day is worth proposing meetings on.
///
/// Only the attendee at `policy.primary_attendee_index` counts: the day is
/// rejected when their busy time strictly exceeds the admission threshold,
/// whatever everybody else's calendar looks like.
pub fn admits_day(
    busy: &AttendeeBusyMap,
    attendees: &[String],
    tz: Tz,
    policy: &SchedulingPolicy,
) -> Result<DayAdmission> {
    policy.validate()?;
    let primary = attendees.get(policy.primary_attendee_index).ok_or_else(|| {
        SchedulingError::InvalidPolicy(format!(
            "primary attendee index {} is out of range for {} attendees",
            policy.primary_attendee_index,
            attendees.len()
        ))
    })?;

    let committed = busy
        .intervals(primary, tz)?
        .iter()
        .fold(Duration::zero(), |total, interval| total + interval.duration());

    Ok(DayAdmission {
        admitted: committed <= policy.admission_threshold(),
        committed,
    })
}

/// Run day admission, then test every candidate slot of `window` against the
/// busy periods of all attendees.
pub fn evaluate_day(
    busy: &AttendeeBusyMap,
    attendees: &[String],
    window: &DayWindow,
    now: DateTime<Tz>,
    policy: &SchedulingPolicy,
) -> Result<DayOutcome> {
    let tz = window.zone();
    let admission = admits_day(busy, attendees, tz, policy)?;
    if !admission.admitted {
        return Ok(DayOutcome::Rejected {
            committed: admission.committed,
        });
    }

    let mut merged = Vec::new();
    for attendee in attendees {
        merged.extend(busy.intervals(attendee, tz)?);
    }

    let mut free = Vec::new();
    let mut busy_slots = 0;
    for mut slot in CandidateSlots::new(window, now, policy)? {
        slot.status = if merged.iter().any(|b| b.overlaps(&slot.interval)) {
            SlotStatus::Busy
        } else {
            SlotStatus::Free
        };
        if slot.is_free() {
            free.push(slot.interval);
        } else {
            busy_slots += 1;
        }
    }

    debug!(
        date = %window.date,
        free = free.len(),
        busy = busy_slots,
        committed_minutes = admission.committed.num_minutes(),
        "evaluated day"
    );

    Ok(DayOutcome::Admitted {
        free,
        busy: busy_slots,
    })
}
