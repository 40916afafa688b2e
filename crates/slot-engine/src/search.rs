//! The bounded day-by-day walk that collects free slots.

use chrono::{DateTime, Days};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::collab::CalendarRead;
use crate::error::{Result, SchedulingError};
use crate::evaluator::{evaluate_day, DayOutcome};
use crate::interval::TimeInterval;
use crate::policy::SchedulingPolicy;
use crate::slots::{is_weekend, DayWindow};

/// Walk forward from `now`'s date until `policy.quota` free slots are found.
///
/// Weekends are skipped without asking the calendar. A day whose busy data is
/// malformed or carries timestamps without a UTC offset yields no slots and
/// the walk moves on; any other error ends the search. The walk covers at most `policy.max_lookahead_days` dates.
///
/// Returned slots are in chronological order, exactly `policy.quota` of them.
///
/// # Errors
/// - `SearchExhausted` if the lookahead runs out before the quota is met.
/// - `UpstreamUnavailable` as soon as the calendar read fails.
/// - `NoAttendees` / `InvalidPolicy` for unusable inputs.
pub fn find_free_slots(
    reader: &dyn CalendarRead,
    attendees: &[String],
    policy: &SchedulingPolicy,
    now: DateTime<Tz>,
) -> Result<Vec<TimeInterval>> {
    policy.validate()?;
    if attendees.is_empty() {
        return Err(SchedulingError::NoAttendees);
    }

    let tz = now.timezone();
    let today = now.date_naive();
    let mut collected: Vec<TimeInterval> = Vec::new();

    for day_offset in 0..policy.max_lookahead_days {
        let Some(date) = today.checked_add_days(Days::new(u64::from(day_offset))) else {
            break;
        };
        if is_weekend(date) {
            debug!(%date, "skipping weekend");
            continue;
        }

        let window = match DayWindow::for_date(date, tz, policy) {
            Ok(window) => window,
            Err(e) if e.is_day_scoped() => {
                warn!(%date, error = %e, "skipping day");
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!(%date, "querying availability");
        let busy = reader.busy_intervals(attendees, &window)?;

        match evaluate_day(&busy, attendees, &window, now, policy) {
            Ok(DayOutcome::Rejected { committed }) => {
                info!(
                    %date,
                    committed_minutes = committed.num_minutes(),
                    "primary attendee too busy, skipping day"
                );
            }
            Ok(outcome) => collected.extend(outcome.into_free()),
            // `now` shares the window's zone here, so a mismatch can only come
            // from the day's busy data.
            Err(e) if e.is_day_scoped() || matches!(e, SchedulingError::TimezoneMismatch(_)) => {
                warn!(%date, error = %e, "ignoring day with bad busy data");
            }
            Err(e) => return Err(e),
        }

        if collected.len() >= policy.quota {
            collected.truncate(policy.quota);
            info!(slots = collected.len(), days = day_offset + 1, "found free slots");
            return Ok(collected);
        }
    }

    Err(SchedulingError::SearchExhausted {
        found: collected.len(),
        quota: policy.quota,
        lookahead_days: policy.max_lookahead_days,
    })
}
