//! Search, selection, resolution and submission as one run.

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::info;

use crate::booking::{resolve_booking, BookingRequest, CreatedEvent};
use crate::collab::{CalendarRead, CalendarWrite, Selection, SlotSelector, TicketLookup};
use crate::error::Result;
use crate::policy::SchedulingPolicy;
use crate::search::find_free_slots;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingRequest {
    pub attendees: Vec<String>,
    pub title: String,
    /// Minutes added to both ends of the chosen slot; may be negative.
    pub offset_minutes: i64,
}

/// The services a run talks to.
pub struct Collaborators<'a> {
    pub reader: &'a dyn CalendarRead,
    pub writer: &'a dyn CalendarWrite,
    pub tickets: &'a dyn TicketLookup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Booked {
        request: BookingRequest,
        event: CreatedEvent,
    },
    Cancelled,
    /// The user's choice did not name a proposed slot. Nothing was written.
    InvalidSelection(String),
}

/// Propose slots, let `selector` pick one and book it.
///
/// The writer is called at most once, and only with a fully resolved request.
pub fn negotiate(
    collaborators: &Collaborators<'_>,
    selector: &mut dyn SlotSelector,
    meeting: &MeetingRequest,
    policy: &SchedulingPolicy,
    now: DateTime<Tz>,
) -> Result<Outcome> {
    let slots = find_free_slots(collaborators.reader, &meeting.attendees, policy, now)?;

    let chosen = match selector.choose(&slots) {
        Selection::Chosen(n) if (1..=slots.len()).contains(&n) => slots[n - 1],
        Selection::Chosen(n) => {
            return Ok(Outcome::InvalidSelection(format!(
                "Invalid choice: {n} is not between 1 and {}.",
                slots.len()
            )))
        }
        Selection::Invalid(reason) => return Ok(Outcome::InvalidSelection(reason)),
        Selection::Cancelled => return Ok(Outcome::Cancelled),
    };

    let request = resolve_booking(
        &chosen,
        meeting.offset_minutes,
        &meeting.title,
        &meeting.attendees,
        collaborators.tickets,
        now.timezone(),
    )?;

    let event = collaborators.writer.create_event(&request)?;
    info!(link = %event.link, title = %request.title, "meeting booked");

    Ok(Outcome::Booked { request, event })
}
