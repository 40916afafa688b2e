//! Collaborator seams: everything the engine needs from the outside world.
//!
//! The engine never performs I/O itself. Calendar reads and writes, ticket
//! lookups and the user's slot choice all come through these traits, so the
//! search and booking logic can be driven by fakes in tests.

use crate::booking::{BookingRequest, CreatedEvent};
use crate::error::Result;
use crate::evaluator::AttendeeBusyMap;
use crate::interval::TimeInterval;
use crate::slots::DayWindow;

/// Reads attendees' busy periods from a calendar service.
pub trait CalendarRead {
    /// # Errors
    /// `UpstreamUnavailable` on transport or authorization failure.
    fn busy_intervals(&self, attendees: &[String], window: &DayWindow) -> Result<AttendeeBusyMap>;
}

/// Persists a finished booking.
pub trait CalendarWrite {
    /// # Errors
    /// `UpstreamUnavailable` on transport or authorization failure.
    fn create_event(&self, request: &BookingRequest) -> Result<CreatedEvent>;
}

/// Resolves ticket keys such as `ABC-123` against an issue tracker.
pub trait TicketLookup {
    /// `Ok(None)` when the tracker has no such ticket.
    fn summary(&self, key: &str) -> Result<Option<String>>;

    /// Deep link to the ticket in the tracker's web UI.
    fn browse_url(&self, key: &str) -> String;
}

/// What the user picked from the proposed slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A 1-based position in the list shown.
    Chosen(usize),
    Cancelled,
    /// Input that is not a number at all.
    Invalid(String),
}

/// Presents the free slots and returns the user's choice.
pub trait SlotSelector {
    fn choose(&mut self, slots: &[TimeInterval]) -> Selection;
}

impl<F> SlotSelector for F
where
    F: FnMut(&[TimeInterval]) -> Selection,
{
    fn choose(&mut self, slots: &[TimeInterval]) -> Selection {
        self(slots)
    }
}
