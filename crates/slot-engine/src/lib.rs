//! # slot-engine
//!
//! Free-slot search and booking negotiation over several attendees' calendars.
//!
//! Given the busy periods of every attendee, the engine proposes fixed-length
//! meeting slots inside working hours, away from the lunch block, on days the
//! primary attendee is not already overloaded, and turns the chosen slot into
//! a booking request. All I/O happens behind the traits in [`collab`].
//!
//! ## Modules
//!
//! - [`interval`] — Half-open time intervals, overlap testing, busy period parsing
//! - [`policy`] — Working hours, exclusion window, quotas and limits
//! - [`slots`] — Day windows and candidate slot generation
//! - [`evaluator`] — Day admission and per-slot obstruction testing
//! - [`search`] — Bounded day-by-day walk until the quota is met
//! - [`booking`] — Offsetting the chosen slot and ticket-aware titles
//! - [`collab`] — Calendar, ticket tracker and selection seams
//! - [`negotiate`] — One complete propose/select/book run
//! - [`error`] — Error types

pub mod booking;
pub mod collab;
pub mod error;
pub mod evaluator;
pub mod interval;
pub mod negotiate;
pub mod policy;
pub mod search;
pub mod slots;

pub use booking::{extract_ticket_key, resolve_booking, BookingRequest, CreatedEvent};
pub use collab::{CalendarRead, CalendarWrite, Selection, SlotSelector, TicketLookup};
pub use error::SchedulingError;
pub use evaluator::{admits_day, evaluate_day, AttendeeBusyMap, DayOutcome};
pub use interval::{overlaps, BusyPeriod, TimeInterval};
pub use negotiate::{negotiate, Collaborators, MeetingRequest, Outcome};
pub use policy::{SchedulingPolicy, MAX_QUOTA};
pub use search::find_free_slots;
pub use slots::{CandidateSlot, CandidateSlots, DayWindow, SlotStatus};
