//! Turning a chosen slot into a booking request.

use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::collab::TicketLookup;
use crate::error::Result;
use crate::interval::TimeInterval;

static TICKET_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z]+-\d+)").expect("valid regex"));

/// The final payload handed to the calendar writer.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    /// Invitees, de-duplicated, in the order given.
    pub attendees: Vec<String>,
    pub slot: TimeInterval,
    pub title: String,
    pub description: String,
    /// IANA name of the zone the slot is expressed in.
    pub time_zone: String,
}

/// What the calendar writer returns for a created event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub link: String,
}

/// The ticket key at the very start of `title`, if any.
///
/// ```
/// use slot_engine::booking::extract_ticket_key;
///
/// assert_eq!(extract_ticket_key("ABC-42 kickoff"), Some("ABC-42"));
/// assert_eq!(extract_ticket_key("kickoff ABC-42"), None);
/// ```
pub fn extract_ticket_key(title: &str) -> Option<&str> {
    TICKET_KEY
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Shift the chosen slot by `offset_minutes` and derive the title and
/// description, enriching them from the ticket tracker when the title starts
/// with a ticket key.
///
/// A failed or empty ticket lookup keeps the title as given.
///
/// # Errors
/// `InvalidOffset` if the shifted slot cannot be represented.
pub fn resolve_booking(
    slot: &TimeInterval,
    offset_minutes: i64,
    title: &str,
    attendees: &[String],
    tickets: &dyn TicketLookup,
    tz: Tz,
) -> Result<BookingRequest> {
    let shifted = slot.shifted(offset_minutes)?.in_zone(tz);

    let mut booking_title = title.to_string();
    let mut description = format!("Meeting: {title}");

    if let Some(key) = extract_ticket_key(title) {
        match tickets.summary(key) {
            Ok(Some(summary)) => {
                info!(key, summary = %summary, "resolved ticket");
                booking_title = format!("{key} - {summary}");
                description = format!("{}\n\n{description}", tickets.browse_url(key));
            }
            Ok(None) => warn!(key, "ticket not found, keeping title as given"),
            Err(e) => warn!(key, error = %e, "ticket lookup failed, keeping title as given"),
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(attendees.len());
    for attendee in attendees {
        if !unique.contains(attendee) {
            unique.push(attendee.clone());
        }
    }

    Ok(BookingRequest {
        attendees: unique,
        slot: shifted,
        title: booking_title,
        description,
        time_zone: tz.name().to_string(),
    })
}
