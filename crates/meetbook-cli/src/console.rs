//! Console presentation: slot lists, the user's pick, search and palette output.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use slot_engine::{Selection, SlotSelector, TimeInterval};

use crate::google::{Event, EventColor};

pub const INVALID_NUMBER: &str = "Invalid input. Please enter a number.";

/// `1: 2026-03-03 09:00 to 09:30`, one line per slot.
pub fn render_slots(slots: &[TimeInterval]) -> String {
    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| format!("{}: {}\n", i + 1, slot))
        .collect()
}

/// Matching events with their attendees' response status.
pub fn render_events(term: &str, events: &[Event]) -> String {
    if events.is_empty() {
        return format!("No upcoming meetings found with the title containing \"{term}\".\n");
    }

    let mut out = format!("Upcoming meetings with the title containing \"{term}\":\n");
    for event in events {
        let _ = writeln!(out, "{} - {}", event.start.display(), event.summary);
        match event.attendees.as_deref() {
            Some(attendees) if !attendees.is_empty() => {
                out.push_str("Attendees:\n");
                for attendee in attendees {
                    let _ = writeln!(out, " - {} ({})", attendee.email, attendee.response_status);
                }
            }
            _ => out.push_str("No attendees listed.\n"),
        }
        out.push('\n');
    }
    out
}

/// What to tell the user when the search ran out of days.
pub fn render_shortfall(found: usize, quota: usize, lookahead_days: u32) -> String {
    if found == 0 {
        "No free slots available.\n".to_string()
    } else {
        format!(
            "Only {found} of {quota} free slots found within {lookahead_days} days; nothing was booked.\n"
        )
    }
}

pub fn render_colors(palette: &[(String, EventColor)]) -> String {
    let mut out = String::from("Event Colors:\n");
    for (id, color) in palette {
        let _ = writeln!(
            out,
            "Color ID: {}, Background: {}, Foreground: {}",
            id, color.background, color.foreground
        );
    }
    out
}

/// Lists the slots on `output` and reads a 1-based number from `input`.
pub struct LineSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, slots: &[TimeInterval]) -> std::io::Result<Option<String>> {
        writeln!(self.output, "Available free slots:")?;
        write!(self.output, "{}", render_slots(slots))?;
        write!(self.output, "Select a slot by number: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> SlotSelector for LineSelector<R, W> {
    fn choose(&mut self, slots: &[TimeInterval]) -> Selection {
        match self.prompt(slots) {
            Ok(Some(line)) => match line.trim().parse::<usize>() {
                Ok(n) => Selection::Chosen(n),
                Err(_) => Selection::Invalid(INVALID_NUMBER.to_string()),
            },
            Ok(None) | Err(_) => Selection::Cancelled,
        }
    }
}

/// Non-interactive pick given on the command line; still prints the list.
pub struct PresetSelector<W> {
    choice: usize,
    output: W,
}

impl<W: Write> PresetSelector<W> {
    pub fn new(choice: usize, output: W) -> Self {
        Self { choice, output }
    }
}

impl<W: Write> SlotSelector for PresetSelector<W> {
    fn choose(&mut self, slots: &[TimeInterval]) -> Selection {
        let _ = writeln!(self.output, "Available free slots:");
        let _ = write!(self.output, "{}", render_slots(slots));
        Selection::Chosen(self.choice)
    }
}
