//! Shared fakes and builders for slot-engine integration tests.

#![allow(dead_code)]

use std::cell::RefCell;

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Europe::London;
use chrono_tz::Tz;
use slot_engine::{
    AttendeeBusyMap, BookingRequest, BusyPeriod, CalendarRead, CalendarWrite, CreatedEvent,
    DayWindow, SchedulingError, TicketLookup, TimeInterval,
};

/// 2026-03-`day` at `hour:minute` in London (GMT throughout early March).
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    London
        .with_ymd_and_hms(2026, 3, day, hour, minute, 0)
        .unwrap()
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

pub fn interval(day: u32, from: (u32, u32), to: (u32, u32)) -> TimeInterval {
    TimeInterval::new(at(day, from.0, from.1), at(day, to.0, to.1)).unwrap()
}

pub fn busy(day: u32, from: (u32, u32), to: (u32, u32)) -> BusyPeriod {
    BusyPeriod::from_interval(&interval(day, from, to))
}

pub fn attendees(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// A calendar whose busy data is computed per queried date.
pub struct FakeCalendar<F>
where
    F: Fn(NaiveDate) -> Result<AttendeeBusyMap, SchedulingError>,
{
    pub busy_for: F,
    pub queried: RefCell<Vec<NaiveDate>>,
}

impl<F> FakeCalendar<F>
where
    F: Fn(NaiveDate) -> Result<AttendeeBusyMap, SchedulingError>,
{
    pub fn new(busy_for: F) -> Self {
        Self {
            busy_for,
            queried: RefCell::new(Vec::new()),
        }
    }

    pub fn queried(&self) -> Vec<NaiveDate> {
        self.queried.borrow().clone()
    }
}

impl<F> CalendarRead for FakeCalendar<F>
where
    F: Fn(NaiveDate) -> Result<AttendeeBusyMap, SchedulingError>,
{
    fn busy_intervals(
        &self,
        _attendees: &[String],
        window: &DayWindow,
    ) -> Result<AttendeeBusyMap, SchedulingError> {
        self.queried.borrow_mut().push(window.date);
        (self.busy_for)(window.date)
    }
}

pub fn free_calendar() -> FakeCalendar<impl Fn(NaiveDate) -> Result<AttendeeBusyMap, SchedulingError>>
{
    FakeCalendar::new(|_| Ok(AttendeeBusyMap::new()))
}

/// Records every request instead of creating events.
#[derive(Default)]
pub struct RecordingWriter {
    pub created: RefCell<Vec<BookingRequest>>,
}

impl CalendarWrite for RecordingWriter {
    fn create_event(&self, request: &BookingRequest) -> Result<CreatedEvent, SchedulingError> {
        self.created.borrow_mut().push(request.clone());
        Ok(CreatedEvent {
            link: format!("https://calendar.example/event/{}", self.created.borrow().len()),
        })
    }
}

/// A tracker that knows a fixed set of tickets, or is down entirely.
pub struct FakeTickets {
    pub known: Vec<(&'static str, &'static str)>,
    pub down: bool,
}

impl FakeTickets {
    pub fn with(known: Vec<(&'static str, &'static str)>) -> Self {
        Self { known, down: false }
    }

    pub fn down() -> Self {
        Self {
            known: Vec::new(),
            down: true,
        }
    }
}

impl TicketLookup for FakeTickets {
    fn summary(&self, key: &str) -> Result<Option<String>, SchedulingError> {
        if self.down {
            return Err(SchedulingError::UpstreamUnavailable("tracker down".into()));
        }
        Ok(self
            .known
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, s)| s.to_string()))
    }

    fn browse_url(&self, key: &str) -> String {
        format!("https://tracker.example/browse/{key}")
    }
}
