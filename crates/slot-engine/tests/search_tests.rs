//! Tests for the bounded free-slot search loop.

mod common;

use chrono::{Datelike, NaiveDate, Weekday};
use common::{at, attendees, busy, date, free_calendar, FakeCalendar};
use slot_engine::{
    find_free_slots, AttendeeBusyMap, BusyPeriod, SchedulingError, SchedulingPolicy,
};

/// Bob is busy everywhere except 16:30-17:00; alice (primary) is free.
fn one_slot_per_day(day: NaiveDate) -> Result<AttendeeBusyMap, SchedulingError> {
    let d = day.day();
    let mut map = AttendeeBusyMap::new();
    map.insert(
        "bob@example.com",
        vec![busy(d, (9, 0), (11, 0)), busy(d, (13, 0), (16, 30))],
    );
    Ok(map)
}

// ── Quota and ordering ──────────────────────────────────────────────────────

#[test]
fn one_slot_per_weekday_consumes_five_weekdays() {
    // Thursday 2026-03-05: Thu, Fri, (weekend skipped), Mon, Tue, Wed.
    let calendar = FakeCalendar::new(one_slot_per_day);
    let people = attendees(&["alice@example.com", "bob@example.com"]);

    let slots = find_free_slots(&calendar, &people, &SchedulingPolicy::default(), at(5, 8, 0))
        .unwrap();

    assert_eq!(slots.len(), 5);
    let days: Vec<u32> = slots.iter().map(|s| s.start().day()).collect();
    assert_eq!(days, vec![5, 6, 9, 10, 11]);
    assert!(slots.windows(2).all(|w| w[0].end() <= w[1].start()));
    assert!(slots.iter().all(|s| s.start().format("%H:%M").to_string() == "16:30"));

    assert_eq!(
        calendar.queried(),
        vec![date(5), date(6), date(9), date(10), date(11)]
    );
}

#[test]
fn weekends_are_never_queried() {
    // Saturday morning start.
    let calendar = free_calendar();
    let people = attendees(&["alice@example.com"]);

    let slots = find_free_slots(&calendar, &people, &SchedulingPolicy::default(), at(7, 8, 0))
        .unwrap();

    assert!(calendar
        .queried()
        .iter()
        .all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)));
    assert_eq!(calendar.queried(), vec![date(9)]);
    assert_eq!(slots[0].start(), at(9, 9, 0));
}

#[test]
fn result_is_truncated_to_quota() {
    let calendar = free_calendar();
    let people = attendees(&["alice@example.com"]);
    let policy = SchedulingPolicy {
        quota: 3,
        ..Default::default()
    };

    let slots = find_free_slots(&calendar, &people, &policy, at(2, 8, 0)).unwrap();

    assert_eq!(slots.len(), 3);
    assert_eq!(slots[2].start(), at(2, 10, 0));
    assert_eq!(calendar.queried(), vec![date(2)]);
}

#[test]
fn afternoon_start_continues_into_next_day() {
    let calendar = free_calendar();
    let people = attendees(&["alice@example.com"]);

    // Monday 16:10: only 16:30 remains today.
    let slots = find_free_slots(&calendar, &people, &SchedulingPolicy::default(), at(2, 16, 10))
        .unwrap();

    assert_eq!(slots[0].start(), at(2, 16, 30));
    assert_eq!(slots[1].start(), at(3, 9, 0));
    assert_eq!(slots[4].start(), at(3, 10, 30));
}

#[test]
fn rejected_days_contribute_nothing() {
    // Alice is overloaded on Monday only.
    let calendar = FakeCalendar::new(|day: NaiveDate| {
        let mut map = AttendeeBusyMap::new();
        if day == date(2) {
            map.insert("alice@example.com", vec![busy(2, (9, 0), (15, 30))]);
        }
        Ok(map)
    });
    let people = attendees(&["alice@example.com", "bob@example.com"]);

    let slots = find_free_slots(&calendar, &people, &SchedulingPolicy::default(), at(2, 8, 0))
        .unwrap();

    // Monday's 16:00 and 16:30 are free on paper, but the day is rejected.
    assert!(slots.iter().all(|s| s.start().day() == 3));
}

// ── Errors and termination ──────────────────────────────────────────────────

#[test]
fn search_gives_up_after_lookahead() {
    let calendar = FakeCalendar::new(|day: NaiveDate| {
        let mut map = AttendeeBusyMap::new();
        map.insert(
            "alice@example.com",
            vec![busy(day.day(), (9, 0), (17, 0))],
        );
        Ok(map)
    });
    let people = attendees(&["alice@example.com"]);
    let policy = SchedulingPolicy {
        max_lookahead_days: 10,
        ..Default::default()
    };

    let err = find_free_slots(&calendar, &people, &policy, at(2, 8, 0)).unwrap_err();

    assert_eq!(
        err,
        SchedulingError::SearchExhausted {
            found: 0,
            quota: 5,
            lookahead_days: 10
        }
    );
    // Two working weeks inside the ten days.
    assert_eq!(calendar.queried().len(), 8);
}

#[test]
fn partial_results_still_exhaust() {
    let calendar = FakeCalendar::new(one_slot_per_day);
    let people = attendees(&["alice@example.com", "bob@example.com"]);
    let policy = SchedulingPolicy {
        max_lookahead_days: 3,
        ..Default::default()
    };

    let err = find_free_slots(&calendar, &people, &policy, at(2, 8, 0)).unwrap_err();
    assert!(matches!(
        err,
        SchedulingError::SearchExhausted { found: 3, .. }
    ));
}

#[test]
fn upstream_failure_aborts_immediately() {
    let calendar = FakeCalendar::new(|_| {
        Err(SchedulingError::UpstreamUnavailable("503".into()))
    });
    let people = attendees(&["alice@example.com"]);

    let err = find_free_slots(&calendar, &people, &SchedulingPolicy::default(), at(2, 8, 0))
        .unwrap_err();

    assert!(matches!(err, SchedulingError::UpstreamUnavailable(_)));
    assert_eq!(calendar.queried().len(), 1);
}

#[test]
fn malformed_day_is_skipped() {
    let calendar = FakeCalendar::new(|day: NaiveDate| {
        let mut map = AttendeeBusyMap::new();
        if day == date(2) {
            map.insert("alice@example.com", vec![BusyPeriod::new("garbage", "garbage")]);
        }
        Ok(map)
    });
    let people = attendees(&["alice@example.com"]);

    let slots = find_free_slots(&calendar, &people, &SchedulingPolicy::default(), at(2, 8, 0))
        .unwrap();

    assert_eq!(slots[0].start(), at(3, 9, 0));
    assert_eq!(calendar.queried(), vec![date(2), date(3)]);
}

#[test]
fn naive_timestamps_skip_the_day() {
    let calendar = FakeCalendar::new(|day: NaiveDate| {
        let mut map = AttendeeBusyMap::new();
        if day == date(2) {
            map.insert(
                "alice@example.com",
                vec![BusyPeriod::new("2026-03-02T10:00:00", "2026-03-02T11:00:00")],
            );
        }
        Ok(map)
    });
    let people = attendees(&["alice@example.com"]);

    let slots = find_free_slots(&calendar, &people, &SchedulingPolicy::default(), at(2, 8, 0))
        .unwrap();

    assert_eq!(slots[0].start(), at(3, 9, 0));
    assert_eq!(calendar.queried(), vec![date(2), date(3)]);
}

#[test]
fn oversized_quota_fails_before_querying() {
    let calendar = free_calendar();
    let people = attendees(&["alice@example.com"]);
    let policy = SchedulingPolicy {
        quota: usize::MAX,
        ..Default::default()
    };

    let err = find_free_slots(&calendar, &people, &policy, at(2, 8, 0)).unwrap_err();

    assert!(matches!(err, SchedulingError::InvalidPolicy(_)));
    assert!(calendar.queried().is_empty());
}

#[test]
fn no_attendees_is_an_error() {
    let calendar = free_calendar();
    let err = find_free_slots(&calendar, &[], &SchedulingPolicy::default(), at(2, 8, 0))
        .unwrap_err();
    assert_eq!(err, SchedulingError::NoAttendees);
    assert!(calendar.queried().is_empty());
}
