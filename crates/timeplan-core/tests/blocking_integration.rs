//! End-to-end tests for the time-blocking engine and schedule analyzer,
//! driven through the SQLite event store.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use proptest::prelude::*;

use timeplan_core::blocking::slots::find_free_slots;
use timeplan_core::{Event, EventStore, ScheduleAnalyzer, SuggestRequest, TimeBlocker};

// 2026-03-02 is a Monday.
fn dt(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn store_with(events: &[Event]) -> EventStore {
    let store = EventStore::open_in_memory().unwrap();
    for event in events {
        store.create_event(event).unwrap();
    }
    store
}

fn week_request(duration: i64, category: &str) -> SuggestRequest {
    SuggestRequest::new(duration, category).with_window(dt(2, 0, 0), dt(8, 23, 0))
}

#[test]
fn empty_calendar_suggests_nine_am_on_every_workday() {
    let store = store_with(&[]);
    let blocks = TimeBlocker::new()
        .suggest_time_blocks(&store, &week_request(60, "meeting").with_max_suggestions(10))
        .unwrap();

    assert_eq!(blocks.len(), 5);
    for block in &blocks {
        assert_eq!(block.start.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(block.end.time(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert!(!matches!(block.start.weekday(), Weekday::Sat | Weekday::Sun));
    }
}

#[test]
fn single_event_day_yields_before_and_after_candidates_only() {
    let store = store_with(&[Event::new("standup", Some(dt(3, 10, 0)), Some(dt(3, 11, 0)))]);
    let request = SuggestRequest::new(60, "meeting")
        .with_window(dt(3, 0, 0), dt(3, 23, 0))
        .with_max_suggestions(10);
    let blocks = TimeBlocker::new().suggest_time_blocks(&store, &request).unwrap();

    let intervals: Vec<_> = blocks.iter().map(|b| (b.start, b.end)).collect();
    assert_eq!(intervals.len(), 2);
    assert!(intervals.contains(&(dt(3, 9, 0), dt(3, 10, 0))));
    assert!(intervals.contains(&(dt(3, 11, 0), dt(3, 12, 0))));
}

#[test]
fn analyzer_reports_the_overlap_intersection() {
    let store = store_with(&[
        Event::new("planning", Some(dt(3, 14, 0)), Some(dt(3, 15, 0))),
        Event::new("interview", Some(dt(3, 14, 30)), Some(dt(3, 15, 30))),
    ]);
    let report = ScheduleAnalyzer::new()
        .analyze(&store, Some(dt(2, 0, 0)), Some(dt(8, 23, 0)))
        .unwrap();

    assert_eq!(report.total_events, 2);
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].overlap_start, dt(3, 14, 30));
    assert_eq!(report.conflicts[0].overlap_end, dt(3, 15, 0));
}

#[test]
fn analyzer_gap_threshold_is_strictly_two_hours() {
    let store = store_with(&[
        Event::new("a", Some(dt(3, 10, 0)), Some(dt(3, 11, 0))),
        Event::new("b", Some(dt(3, 14, 0)), Some(dt(3, 15, 0))),
        Event::new("c", Some(dt(4, 10, 0)), Some(dt(4, 11, 0))),
        Event::new("d", Some(dt(4, 12, 30)), Some(dt(4, 13, 30))),
    ]);
    let report = ScheduleAnalyzer::new()
        .analyze(&store, Some(dt(2, 0, 0)), Some(dt(8, 23, 0)))
        .unwrap();

    // 3h idle on Tuesday is a gap; 1.5h on Wednesday is not.
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].idle_minutes, 180);
    assert_eq!(report.gaps[0].start, dt(3, 11, 0));
}

#[test]
fn analyzer_overload_threshold_is_eight_events() {
    let mut events = Vec::new();
    for i in 0..8u32 {
        events.push(Event::new("busy", Some(dt(3, 8 + i, 0)), Some(dt(3, 8 + i, 30))));
    }
    for i in 0..7u32 {
        events.push(Event::new("ok", Some(dt(4, 8 + i, 0)), Some(dt(4, 8 + i, 30))));
    }
    let store = store_with(&events);
    let report = ScheduleAnalyzer::new()
        .analyze(&store, Some(dt(2, 0, 0)), Some(dt(8, 23, 0)))
        .unwrap();

    assert_eq!(report.overloaded_days.len(), 1);
    assert_eq!(report.overloaded_days[0].date, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    assert_eq!(report.overloaded_days[0].event_count, 8);
}

#[test]
fn preferred_anchor_slot_outranks_unanchored_slot() {
    // Tuesday with events carving out two candidate gaps: one starting at a
    // preferred meeting anchor (10:00), one at a neutral 13:00.
    let store = store_with(&[
        Event::new("early", Some(dt(3, 9, 0)), Some(dt(3, 10, 0))),
        Event::new("midday", Some(dt(3, 11, 0)), Some(dt(3, 13, 0))),
    ]);
    let request = SuggestRequest::new(60, "meeting")
        .with_window(dt(3, 0, 0), dt(3, 23, 0))
        .with_max_suggestions(10);
    let blocks = TimeBlocker::new().suggest_time_blocks(&store, &request).unwrap();

    assert_eq!(blocks[0].start, dt(3, 10, 0));
    assert!(blocks[0].score > blocks[1].score);
}

#[test]
fn suggester_is_deterministic_across_runs() {
    let store = store_with(&[
        Event::new("standup", Some(dt(2, 9, 30)), Some(dt(2, 10, 0))),
        Event::new("team sync", Some(dt(3, 14, 0)), Some(dt(3, 15, 0))),
        Event::new("lunch", Some(dt(4, 12, 0)), Some(dt(4, 13, 0))),
    ]);
    let blocker = TimeBlocker::new();
    let request = week_request(45, "meeting");

    let first = blocker.suggest_time_blocks(&store, &request).unwrap();
    let second = blocker.suggest_time_blocks(&store, &request).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!((a.start, a.end, a.reason.clone()), (b.start, b.end, b.reason.clone()));
        assert_eq!(a.score, b.score);
    }
}

prop_compose! {
    /// A random timed event on a fixed workday.
    fn arb_day_event()(
        start_min in 0i64..1380,
        length in 5i64..240,
    ) -> Event {
        let start = dt(3, 0, 0) + Duration::minutes(start_min);
        Event::new("event", Some(start), Some(start + Duration::minutes(length)))
    }
}

proptest! {
    /// P1/P2: free slots never overlap an event and stay inside the window.
    #[test]
    fn slots_are_disjoint_from_events_and_contained(
        events in prop::collection::vec(arb_day_event(), 0..12),
        duration in 5i64..180,
    ) {
        let work_start = dt(3, 9, 0);
        let work_end = dt(3, 17, 0);
        let slots = find_free_slots(work_start, work_end, &events, Duration::minutes(duration));

        for slot in &slots {
            prop_assert!(slot.start >= work_start);
            prop_assert!(slot.end <= work_end);
            prop_assert_eq!(slot.duration_minutes(), duration);
            for event in &events {
                let (s, e) = event.interval().unwrap();
                prop_assert!(slot.end <= s || slot.start >= e,
                    "slot {:?} overlaps event [{}, {})", slot, s, e);
            }
        }
    }

    /// P3/P6: suggestion scores stay in bounds and never land on weekends.
    #[test]
    fn suggestions_are_bounded_and_weekday_only(
        events in prop::collection::vec(arb_day_event(), 0..10),
        duration in 15i64..120,
    ) {
        let blocker = TimeBlocker::new();
        let blocks = blocker
            .suggest_time_blocks(&events, &week_request(duration, "meeting"))
            .unwrap();

        for block in &blocks {
            prop_assert!((0.0..=100.0).contains(&block.score));
            prop_assert!(!matches!(block.start.weekday(), Weekday::Sat | Weekday::Sun));
            prop_assert!(!block.reason.is_empty());
            prop_assert_eq!(block.duration_minutes(), duration);
        }
    }
}
