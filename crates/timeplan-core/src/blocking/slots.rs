//! Free-slot detection inside a day's working-hours window.
//!
//! Walks the day's events in start order and emits one candidate interval per
//! gap that can hold the requested duration, anchored at the gap's start. The
//! finder never slides a slot through a large gap looking for a better
//! position; later gaps produce their own candidates.

use chrono::{Duration, NaiveDateTime};

use crate::events::Event;

/// A candidate interval of exactly the requested duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FreeSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Find free slots of `duration` inside `[work_start, work_end)`.
///
/// Events missing either timestamp are ignored. Each returned slot lies fully
/// inside the window and is disjoint from every event's `[start, end)`
/// interval. A day with no qualifying events yields a single candidate at
/// `work_start`, regardless of how much larger the window is. A non-positive
/// duration fits nothing.
pub fn find_free_slots(
    work_start: NaiveDateTime,
    work_end: NaiveDateTime,
    day_events: &[Event],
    duration: Duration,
) -> Vec<FreeSlot> {
    if duration <= Duration::zero() {
        return Vec::new();
    }

    let mut timed: Vec<(NaiveDateTime, NaiveDateTime)> =
        day_events.iter().filter_map(|e| e.interval()).collect();
    timed.sort_by_key(|&(start, _)| start);

    let mut slots = Vec::new();
    let mut cursor = work_start;

    for (start, end) in timed {
        if start >= work_end {
            break;
        }
        if end <= cursor {
            continue;
        }
        if start > cursor {
            let gap_end = start.min(work_end);
            if gap_end - cursor >= duration {
                slots.push(FreeSlot {
                    start: cursor,
                    end: cursor + duration,
                });
            }
        }
        cursor = cursor.max(end.min(work_end));
    }

    if work_end - cursor >= duration {
        slots.push(FreeSlot {
            start: cursor,
            end: cursor + duration,
        });
    }

    slots
}
