//! Calendar event model and the event-source seam.
//!
//! All timestamps are timezone-naive local times. The engine never converts
//! between zones; whatever frame the caller stores is the frame it gets back.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A calendar event.
///
/// `start` and `end` are optional: an event without a start is kept for
/// display purposes but excluded from all slot and conflict computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub location: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Event {
    /// Create a new event with a generated id and current timestamps.
    pub fn new(
        title: impl Into<String>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            start,
            end,
            all_day: false,
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The `[start, end)` interval, if both endpoints are set.
    pub fn interval(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Duration in minutes, if both endpoints are set.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.interval().map(|(start, end)| (end - start).num_minutes())
    }

    /// Calendar date of the event's start, if set.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.map(|dt| dt.date())
    }

    /// Strict interval overlap with another event.
    ///
    /// Events touching at an endpoint do not overlap; events missing either
    /// timestamp never overlap anything.
    pub fn overlaps(&self, other: &Event) -> bool {
        match (self.interval(), other.interval()) {
            (Some((s1, e1)), Some((s2, e2))) => s1 < e2 && s2 < e1,
            _ => false,
        }
    }
}

/// Source of events for the scheduling engine.
///
/// The suggester and the analyzer fetch once per invocation and work on the
/// returned snapshot, so a source backed by mutable storage stays consistent
/// across their internal passes.
pub trait EventSource {
    /// Events intersecting the window, ordered by start ascending.
    ///
    /// `None` bounds are open-ended. Events without a start sort last; the
    /// engine filters to events with both endpoints before interval math.
    fn events_between(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Event>>;
}

/// In-memory snapshot source, used by tests and embedders that already hold
/// the events.
impl EventSource for Vec<Event> {
    fn events_between(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .iter()
            .filter(|e| intersects_window(e, start, end))
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.start.is_none(), e.start));
        Ok(events)
    }
}

fn intersects_window(
    event: &Event,
    window_start: Option<NaiveDateTime>,
    window_end: Option<NaiveDateTime>,
) -> bool {
    let effective_end = event.end.or(event.start);
    if let (Some(ws), Some(end)) = (window_start, effective_end) {
        if end < ws {
            return false;
        }
    }
    if let (Some(we), Some(start)) = (window_end, event.start) {
        if start > we {
            return false;
        }
    }
    true
}
