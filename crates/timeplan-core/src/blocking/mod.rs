//! Time-blocking engine.
//!
//! Suggests ranked time blocks for a new event: fetch the window's events
//! once, walk each workday, find free slots inside the working hours, score
//! them against the category profile, and return the best candidates.

pub mod profile;
pub mod scoring;
pub mod slots;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::{Event, EventSource};
pub use profile::{CategoryProfile, ProfileTable};
pub use slots::{find_free_slots, FreeSlot};

/// A suggested time block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Desirability in [0, 100], higher is better.
    pub score: f64,
    /// Human-readable justification derived from the scoring signals.
    pub reason: String,
}

impl TimeBlock {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A request for time-block suggestions.
#[derive(Debug, Clone)]
pub struct SuggestRequest {
    pub duration_minutes: i64,
    pub category: String,
    /// Window start; defaults to now.
    pub window_start: Option<NaiveDateTime>,
    /// Window end; defaults to window start plus the configured lookahead.
    pub window_end: Option<NaiveDateTime>,
    /// Overrides the configured maximum number of suggestions.
    pub max_suggestions: Option<usize>,
}

impl SuggestRequest {
    pub fn new(duration_minutes: i64, category: impl Into<String>) -> Self {
        Self {
            duration_minutes,
            category: category.into(),
            window_start: None,
            window_end: None,
            max_suggestions: None,
        }
    }

    pub fn with_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.window_start = Some(start);
        self.window_end = Some(end);
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = Some(max);
        self
    }
}

/// Time blocker configuration.
#[derive(Debug, Clone)]
pub struct BlockerConfig {
    /// Start of the working-hours window.
    pub work_start: NaiveTime,
    /// End of the working-hours window.
    pub work_end: NaiveTime,
    /// Default lookahead when a request has no explicit window (days).
    pub lookahead_days: i64,
    /// Default cap on returned suggestions.
    pub max_suggestions: usize,
    /// Category preference table.
    pub profiles: ProfileTable,
}

impl Default for BlockerConfig {
    fn default() -> Self {
        Self {
            work_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            lookahead_days: 7,
            max_suggestions: 5,
            profiles: ProfileTable::default(),
        }
    }
}

/// Time-block suggestion engine.
pub struct TimeBlocker {
    config: BlockerConfig,
}

impl TimeBlocker {
    /// Create a blocker with default config.
    pub fn new() -> Self {
        Self {
            config: BlockerConfig::default(),
        }
    }

    /// Create with custom config.
    pub fn with_config(config: BlockerConfig) -> Self {
        Self { config }
    }

    /// Suggest time blocks for a new event.
    ///
    /// Weekends produce no suggestions. An empty window or a duration that
    /// fits no gap anywhere yields an empty list, never an error. Results
    /// are sorted by score descending; ties keep generation order.
    pub fn suggest_time_blocks(
        &self,
        source: &impl EventSource,
        request: &SuggestRequest,
    ) -> Result<Vec<TimeBlock>> {
        let window_start = request
            .window_start
            .unwrap_or_else(|| chrono::Local::now().naive_local());
        let window_end = request
            .window_end
            .unwrap_or(window_start + Duration::days(self.config.lookahead_days));
        if window_end < window_start {
            return Ok(Vec::new());
        }

        // One fetch per invocation: the finder and scorer share a snapshot.
        let events = source.events_between(Some(window_start), Some(window_end))?;
        let profile = self.config.profiles.get(&request.category);
        let duration = Duration::minutes(request.duration_minutes);

        let mut blocks = Vec::new();
        let mut date = window_start.date();
        let last = window_end.date();

        while date <= last {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let day_events: Vec<Event> = events
                    .iter()
                    .filter(|e| e.start_date() == Some(date))
                    .cloned()
                    .collect();

                let work_start = date.and_time(self.config.work_start);
                let work_end = date.and_time(self.config.work_end);

                for slot in find_free_slots(work_start, work_end, &day_events, duration) {
                    let score = scoring::score_slot(
                        slot.start,
                        slot.end,
                        &request.category,
                        &profile,
                        &day_events,
                    );
                    let reason =
                        scoring::describe_slot(slot.start, slot.end, &profile, &day_events);
                    blocks.push(TimeBlock {
                        start: slot.start,
                        end: slot.end,
                        score,
                        reason,
                    });
                }
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        // Stable sort: equal scores keep their generation order.
        blocks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        blocks.truncate(request.max_suggestions.unwrap_or(self.config.max_suggestions));
        Ok(blocks)
    }
}

impl Default for TimeBlocker {
    fn default() -> Self {
        Self::new()
    }
}
