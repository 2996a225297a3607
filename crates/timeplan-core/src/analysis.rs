//! Schedule analysis: conflicts, idle gaps, and overloaded days.
//!
//! Scans a window of events once and reports pairwise overlaps, large
//! same-day gaps, days with excessive event density, and qualitative
//! optimization hints. Analysis is total: malformed events are skipped,
//! never rejected.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::events::{Event, EventSource};

/// Two events whose intervals strictly overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub first_id: String,
    pub first_title: String,
    pub second_id: String,
    pub second_title: String,
    pub overlap_start: NaiveDateTime,
    pub overlap_end: NaiveDateTime,
}

/// Idle time between two same-day, time-ordered events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub after_event: String,
    pub before_event: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub idle_minutes: i64,
}

/// A date with an event count at or above the overload threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overload {
    pub date: NaiveDate,
    pub event_count: usize,
}

/// Full analysis report for a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub total_events: usize,
    pub conflicts: Vec<Conflict>,
    pub gaps: Vec<Gap>,
    pub overloaded_days: Vec<Overload>,
    pub suggestions: Vec<String>,
}

/// Analyzer configuration.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Minimum idle time between same-day events to report as a gap (minutes).
    pub gap_threshold_minutes: i64,
    /// Minimum events per day to report as overloaded.
    pub overload_threshold: usize,
    /// Default lookahead when no explicit window is given (days).
    pub lookahead_days: i64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            gap_threshold_minutes: 120,
            overload_threshold: 8,
            lookahead_days: 7,
        }
    }
}

/// Schedule conflict and density analyzer.
pub struct ScheduleAnalyzer {
    config: AnalyzerConfig,
}

impl ScheduleAnalyzer {
    /// Create an analyzer with default config.
    pub fn new() -> Self {
        Self {
            config: AnalyzerConfig::default(),
        }
    }

    /// Create with custom config.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyze the window (default now .. now + lookahead) for conflicts,
    /// gaps, and overloaded days.
    pub fn analyze(
        &self,
        source: &impl EventSource,
        window_start: Option<NaiveDateTime>,
        window_end: Option<NaiveDateTime>,
    ) -> Result<ScheduleReport> {
        let start = window_start.unwrap_or_else(|| chrono::Local::now().naive_local());
        let end = window_end.unwrap_or(start + Duration::days(self.config.lookahead_days));

        let events = source.events_between(Some(start), Some(end))?;

        let conflicts = self.find_conflicts(&events);
        let gaps = self.find_gaps(&events);
        let overloaded_days = self.find_overloads(&events);

        let mut suggestions = Vec::new();
        if !conflicts.is_empty() {
            suggestions.push(
                "Consider rescheduling conflicting events for better time management".to_string(),
            );
        }
        if !gaps.is_empty() {
            suggestions.push(
                "Large gaps in schedule could be used for focused work or meetings".to_string(),
            );
        }
        if !overloaded_days.is_empty() {
            suggestions
                .push("Some days are overloaded - consider redistributing events".to_string());
        }

        Ok(ScheduleReport {
            total_events: events.len(),
            conflicts,
            gaps,
            overloaded_days,
            suggestions,
        })
    }

    /// Pairwise overlap scan. O(n^2) over the windowed events; the window is
    /// bounded, so a sweep-line would buy nothing here.
    fn find_conflicts(&self, events: &[Event]) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for (i, first) in events.iter().enumerate() {
            for second in &events[i + 1..] {
                if !first.overlaps(second) {
                    continue;
                }
                // Both intervals exist when overlaps() holds.
                let (Some((s1, e1)), Some((s2, e2))) = (first.interval(), second.interval())
                else {
                    continue;
                };
                conflicts.push(Conflict {
                    first_id: first.id.clone(),
                    first_title: first.title.clone(),
                    second_id: second.id.clone(),
                    second_title: second.title.clone(),
                    overlap_start: s1.max(s2),
                    overlap_end: e1.min(e2),
                });
            }
        }
        conflicts
    }

    /// Idle gaps between start-ordered adjacent events on the same calendar
    /// date. Pairs spanning midnight are not checked.
    fn find_gaps(&self, events: &[Event]) -> Vec<Gap> {
        let mut timed: Vec<(&Event, NaiveDateTime, NaiveDateTime)> = events
            .iter()
            .filter_map(|e| e.interval().map(|(start, end)| (e, start, end)))
            .collect();
        timed.sort_by_key(|&(_, start, _)| start);

        let mut gaps = Vec::new();
        for pair in timed.windows(2) {
            let (current, _, current_end) = pair[0];
            let (next, next_start, _) = pair[1];
            if current_end.date() != next_start.date() {
                continue;
            }
            let idle = next_start - current_end;
            if idle > Duration::minutes(self.config.gap_threshold_minutes) {
                gaps.push(Gap {
                    after_event: current.title.clone(),
                    before_event: next.title.clone(),
                    start: current_end,
                    end: next_start,
                    idle_minutes: idle.num_minutes(),
                });
            }
        }
        gaps
    }

    /// Days whose event count reaches the overload threshold. Events without
    /// a start are excluded.
    fn find_overloads(&self, events: &[Event]) -> Vec<Overload> {
        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for event in events {
            if let Some(date) = event.start_date() {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .filter(|&(_, count)| count >= self.config.overload_threshold)
            .map(|(date, event_count)| Overload { date, event_count })
            .collect()
    }
}

impl Default for ScheduleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn event(title: &str, start: NaiveDateTime, end: NaiveDateTime) -> Event {
        Event::new(title, Some(start), Some(end))
    }

    fn analyze(events: Vec<Event>) -> ScheduleReport {
        ScheduleAnalyzer::new()
            .analyze(&events, Some(dt(2, 0, 0)), Some(dt(8, 23, 0)))
            .unwrap()
    }

    #[test]
    fn overlapping_events_report_one_conflict_with_intersection() {
        let report = analyze(vec![
            event("planning", dt(2, 14, 0), dt(2, 15, 0)),
            event("interview", dt(2, 14, 30), dt(2, 15, 30)),
        ]);

        assert_eq!(report.conflicts.len(), 1);
        let conflict = &report.conflicts[0];
        assert_eq!(conflict.overlap_start, dt(2, 14, 30));
        assert_eq!(conflict.overlap_end, dt(2, 15, 0));
        assert_eq!(report.suggestions.len(), 1);
    }

    #[test]
    fn touching_events_do_not_conflict() {
        let report = analyze(vec![
            event("a", dt(2, 14, 0), dt(2, 15, 0)),
            event("b", dt(2, 15, 0), dt(2, 16, 0)),
        ]);
        assert!(report.conflicts.is_empty());
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn three_hour_gap_is_reported() {
        let report = analyze(vec![
            event("morning", dt(2, 10, 0), dt(2, 11, 0)),
            event("afternoon", dt(2, 14, 0), dt(2, 15, 0)),
        ]);

        assert_eq!(report.gaps.len(), 1);
        let gap = &report.gaps[0];
        assert_eq!(gap.after_event, "morning");
        assert_eq!(gap.before_event, "afternoon");
        assert_eq!(gap.idle_minutes, 180);
    }

    #[test]
    fn gaps_at_or_below_threshold_are_not_reported() {
        // 1.5h idle.
        let report = analyze(vec![
            event("a", dt(2, 10, 0), dt(2, 11, 0)),
            event("b", dt(2, 12, 30), dt(2, 13, 30)),
        ]);
        assert!(report.gaps.is_empty());

        // Exactly 2h idle: threshold is strict.
        let report = analyze(vec![
            event("a", dt(2, 10, 0), dt(2, 11, 0)),
            event("b", dt(2, 13, 0), dt(2, 14, 0)),
        ]);
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn gaps_spanning_midnight_are_not_checked() {
        let report = analyze(vec![
            event("evening", dt(2, 20, 0), dt(2, 21, 0)),
            event("morning", dt(3, 9, 0), dt(3, 10, 0)),
        ]);
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn eight_events_on_a_date_is_an_overload_seven_is_not() {
        let mut events = Vec::new();
        for i in 0..8 {
            events.push(event("busy", dt(2, 8 + i, 0), dt(2, 8 + i, 30)));
        }
        for i in 0..7 {
            events.push(event("lighter", dt(3, 8 + i, 0), dt(3, 8 + i, 30)));
        }

        let report = analyze(events);
        assert_eq!(report.overloaded_days.len(), 1);
        assert_eq!(report.overloaded_days[0].date, dt(2, 0, 0).date());
        assert_eq!(report.overloaded_days[0].event_count, 8);
    }

    #[test]
    fn untimed_events_count_toward_totals_only() {
        let report = analyze(vec![
            Event::new("someday", None, None),
            event("real", dt(2, 10, 0), dt(2, 11, 0)),
        ]);
        assert_eq!(report.total_events, 2);
        assert!(report.conflicts.is_empty());
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn empty_window_reports_nothing() {
        let report = analyze(Vec::new());
        assert_eq!(report.total_events, 0);
        assert!(report.conflicts.is_empty());
        assert!(report.gaps.is_empty());
        assert!(report.overloaded_days.is_empty());
        assert!(report.suggestions.is_empty());
    }
}
