//! Slot scoring heuristics.
//!
//! Each signal is a small free function; [`score_slot`] combines them in a
//! fixed order and clamps the result to [0, 100]. [`describe_slot`] renders
//! the same signals as a human-readable reason, so score and reason always
//! agree for a given input.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};

use crate::blocking::profile::CategoryProfile;
use crate::events::Event;

/// Minutes past midnight of a timestamp.
fn minute_of_day(dt: NaiveDateTime) -> f64 {
    (dt.hour() * 60 + dt.minute()) as f64
}

/// Preferred-time bonus (up to +20 per anchor).
///
/// Each anchor within 30 minutes of the slot start contributes
/// `20 * (1 - minutes_off / 30)`; multiple anchors stack.
pub fn preferred_time_bonus(slot_start: NaiveDateTime, profile: &CategoryProfile) -> f64 {
    let start = minute_of_day(slot_start);
    let mut bonus = 0.0;
    for &(hour, minute) in &profile.preferred_times {
        let off = (start - (hour * 60 + minute) as f64).abs();
        if off <= 30.0 {
            bonus += 20.0 * (1.0 - off / 30.0);
        }
    }
    bonus
}

/// Avoided-time penalty (up to 15 per anchor, returned positive).
///
/// Each anchor within 60 minutes contributes `15 * (1 - minutes_off / 60)`.
pub fn avoided_time_penalty(slot_start: NaiveDateTime, profile: &CategoryProfile) -> f64 {
    let start = minute_of_day(slot_start);
    let mut penalty = 0.0;
    for &(hour, minute) in &profile.avoided_times {
        let off = (start - (hour * 60 + minute) as f64).abs();
        if off <= 60.0 {
            penalty += 15.0 * (1.0 - off / 60.0);
        }
    }
    penalty
}

/// Minutes between the nearest event ending at or before `slot_start` and the
/// slot. Defaults to 60 when no event precedes the slot.
pub fn buffer_before_minutes(slot_start: NaiveDateTime, day_events: &[Event]) -> i64 {
    day_events
        .iter()
        .filter_map(|e| e.interval())
        .map(|(_, end)| end)
        .filter(|&end| end <= slot_start)
        .max()
        .map(|end| (slot_start - end).num_minutes())
        .unwrap_or(60)
}

/// Minutes between the slot and the nearest event starting at or after
/// `slot_end`. Defaults to 60 when no event follows the slot.
pub fn buffer_after_minutes(slot_end: NaiveDateTime, day_events: &[Event]) -> i64 {
    day_events
        .iter()
        .filter_map(|e| e.interval())
        .map(|(start, _)| start)
        .filter(|&start| start >= slot_end)
        .min()
        .map(|start| (start - slot_end).num_minutes())
        .unwrap_or(60)
}

/// Buffer bonus (+10 per side with at least 15 minutes of breathing room).
pub fn buffer_bonus(
    slot_start: NaiveDateTime,
    slot_end: NaiveDateTime,
    day_events: &[Event],
) -> f64 {
    let mut bonus = 0.0;
    if buffer_before_minutes(slot_start, day_events) >= 15 {
        bonus += 10.0;
    }
    if buffer_after_minutes(slot_end, day_events) >= 15 {
        bonus += 10.0;
    }
    bonus
}

/// Weekday adjustment: Monday +5, Friday -5, weekend -20.
pub fn weekday_adjustment(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Mon => 5.0,
        Weekday::Fri => -5.0,
        Weekday::Sat | Weekday::Sun => -20.0,
        _ => 0.0,
    }
}

/// Time-of-day adjustment (mutually exclusive branches):
/// - hour 9-11 and category focus/meeting: +15
/// - hour 14-16 and category meeting/call: +10
/// - hour 17 or later: -20
pub fn time_of_day_adjustment(hour: u32, category: &str) -> f64 {
    if (9..=11).contains(&hour) {
        if matches!(category, "focus" | "meeting") {
            15.0
        } else {
            0.0
        }
    } else if (14..=16).contains(&hour) {
        if matches!(category, "meeting" | "call") {
            10.0
        } else {
            0.0
        }
    } else if hour >= 17 {
        -20.0
    } else {
        0.0
    }
}

/// Lunch penalty (25, returned positive): hour 12-13 for anything but lunch.
pub fn lunch_penalty(hour: u32, category: &str) -> f64 {
    if (12..=13).contains(&hour) && category != "lunch" {
        25.0
    } else {
        0.0
    }
}

/// Count same-day events whose start lies within a 2-hour window around the
/// slot (inclusive) and whose title matches a category keyword.
pub fn nearby_similar_events(
    slot_start: NaiveDateTime,
    slot_end: NaiveDateTime,
    profile: &CategoryProfile,
    day_events: &[Event],
) -> usize {
    let window_start = slot_start - Duration::hours(2);
    let window_end = slot_end + Duration::hours(2);

    day_events
        .iter()
        .filter(|e| {
            e.start
                .map(|start| window_start <= start && start <= window_end)
                .unwrap_or(false)
        })
        .filter(|e| profile.matches_title(&e.title))
        .count()
}

/// Score a candidate slot for a category, in [0, 100].
///
/// Signals are applied in order: base 50, preferred/avoided anchors, buffer
/// bonus, weekday, time of day, lunch penalty, clustering (+5 per similar
/// nearby event), then clamped.
pub fn score_slot(
    slot_start: NaiveDateTime,
    slot_end: NaiveDateTime,
    category: &str,
    profile: &CategoryProfile,
    day_events: &[Event],
) -> f64 {
    let mut score = 50.0;

    score += preferred_time_bonus(slot_start, profile);
    score -= avoided_time_penalty(slot_start, profile);
    score += buffer_bonus(slot_start, slot_end, day_events);
    score += weekday_adjustment(slot_start.weekday());
    score += time_of_day_adjustment(slot_start.hour(), category);
    score -= lunch_penalty(slot_start.hour(), category);
    score += 5.0 * nearby_similar_events(slot_start, slot_end, profile, day_events) as f64;

    score.max(0.0).min(100.0)
}

/// Render the scoring signals as a human-readable reason.
///
/// Always non-empty; a slot with no notable signals reads
/// "<Weekday> - available time slot".
pub fn describe_slot(
    slot_start: NaiveDateTime,
    slot_end: NaiveDateTime,
    profile: &CategoryProfile,
    day_events: &[Event],
) -> String {
    let mut reasons: Vec<String> = Vec::new();

    let hour = slot_start.hour();
    if (9..=11).contains(&hour) {
        reasons.push("optimal morning focus time".to_string());
    } else if (14..=16).contains(&hour) {
        reasons.push("productive afternoon slot".to_string());
    } else if hour == 12 {
        reasons.push("lunch time".to_string());
    } else if hour >= 17 {
        reasons.push("after-hours slot".to_string());
    }

    let before = buffer_before_minutes(slot_start, day_events);
    let after = buffer_after_minutes(slot_end, day_events);
    if before >= 30 && after >= 30 {
        reasons.push("well-spaced with buffer time".to_string());
    } else if before >= 15 || after >= 15 {
        reasons.push("has buffer time".to_string());
    }

    let similar = nearby_similar_events(slot_start, slot_end, profile, day_events);
    if similar > 0 {
        reasons.push(format!("groups with {similar} similar events"));
    }

    match slot_start.weekday() {
        Weekday::Mon => reasons.push("fresh start of week".to_string()),
        Weekday::Fri => reasons.push("end of week wrap-up".to_string()),
        _ => {}
    }

    if reasons.is_empty() {
        reasons.push("available time slot".to_string());
    }

    format!("{} - {}", slot_start.format("%A"), reasons.join(", "))
}
