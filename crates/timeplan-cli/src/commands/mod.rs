pub mod analyze;
pub mod config;
pub mod event;
pub mod suggest;

use chrono::{NaiveDate, NaiveDateTime};

/// Parse a CLI datetime argument.
///
/// Accepts `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM`, or a bare `YYYY-MM-DD`
/// (interpreted as midnight).
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(format!("cannot parse '{s}' as a date or datetime").into())
}
