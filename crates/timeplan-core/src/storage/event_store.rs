//! SQLite-backed calendar event store.
//!
//! Persists events keyed by id and serves the date-range queries the
//! scheduling engine consumes through [`EventSource`]. Timestamps are stored
//! as ISO-8601 text in the local frame, so lexicographic comparison in SQL
//! matches chronological order.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::data_dir;
use crate::error::{CoreError, DatabaseError, Result};
use crate::events::{Event, EventSource};

const DT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn fmt_dt(dt: NaiveDateTime) -> String {
    dt.format(DT_FORMAT).to_string()
}

fn parse_dt(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DT_FORMAT).ok()
}

/// Parse a stored timestamp with fallback to the current time.
fn parse_dt_fallback(s: &str) -> NaiveDateTime {
    parse_dt(s).unwrap_or_else(|| chrono::Local::now().naive_local())
}

fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<Event> {
    let start: Option<String> = row.get(3)?;
    let end: Option<String> = row.get(4)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        start: start.as_deref().and_then(parse_dt),
        end: end.as_deref().and_then(parse_dt),
        all_day: row.get(5)?,
        location: row.get(6)?,
        created_at: parse_dt_fallback(&created_at),
        updated_at: parse_dt_fallback(&updated_at),
    })
}

const EVENT_COLUMNS: &str =
    "id, title, description, start_time, end_time, all_day, location, created_at, updated_at";

/// SQLite database for calendar events.
pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    /// Open the store at `~/.config/timeplan/timeplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("timeplan.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (tests and throwaway sessions).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS events (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                start_time  TEXT,
                end_time    TEXT,
                all_day     INTEGER NOT NULL DEFAULT 0,
                location    TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_start_time ON events(start_time);",
        )?;
        Ok(())
    }

    /// Insert a new event.
    pub fn create_event(&self, event: &Event) -> Result<()> {
        self.conn.execute(
            &format!("INSERT INTO events ({EVENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
            params![
                event.id,
                event.title,
                event.description,
                event.start.map(fmt_dt),
                event.end.map(fmt_dt),
                event.all_day,
                event.location,
                fmt_dt(event.created_at),
                fmt_dt(event.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Fetch a single event by id.
    pub fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let event = self
            .conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                params![id],
                row_to_event,
            )
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(event)
    }

    /// Rewrite an existing event, bumping its `updated_at`.
    ///
    /// Returns false when no event with that id exists.
    pub fn update_event(&self, event: &mut Event) -> Result<bool> {
        event.updated_at = chrono::Local::now().naive_local();
        let changed = self.conn.execute(
            "UPDATE events SET title = ?2, description = ?3, start_time = ?4, end_time = ?5,
                 all_day = ?6, location = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                event.id,
                event.title,
                event.description,
                event.start.map(fmt_dt),
                event.end.map(fmt_dt),
                event.all_day,
                event.location,
                fmt_dt(event.updated_at),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete an event. Returns false when no event with that id exists.
    pub fn delete_event(&self, id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Move an event to a new start. When `new_end` is omitted the previous
    /// duration is preserved. Returns false when the event does not exist.
    pub fn reschedule_event(
        &self,
        id: &str,
        new_start: NaiveDateTime,
        new_end: Option<NaiveDateTime>,
    ) -> Result<bool> {
        let Some(mut event) = self.get_event(id)? else {
            return Ok(false);
        };

        let end = new_end.or_else(|| {
            event
                .duration_minutes()
                .map(|minutes| new_start + Duration::minutes(minutes))
        });

        event.start = Some(new_start);
        event.end = end;
        self.update_event(&mut event)
    }

    /// Events for one calendar date.
    pub fn events_for_date(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let start = date.and_hms_opt(0, 0, 0);
        let end = start.map(|s| s + Duration::days(1));
        self.events_in_window(start, end)
    }

    /// Search events by title, description, or location substring.
    pub fn search_events(&self, query: &str) -> Result<Vec<Event>> {
        let pattern = format!("%{query}%");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE title LIKE ?1 OR description LIKE ?1 OR location LIKE ?1
             ORDER BY start_time IS NULL, start_time"
        ))?;
        let events = stmt
            .query_map(params![pattern], row_to_event)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DatabaseError::from)?;
        Ok(events)
    }

    /// Events intersecting the window, ordered by start ascending with null
    /// starts last. Open bounds widen the window on that side.
    pub fn events_in_window(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Event>> {
        let (condition, bounds): (&str, Vec<Option<String>>) = match (start, end) {
            (Some(ws), Some(we)) => (
                "WHERE (start_time >= ?1 AND start_time <= ?2)
                    OR (end_time >= ?1 AND end_time <= ?2)
                    OR (start_time <= ?1 AND end_time >= ?2)",
                vec![Some(fmt_dt(ws)), Some(fmt_dt(we))],
            ),
            (Some(ws), None) => (
                "WHERE start_time >= ?1 OR end_time >= ?1",
                vec![Some(fmt_dt(ws))],
            ),
            (None, Some(we)) => ("WHERE start_time <= ?1", vec![Some(fmt_dt(we))]),
            (None, None) => ("", Vec::new()),
        };

        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events {condition}
             ORDER BY start_time IS NULL, start_time"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::ToSql> =
            bounds.iter().map(|b| b as &dyn rusqlite::ToSql).collect();
        let events = stmt
            .query_map(params.as_slice(), row_to_event)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(DatabaseError::from)?;
        Ok(events)
    }
}

impl EventSource for EventStore {
    fn events_between(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Event>, CoreError> {
        self.events_in_window(start, end)
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

    #[test]
    fn create_get_roundtrip() {
        let store = EventStore::open_in_memory().unwrap();
        let mut event = Event::new("standup", Some(dt(2, 9, 30)), Some(dt(2, 9, 45)));
        event.description = "daily".to_string();
        event.location = Some("room 4".to_string());
        store.create_event(&event).unwrap();

        let got = store.get_event(&event.id).unwrap().expect("stored event");
        assert_eq!(got.title, "standup");
        assert_eq!(got.description, "daily");
        assert_eq!(got.start, Some(dt(2, 9, 30)));
        assert_eq!(got.end, Some(dt(2, 9, 45)));
        assert_eq!(got.location.as_deref(), Some("room 4"));
        assert!(!got.all_day);
    }

    #[test]
    fn missing_event_is_none_and_delete_reports_it() {
        let store = EventStore::open_in_memory().unwrap();
        assert!(store.get_event("nope").unwrap().is_none());
        assert!(!store.delete_event("nope").unwrap());
    }

    #[test]
    fn update_rewrites_fields() {
        let store = EventStore::open_in_memory().unwrap();
        let mut event = Event::new("call", Some(dt(2, 10, 0)), Some(dt(2, 10, 30)));
        store.create_event(&event).unwrap();

        event.title = "phone call".to_string();
        event.end = Some(dt(2, 11, 0));
        assert!(store.update_event(&mut event).unwrap());

        let got = store.get_event(&event.id).unwrap().unwrap();
        assert_eq!(got.title, "phone call");
        assert_eq!(got.end, Some(dt(2, 11, 0)));
    }

    #[test]
    fn window_query_orders_by_start_and_keeps_null_starts_last() {
        let store = EventStore::open_in_memory().unwrap();
        store
            .create_event(&Event::new("later", Some(dt(3, 10, 0)), Some(dt(3, 11, 0))))
            .unwrap();
        store
            .create_event(&Event::new("earlier", Some(dt(2, 10, 0)), Some(dt(2, 11, 0))))
            .unwrap();
        store.create_event(&Event::new("floating", None, None)).unwrap();

        let events = store.events_in_window(None, None).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].title, "earlier");
        assert_eq!(events[1].title, "later");
        assert_eq!(events[2].title, "floating");
    }

    #[test]
    fn window_query_filters_outside_events() {
        let store = EventStore::open_in_memory().unwrap();
        store
            .create_event(&Event::new("inside", Some(dt(3, 10, 0)), Some(dt(3, 11, 0))))
            .unwrap();
        store
            .create_event(&Event::new("outside", Some(dt(9, 10, 0)), Some(dt(9, 11, 0))))
            .unwrap();
        // Straddles the window end.
        store
            .create_event(&Event::new("straddling", Some(dt(4, 23, 0)), Some(dt(5, 1, 0))))
            .unwrap();

        let events = store
            .events_in_window(Some(dt(2, 0, 0)), Some(dt(5, 0, 0)))
            .unwrap();
        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["inside", "straddling"]);
    }

    #[test]
    fn events_for_date_excludes_neighbors() {
        let store = EventStore::open_in_memory().unwrap();
        store
            .create_event(&Event::new("today", Some(dt(3, 10, 0)), Some(dt(3, 11, 0))))
            .unwrap();
        store
            .create_event(&Event::new("tomorrow", Some(dt(4, 10, 0)), Some(dt(4, 11, 0))))
            .unwrap();

        let events = store
            .events_for_date(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap())
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "today");
    }

    #[test]
    fn search_matches_title_description_and_location() {
        let store = EventStore::open_in_memory().unwrap();
        let mut a = Event::new("team sync", Some(dt(2, 10, 0)), Some(dt(2, 11, 0)));
        a.description = "weekly planning".to_string();
        let mut b = Event::new("dentist", Some(dt(3, 10, 0)), Some(dt(3, 11, 0)));
        b.location = Some("clinic".to_string());
        store.create_event(&a).unwrap();
        store.create_event(&b).unwrap();

        assert_eq!(store.search_events("sync").unwrap().len(), 1);
        assert_eq!(store.search_events("planning").unwrap().len(), 1);
        assert_eq!(store.search_events("clinic").unwrap().len(), 1);
        assert!(store.search_events("piano").unwrap().is_empty());
    }

    #[test]
    fn open_at_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");
        let event = Event::new("persisted", Some(dt(2, 10, 0)), Some(dt(2, 11, 0)));
        {
            let store = EventStore::open_at(&path).unwrap();
            store.create_event(&event).unwrap();
        }
        let store = EventStore::open_at(&path).unwrap();
        let got = store.get_event(&event.id).unwrap().expect("survives reopen");
        assert_eq!(got.title, "persisted");
    }

    #[test]
    fn reschedule_preserves_duration_when_end_is_omitted() {
        let store = EventStore::open_in_memory().unwrap();
        let event = Event::new("review", Some(dt(2, 10, 0)), Some(dt(2, 11, 30)));
        store.create_event(&event).unwrap();

        assert!(store.reschedule_event(&event.id, dt(3, 14, 0), None).unwrap());
        let got = store.get_event(&event.id).unwrap().unwrap();
        assert_eq!(got.start, Some(dt(3, 14, 0)));
        assert_eq!(got.end, Some(dt(3, 15, 30)));
    }
}
