//! Calendar event commands for the CLI.

use clap::Subcommand;
use timeplan_core::{Event, EventStore};

use super::parse_datetime;

#[derive(Subcommand)]
pub enum EventAction {
    /// Add a new event
    Add {
        /// Event title
        title: String,
        /// Start, e.g. 2026-03-02T10:00
        #[arg(long)]
        start: Option<String>,
        /// End, e.g. 2026-03-02T11:00
        #[arg(long)]
        end: Option<String>,
        /// Duration in minutes, used instead of --end
        #[arg(long, conflicts_with = "end")]
        duration: Option<i64>,
        /// Event description
        #[arg(long)]
        description: Option<String>,
        /// Event location
        #[arg(long)]
        location: Option<String>,
        /// Mark as an all-day event
        #[arg(long)]
        all_day: bool,
    },
    /// List events, optionally within a window
    List {
        /// Window start
        #[arg(long)]
        from: Option<String>,
        /// Window end
        #[arg(long)]
        to: Option<String>,
    },
    /// Show one event as JSON
    Show {
        /// Event id
        id: String,
    },
    /// Remove an event
    Remove {
        /// Event id
        id: String,
    },
    /// Search events by title, description, or location
    Search {
        /// Substring to search for
        query: String,
    },
    /// Move an event to a new start, keeping its duration unless --end is given
    Reschedule {
        /// Event id
        id: String,
        /// New start
        start: String,
        /// Explicit new end
        #[arg(long)]
        end: Option<String>,
    },
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = EventStore::open()?;
    match action {
        EventAction::Add {
            title,
            start,
            end,
            duration,
            description,
            location,
            all_day,
        } => {
            let start = start.as_deref().map(parse_datetime).transpose()?;
            let end = match (end, duration, start) {
                (Some(end), _, _) => Some(parse_datetime(&end)?),
                (None, Some(minutes), Some(start)) => {
                    Some(start + chrono::Duration::minutes(minutes))
                }
                _ => None,
            };

            let mut event = Event::new(title, start, end);
            if let Some(description) = description {
                event.description = description;
            }
            event.location = location;
            event.all_day = all_day;
            store.create_event(&event)?;
            println!("event created: {}", event.id);
        }
        EventAction::List { from, to } => {
            let from = from.as_deref().map(parse_datetime).transpose()?;
            let to = to.as_deref().map(parse_datetime).transpose()?;
            let events = store.events_in_window(from, to)?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        EventAction::Show { id } => match store.get_event(&id)? {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => return Err(format!("no event with id {id}").into()),
        },
        EventAction::Remove { id } => {
            if store.delete_event(&id)? {
                println!("event removed: {id}");
            } else {
                return Err(format!("no event with id {id}").into());
            }
        }
        EventAction::Search { query } => {
            let events = store.search_events(&query)?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
        EventAction::Reschedule { id, start, end } => {
            let start = parse_datetime(&start)?;
            let end = end.as_deref().map(parse_datetime).transpose()?;
            if store.reschedule_event(&id, start, end)? {
                println!("event rescheduled: {id}");
            } else {
                return Err(format!("no event with id {id}").into());
            }
        }
    }
    Ok(())
}
