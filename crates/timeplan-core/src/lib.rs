//! # Timeplan Core Library
//!
//! Core business logic for the Timeplan calendar planner. All operations are
//! available via a standalone CLI binary; any GUI is expected to be a thin
//! layer over this same library.
//!
//! ## Architecture
//!
//! - **Event store**: SQLite-backed calendar event CRUD and range queries
//! - **Time blocking**: free-slot detection, heuristic slot scoring, and
//!   ranked suggestions for a requested duration and category
//! - **Analysis**: conflict, gap, and overload scanning over a date window
//! - **Config**: TOML-based working hours, thresholds, and category profiles
//!
//! The scheduling engine is purely computational and synchronous: it fetches
//! one snapshot of events per invocation through [`EventSource`] and computes
//! deterministically from it.
//!
//! ## Key Components
//!
//! - [`TimeBlocker`]: ranked time-block suggestions
//! - [`ScheduleAnalyzer`]: conflict/gap/overload reports
//! - [`EventStore`]: event persistence
//! - [`Config`]: application configuration

pub mod analysis;
pub mod blocking;
pub mod error;
pub mod events;
pub mod storage;

pub use analysis::{AnalyzerConfig, Conflict, Gap, Overload, ScheduleAnalyzer, ScheduleReport};
pub use blocking::{
    BlockerConfig, CategoryProfile, ProfileTable, SuggestRequest, TimeBlock, TimeBlocker,
};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::{Event, EventSource};
pub use storage::{Config, EventStore};
