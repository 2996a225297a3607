mod config;
pub mod event_store;

pub use config::Config;
pub use event_store::EventStore;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/timeplan[-dev]/` based on TIMEPLAN_ENV.
///
/// Set TIMEPLAN_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMEPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timeplan-dev")
    } else {
        base_dir.join("timeplan")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
