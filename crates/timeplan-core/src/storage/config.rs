//! TOML-based application configuration.
//!
//! Stores scheduling preferences:
//! - Working-hours window
//! - Suggestion lookahead and cap
//! - Analyzer thresholds
//! - Per-category profile overrides
//!
//! Configuration is stored at `~/.config/timeplan/config.toml`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::data_dir;
use crate::analysis::AnalyzerConfig;
use crate::blocking::{BlockerConfig, CategoryProfile, ProfileTable};
use crate::error::{ConfigError, Result};

/// Working-hours window, `[start, end)` on every workday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkHoursConfig {
    #[serde(default = "default_work_start")]
    pub start: NaiveTime,
    #[serde(default = "default_work_end")]
    pub end: NaiveTime,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timeplan/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub work_hours: WorkHoursConfig,
    /// Default suggestion window when no explicit range is given (days).
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,
    /// Default cap on returned suggestions.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Minimum idle time between same-day events to report as a gap (minutes).
    #[serde(default = "default_gap_threshold_minutes")]
    pub gap_threshold_minutes: i64,
    /// Minimum events per day to report as overloaded.
    #[serde(default = "default_overload_threshold")]
    pub overload_threshold: usize,
    /// Category profile overrides, merged over the built-in table.
    #[serde(default)]
    pub profiles: HashMap<String, CategoryProfile>,
}

fn default_work_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}
fn default_work_end() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 0, 0).unwrap()
}
fn default_lookahead_days() -> i64 {
    7
}
fn default_max_suggestions() -> usize {
    5
}
fn default_gap_threshold_minutes() -> i64 {
    120
}
fn default_overload_threshold() -> usize {
    8
}

impl Default for WorkHoursConfig {
    fn default() -> Self {
        Self {
            start: default_work_start(),
            end: default_work_end(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_hours: WorkHoursConfig::default(),
            lookahead_days: default_lookahead_days(),
            max_suggestions: default_max_suggestions(),
            gap_threshold_minutes: default_gap_threshold_minutes(),
            overload_threshold: default_overload_threshold(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing and returning the default when absent.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| {
                    ConfigError::LoadFailed {
                        path,
                        message: e.to_string(),
                    }
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// as the existing value's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    /// The blocker configuration implied by this config: built-in profiles
    /// with user overrides applied on top.
    pub fn blocker_config(&self) -> BlockerConfig {
        let mut profiles = ProfileTable::default();
        for (category, profile) in &self.profiles {
            profiles.set(category.clone(), profile.clone());
        }
        BlockerConfig {
            work_start: self.work_hours.start,
            work_end: self.work_hours.end,
            lookahead_days: self.lookahead_days,
            max_suggestions: self.max_suggestions,
            profiles,
        }
    }

    /// The analyzer configuration implied by this config.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            gap_threshold_minutes: self.gap_threshold_minutes,
            overload_threshold: self.overload_threshold,
            lookahead_days: self.lookahead_days,
        }
    }
}

fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(ConfigError::UnknownKey(key.to_string()).into());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current
                .as_object_mut()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let existing = obj
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| ConfigError::ParseFailed(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        return Err(ConfigError::ParseFailed(format!(
                            "cannot parse '{value}' as number"
                        ))
                        .into());
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value)?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current
            .get_mut(part)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
    }

    Err(ConfigError::UnknownKey(key.to_string()).into())
}
