//! Category preference profiles.
//!
//! Each event category ("meeting", "call", ...) carries preferred and avoided
//! start-time anchors, advisory duration bounds, and title keywords used for
//! clustering. The built-in table covers the five stock categories; unknown
//! categories fall back to an empty profile so only the base, buffer, weekday
//! and time-of-day rules apply.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Scheduling preferences for one event category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// (hour, minute) anchors that earn a bonus when a slot starts near them.
    #[serde(default)]
    pub preferred_times: Vec<(u32, u32)>,
    /// (hour, minute) anchors that incur a penalty when a slot starts near them.
    #[serde(default)]
    pub avoided_times: Vec<(u32, u32)>,
    /// Advisory lower duration bound in minutes; never enforced by the scorer.
    #[serde(default)]
    pub min_duration: i64,
    /// Advisory upper duration bound in minutes; never enforced by the scorer.
    #[serde(default)]
    pub max_duration: i64,
    /// Title keywords matched case-insensitively for event clustering.
    ///
    /// This is a heuristic, not a guarantee: only the literal substrings
    /// listed here are recognized.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryProfile {
    /// Case-insensitive substring match of any keyword against a title.
    pub fn matches_title(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.keywords.iter().any(|kw| title.contains(kw.as_str()))
    }
}

/// Table of category profiles keyed by category label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileTable {
    profiles: HashMap<String, CategoryProfile>,
}

impl ProfileTable {
    /// Profile for a category, or the empty profile for unknown labels.
    pub fn get(&self, category: &str) -> CategoryProfile {
        self.profiles.get(category).cloned().unwrap_or_default()
    }

    /// Known category labels.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Insert or replace a profile, e.g. from user configuration.
    pub fn set(&mut self, category: impl Into<String>, profile: CategoryProfile) {
        self.profiles.insert(category.into(), profile);
    }
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for ProfileTable {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            "meeting".to_string(),
            CategoryProfile {
                preferred_times: vec![(10, 0), (14, 0), (15, 0)],
                avoided_times: vec![(12, 0), (17, 0)],
                min_duration: 30,
                max_duration: 120,
                keywords: keywords(&["meeting", "standup", "sync", "review", "discussion"]),
            },
        );
        profiles.insert(
            "call".to_string(),
            CategoryProfile {
                preferred_times: vec![(10, 0), (14, 0), (15, 30)],
                avoided_times: vec![(12, 0), (17, 0)],
                min_duration: 15,
                max_duration: 60,
                keywords: keywords(&["call", "phone", "interview", "chat"]),
            },
        );
        profiles.insert(
            "focus".to_string(),
            CategoryProfile {
                preferred_times: vec![(9, 0), (10, 0), (14, 0)],
                avoided_times: vec![(12, 0), (16, 0)],
                min_duration: 60,
                max_duration: 240,
                keywords: keywords(&["focus", "work", "coding", "development", "analysis"]),
            },
        );
        profiles.insert(
            "lunch".to_string(),
            CategoryProfile {
                preferred_times: vec![(12, 0), (12, 30), (13, 0)],
                avoided_times: vec![(9, 0), (16, 0)],
                min_duration: 30,
                max_duration: 90,
                keywords: keywords(&["lunch", "meal", "eat", "food"]),
            },
        );
        profiles.insert(
            "break".to_string(),
            CategoryProfile {
                preferred_times: vec![(10, 30), (15, 0), (15, 30)],
                avoided_times: vec![(12, 0), (17, 0)],
                min_duration: 15,
                max_duration: 30,
                keywords: keywords(&["break", "rest", "coffee", "tea"]),
            },
        );
        Self { profiles }
    }
}
