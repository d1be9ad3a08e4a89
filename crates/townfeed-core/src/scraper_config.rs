//! Per-source scraper configuration: which sources exist, how often they
//! may run, and when they last ran.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::SchedulePolicy;
use crate::{ConfigError, CoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScraperType {
    News,
    Events,
    Businesses,
}

impl ScraperType {
    pub const ALL: [ScraperType; 3] = [
        ScraperType::News,
        ScraperType::Events,
        ScraperType::Businesses,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScraperType::News => "news",
            ScraperType::Events => "events",
            ScraperType::Businesses => "businesses",
        }
    }

    /// Minimum hours between runs for a freshly seeded config.
    #[must_use]
    pub fn default_interval_hours(self) -> i32 {
        match self {
            ScraperType::News => 6,
            ScraperType::Events => 24,
            ScraperType::Businesses => 168,
        }
    }

    #[must_use]
    pub fn schedule_policy(self) -> SchedulePolicy {
        match self {
            ScraperType::News | ScraperType::Events => SchedulePolicy::Daily,
            ScraperType::Businesses => SchedulePolicy::Weekly,
        }
    }
}

impl std::fmt::Display for ScraperType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScraperType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(ScraperType::News),
            "events" => Ok(ScraperType::Events),
            "businesses" => Ok(ScraperType::Businesses),
            other => Err(CoreError::UnknownScraperType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub kind: ScraperType,
    pub interval_hours: i32,
    pub is_enabled: bool,
    /// Start of the latest attempt, successful or not.
    pub last_run: Option<DateTime<Utc>>,
    /// Start of the latest successful run. The interval gate measures from here.
    pub last_success: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
}

impl ScraperConfig {
    /// The config a source gets the first time it is accessed.
    #[must_use]
    pub fn seeded(kind: ScraperType) -> Self {
        Self {
            kind,
            interval_hours: kind.default_interval_hours(),
            is_enabled: true,
            last_run: None,
            last_success: None,
            next_run: None,
        }
    }
}

/// Reject non-positive run intervals before they are persisted.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidInterval`] when `hours <= 0`.
pub fn validate_interval_hours(hours: i32) -> Result<(), ConfigError> {
    if hours <= 0 {
        return Err(ConfigError::InvalidInterval(hours));
    }
    Ok(())
}
