use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scraper_config::ScraperType;
use crate::CoreError;

/// Number of run logs kept per scraper type; older rows are pruned on insert.
pub const RUN_LOG_RETENTION: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(RunStatus::Success),
            "error" => Ok(RunStatus::Error),
            other => Err(CoreError::UnknownRunStatus(other.to_string())),
        }
    }
}

/// A run log entry ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRunLog {
    pub kind: ScraperType,
    pub status: RunStatus,
    pub message: String,
    pub duration_ms: i64,
    pub items_processed: i32,
    pub error_messages: Vec<String>,
}
