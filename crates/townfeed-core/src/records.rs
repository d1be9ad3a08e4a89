//! Structured records produced by the parsers and persisted by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A business parsed from a community directory listing row.
///
/// Natural key: `(source_url, name_key(), address)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub name: String,
    /// Contact person, empty when the listing names none.
    pub contact: String,
    /// Ten digits as `ddd-ddd-dddd`.
    pub phone: Option<String>,
    /// Canonical street, city, province and postal code.
    pub address: String,
    pub source_url: String,
}

impl BusinessRecord {
    /// Lowercased, whitespace-collapsed name used for key comparison.
    #[must_use]
    pub fn name_key(&self) -> String {
        normalize_key(&self.name)
    }
}

/// An upcoming event parsed from a community events page.
///
/// Natural key: `(source_url, title)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub title: String,
    pub description: String,
    /// Absolute start instant. Always after the scrape instant when produced
    /// by the event parser.
    pub starts_at: DateTime<Utc>,
    /// Display string exactly as listed, e.g. `"7:00 PM - 9:00 PM"`.
    pub time: String,
    pub location: String,
    pub category: String,
    pub organizer: String,
    pub source_url: String,
    pub source_name: String,
}

/// A news item parsed from a municipal news listing.
///
/// Natural key: `source_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: String,
    pub summary: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source_url: String,
    pub source_name: String,
}

/// Result of reconciling one parsed record against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

fn normalize_key(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
