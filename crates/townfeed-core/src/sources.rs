use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scraper_config::{validate_interval_hours, ScraperType};
use crate::ConfigError;

/// Where the scraped pages describe: drives address matching and the
/// fallback event location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    pub city: String,
    /// Two-letter province abbreviation, e.g. `"AB"`.
    pub province: String,
    /// Used when an event lists no `@ location`. Defaults to `"{city}, {province}"`.
    #[serde(default)]
    pub fallback_location: Option<String>,
}

impl Locale {
    #[must_use]
    pub fn fallback_location(&self) -> String {
        self.fallback_location
            .clone()
            .unwrap_or_else(|| format!("{}, {}", self.city, self.province))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(rename = "type")]
    pub kind: ScraperType,
    /// Human-readable source name, stored as `source_name` on events and news.
    pub name: String,
    pub url: String,
    /// Overrides the seeded interval when the config row is first created.
    #[serde(default)]
    pub interval_hours: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesFile {
    pub locale: Locale,
    pub sources: Vec<SourceConfig>,
}

impl SourcesFile {
    #[must_use]
    pub fn source(&self, kind: ScraperType) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.kind == kind)
    }

    /// Interval a config row is seeded with on first access: the source's
    /// `interval_hours` override if present, otherwise the type default.
    #[must_use]
    pub fn seed_interval_hours(&self, kind: ScraperType) -> i32 {
        self.source(kind)
            .and_then(|s| s.interval_hours)
            .unwrap_or_else(|| kind.default_interval_hours())
    }
}

/// Load and validate the sources configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources_file: SourcesFile = serde_yaml::from_str(&content)?;
    validate_sources(&sources_file)?;

    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let locale = &sources_file.locale;
    if locale.city.trim().is_empty() {
        return Err(ConfigError::Validation(
            "locale city must be non-empty".to_string(),
        ));
    }
    if locale.province.len() != 2 || !locale.province.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "locale province '{}' must be a two-letter uppercase code",
            locale.province
        )));
    }

    let mut seen = HashSet::new();
    for source in &sources_file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} source name must be non-empty",
                source.kind
            )));
        }
        if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "{} source url '{}' must be http(s)",
                source.kind, source.url
            )));
        }
        if let Some(hours) = source.interval_hours {
            validate_interval_hours(hours)?;
        }
        if !seen.insert(source.kind) {
            return Err(ConfigError::Validation(format!(
                "duplicate source type: '{}'",
                source.kind
            )));
        }
    }

    Ok(())
}
