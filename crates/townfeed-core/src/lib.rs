pub mod app_config;
pub mod config;
pub mod records;
pub mod run_log;
pub mod schedule;
pub mod scraper_config;
pub mod sources;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{BusinessRecord, EventRecord, NewsRecord, UpsertOutcome};
pub use run_log::{NewRunLog, RunStatus, RUN_LOG_RETENTION};
pub use schedule::{CivilZone, GateDecision, SchedulePolicy, SkipReason, MOUNTAIN};
pub use scraper_config::{validate_interval_hours, ScraperConfig, ScraperType};
pub use sources::{load_sources, Locale, SourceConfig, SourcesFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation error: {0}")]
    Validation(String),

    #[error("interval_hours must be greater than zero, got {0}")]
    InvalidInterval(i32),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown scraper type: {0}")]
    UnknownScraperType(String),

    #[error("unknown run status: {0}")]
    UnknownRunStatus(String),
}
