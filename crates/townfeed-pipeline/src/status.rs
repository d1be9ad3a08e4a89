//! `Status`: when a source last ran and when it runs next.

use chrono::{DateTime, Utc};
use townfeed_core::schedule::{format_countdown, is_due};
use townfeed_core::ScraperType;
use townfeed_scraper::Fetch;

use crate::{Pipeline, PipelineError, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleState {
    Disabled,
    Due,
    /// Time left until the next run, as rendered by [`format_countdown`].
    Waiting(String),
}

impl std::fmt::Display for ScheduleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleState::Disabled => f.write_str("disabled"),
            ScheduleState::Due => f.write_str(townfeed_core::schedule::DUE_MARKER),
            ScheduleState::Waiting(countdown) => write!(f, "in {countdown}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    pub kind: ScraperType,
    pub last_run: Option<DateTime<Utc>>,
    pub next_scheduled: DateTime<Utc>,
    pub interval_hours: i32,
    pub state: ScheduleState,
}

impl<F: Fetch, S: Store> Pipeline<F, S> {
    /// # Errors
    ///
    /// See [`Pipeline::status_at`].
    pub async fn status(&self, kind: ScraperType) -> Result<SourceStatus, PipelineError> {
        self.status_at(kind, Utc::now()).await
    }

    /// Reports the schedule of `kind` as of `now`.
    ///
    /// `next_scheduled` is the stored `next_run`; a source that has never run
    /// reports the next slot of its schedule policy instead, but is due.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NoSource`] if the sources file has no entry for `kind`.
    /// - [`PipelineError::Store`] if the config cannot be read or created.
    pub async fn status_at(
        &self,
        kind: ScraperType,
        now: DateTime<Utc>,
    ) -> Result<SourceStatus, PipelineError> {
        self.source(kind)?;
        let config = self
            .store
            .get_or_create_config(kind, self.sources.seed_interval_hours(kind))
            .await?;

        let next_scheduled = config
            .next_run
            .unwrap_or_else(|| self.next_run_after(kind, now));
        let state = if !config.is_enabled {
            ScheduleState::Disabled
        } else if is_due(&config, now) {
            ScheduleState::Due
        } else {
            ScheduleState::Waiting(format_countdown(next_scheduled, now))
        };

        Ok(SourceStatus {
            kind,
            last_run: config.last_run,
            next_scheduled,
            interval_hours: config.interval_hours,
            state,
        })
    }
}
