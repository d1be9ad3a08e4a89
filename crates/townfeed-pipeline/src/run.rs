//! `Run`: fetch, extract, upsert and log one source.

use std::future::Future;
use std::time::Instant;

use chrono::{DateTime, Utc};
use townfeed_core::schedule::check_run_gate;
use townfeed_core::{
    BusinessRecord, EventRecord, GateDecision, NewRunLog, NewsRecord, RunStatus, ScraperType,
    SkipReason, UpsertOutcome,
};
use townfeed_db::DbError;
use townfeed_scraper::{
    extract_businesses, extract_events, extract_news, BusinessParser, EventParser, Extraction,
    Fetch,
};

use crate::{Pipeline, PipelineError, Store};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Bypass the enabled flag and the minimum-interval gate.
    pub force: bool,
    /// Delete placeholder records of this type before storing.
    pub clear_seed: bool,
}

/// Counts for one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records parsed from the page.
    pub total: usize,
    pub new: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Seed records removed before storing, when requested.
    pub seed_cleared: u64,
    /// Per-block parse failures followed by per-record store failures.
    pub errors: Vec<String>,
}

impl RunSummary {
    fn tally(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.new += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }

    fn message(&self, kind: ScraperType) -> String {
        let mut message = format!(
            "processed {} {kind}: {} new, {} updated",
            self.total, self.new, self.updated
        );
        if !self.errors.is_empty() {
            message.push_str(&format!(", {} errors", self.errors.len()));
        }
        message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Skipped(SkipReason),
    Completed(RunSummary),
}

// ---------------------------------------------------------------------------
// Record persistence
// ---------------------------------------------------------------------------

/// A parsed record that knows which upsert stores it.
trait Persist: Sync {
    fn label(&self) -> &str;

    fn persist<S: Store>(
        &self,
        store: &S,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send;
}

impl Persist for BusinessRecord {
    fn label(&self) -> &str {
        &self.name
    }

    fn persist<S: Store>(
        &self,
        store: &S,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send {
        store.upsert_business(self)
    }
}

impl Persist for EventRecord {
    fn label(&self) -> &str {
        &self.title
    }

    fn persist<S: Store>(
        &self,
        store: &S,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send {
        store.upsert_event(self)
    }
}

impl Persist for NewsRecord {
    fn label(&self) -> &str {
        &self.title
    }

    fn persist<S: Store>(
        &self,
        store: &S,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send {
        store.upsert_news(self)
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

impl<F: Fetch, S: Store> Pipeline<F, S> {
    /// Runs `kind` now. See [`Pipeline::run_at`].
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run_at`].
    pub async fn run(
        &self,
        kind: ScraperType,
        options: RunOptions,
    ) -> Result<RunOutcome, PipelineError> {
        self.run_at(kind, options, Utc::now()).await
    }

    /// Runs `kind` as of `now`.
    ///
    /// The config row is created with seeded defaults on first use. Unless
    /// `options.force` is set, a disabled source or one whose last successful
    /// run started less than one interval before `now` is skipped without
    /// fetching.
    ///
    /// Blocks that fail to parse and records that fail to store are reported
    /// in [`RunSummary::errors`] without stopping the run. Every run that gets
    /// past the gate writes one run log and advances `next_run`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NoSource`] if the sources file has no entry for `kind`.
    /// - [`PipelineError::Fetch`] if the page cannot be fetched after retries.
    /// - [`PipelineError::Store`] if the config, gate or run log queries fail.
    pub async fn run_at(
        &self,
        kind: ScraperType,
        options: RunOptions,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome, PipelineError> {
        let source = self.source(kind)?;
        let config = self
            .store
            .get_or_create_config(kind, self.sources.seed_interval_hours(kind))
            .await?;
        if let GateDecision::Skip(reason) = check_run_gate(&config, now, options.force) {
            tracing::info!(source = %kind, %reason, "skipping run");
            return Ok(RunOutcome::Skipped(reason));
        }

        let started = Instant::now();
        tracing::info!(source = %kind, url = %source.url, force = options.force, "starting run");

        let mut summary = RunSummary::default();
        if options.clear_seed {
            summary.seed_cleared = self.store.clear_seed(kind).await?;
            tracing::info!(source = %kind, deleted = summary.seed_cleared, "cleared seed records");
        }

        let page = match self.fetcher.fetch(&source.url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(source = %kind, url = %source.url, error = %e, "fetch failed");
                let log = NewRunLog {
                    kind,
                    status: RunStatus::Error,
                    message: format!("failed to fetch {}: {e}", source.url),
                    duration_ms: elapsed_ms(started),
                    items_processed: 0,
                    error_messages: vec![e.to_string()],
                };
                self.finish_best_effort(&log, now).await;
                return Err(PipelineError::Fetch { kind, source: e });
            }
        };
        tracing::debug!(source = %kind, status = page.status, bytes = page.html.len(), "fetched page");

        match kind {
            ScraperType::Businesses => {
                let parser = BusinessParser::new(&self.sources.locale)
                    .map_err(|e| PipelineError::Parser { kind, source: e })?;
                let extraction = extract_businesses(&page.html, &source.url, &parser);
                self.persist_all(kind, extraction, &mut summary).await;
            }
            ScraperType::Events => {
                let parser = EventParser::new(&self.sources.locale, &source.name, &source.url);
                let extraction = extract_events(&page.html, &parser, now);
                self.persist_all(kind, extraction, &mut summary).await;
            }
            ScraperType::News => {
                let extraction = extract_news(&page.html, &source.name, &source.url);
                self.persist_all(kind, extraction, &mut summary).await;
            }
        }

        let log = NewRunLog {
            kind,
            status: RunStatus::Success,
            message: summary.message(kind),
            duration_ms: elapsed_ms(started),
            items_processed: i32::try_from(summary.total).unwrap_or(i32::MAX),
            error_messages: summary.errors.clone(),
        };
        self.store.insert_run_log(&log).await?;
        self.store
            .record_run_times(kind, now, self.next_run_after(kind, now), true)
            .await?;

        tracing::info!(
            source = %kind,
            total = summary.total,
            new = summary.new,
            updated = summary.updated,
            errors = summary.errors.len(),
            duration_ms = log.duration_ms,
            "run complete"
        );
        Ok(RunOutcome::Completed(summary))
    }

    /// Runs `kind` without forcing when its `next_run` has passed.
    ///
    /// Returns `Ok(None)` when the source is not due.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run_at`].
    pub async fn run_if_due(
        &self,
        kind: ScraperType,
        now: DateTime<Utc>,
    ) -> Result<Option<RunOutcome>, PipelineError> {
        self.source(kind)?;
        let config = self
            .store
            .get_or_create_config(kind, self.sources.seed_interval_hours(kind))
            .await?;
        if !townfeed_core::schedule::is_due(&config, now) {
            tracing::debug!(source = %kind, next_run = ?config.next_run, "not due");
            return Ok(None);
        }
        self.run_at(kind, RunOptions::default(), now).await.map(Some)
    }

    pub(crate) fn next_run_after(&self, kind: ScraperType, now: DateTime<Utc>) -> DateTime<Utc> {
        kind.schedule_policy().next_after(&self.zone, now)
    }

    async fn persist_all<T: Persist>(
        &self,
        kind: ScraperType,
        extraction: Extraction<T>,
        summary: &mut RunSummary,
    ) {
        tracing::debug!(
            source = %kind,
            blocks = extraction.blocks,
            skipped = extraction.skipped,
            parse_errors = extraction.errors.len(),
            "extracted page"
        );
        summary.total = extraction.records.len();
        summary.errors.extend(extraction.errors);

        for record in &extraction.records {
            match record.persist(&self.store).await {
                Ok(outcome) => summary.tally(outcome),
                Err(e) => {
                    tracing::error!(source = %kind, record = record.label(), error = %e, "failed to store record");
                    summary
                        .errors
                        .push(format!("failed to store {}: {e}", record.label()));
                }
            }
        }
    }

    /// Writes the error log and run times for a failed run. Failures here
    /// are logged only so the original error reaches the caller.
    async fn finish_best_effort(&self, log: &NewRunLog, now: DateTime<Utc>) {
        if let Err(e) = self.store.insert_run_log(log).await {
            tracing::error!(source = %log.kind, error = %e, "failed to write run log");
        }
        let next = self.next_run_after(log.kind, now);
        if let Err(e) = self.store.record_run_times(log.kind, now, next, false).await {
            tracing::error!(source = %log.kind, error = %e, "failed to record run times");
        }
    }
}

fn elapsed_ms(started: Instant) -> i64 {
    i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_each_outcome() {
        let mut summary = RunSummary::default();
        summary.tally(UpsertOutcome::Inserted);
        summary.tally(UpsertOutcome::Inserted);
        summary.tally(UpsertOutcome::Updated);
        summary.tally(UpsertOutcome::Unchanged);
        assert_eq!((summary.new, summary.updated, summary.unchanged), (2, 1, 1));
    }

    #[test]
    fn message_mentions_errors_only_when_present() {
        let mut summary = RunSummary {
            total: 3,
            new: 1,
            updated: 2,
            ..RunSummary::default()
        };
        assert_eq!(
            summary.message(ScraperType::Events),
            "processed 3 events: 1 new, 2 updated"
        );

        summary.errors.push("Leap Day Dance: invalid date".to_string());
        assert!(summary.message(ScraperType::Events).ends_with(", 1 errors"));
    }
}
