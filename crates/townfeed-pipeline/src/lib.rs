//! Source orchestration: one invocation takes one source from fetch through
//! extraction and upsert to its run log and next scheduled time.
//!
//! [`Pipeline`] is generic over its two I/O seams, [`townfeed_scraper::Fetch`]
//! and [`Store`], so runs can be driven end-to-end without a network or a
//! database.

pub mod error;
pub mod run;
pub mod status;
pub mod store;

use townfeed_core::{CivilZone, ScraperType, SourceConfig, SourcesFile, MOUNTAIN};
use townfeed_scraper::Fetch;

pub use error::PipelineError;
pub use run::{RunOptions, RunOutcome, RunSummary};
pub use status::{ScheduleState, SourceStatus};
pub use store::{PgStore, Store};

/// Runs sources described by a [`SourcesFile`] against a fetcher and a store.
#[derive(Debug)]
pub struct Pipeline<F, S> {
    fetcher: F,
    store: S,
    sources: SourcesFile,
    zone: CivilZone,
}

impl<F: Fetch, S: Store> Pipeline<F, S> {
    #[must_use]
    pub fn new(fetcher: F, store: S, sources: SourcesFile) -> Self {
        Self {
            fetcher,
            store,
            sources,
            zone: MOUNTAIN,
        }
    }

    /// Source types that have an entry in the sources file, in
    /// [`ScraperType::ALL`] order.
    #[must_use]
    pub fn configured_kinds(&self) -> Vec<ScraperType> {
        ScraperType::ALL
            .into_iter()
            .filter(|kind| self.sources.source(*kind).is_some())
            .collect()
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn source(&self, kind: ScraperType) -> Result<&SourceConfig, PipelineError> {
        self.sources
            .source(kind)
            .ok_or(PipelineError::NoSource(kind))
    }
}
