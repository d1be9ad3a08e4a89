use thiserror::Error;
use townfeed_core::ScraperType;
use townfeed_db::DbError;
use townfeed_scraper::ScraperError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no source configured for {0} in the sources file")]
    NoSource(ScraperType),

    /// The page could not be fetched after every retry. The failure has
    /// already been written to the run log when this is returned.
    #[error("failed to fetch {kind} source: {source}")]
    Fetch {
        kind: ScraperType,
        #[source]
        source: ScraperError,
    },

    #[error("failed to build {kind} parser: {source}")]
    Parser {
        kind: ScraperType,
        #[source]
        source: ScraperError,
    },

    #[error(transparent)]
    Store(#[from] DbError),
}
