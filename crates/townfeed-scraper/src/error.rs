use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid source URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid locale pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A block that looked like an entity but could not be converted.
///
/// Distinct from "unparseable": a block that simply does not match any
/// pattern is skipped without an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid calendar date in \"{text}\"")]
    InvalidDate { text: String },

    #[error("invalid clock time in \"{text}\"")]
    InvalidTime { text: String },
}
