pub mod blocks;
pub mod business;
pub mod client;
pub mod error;
pub mod event;
pub mod news;
pub mod normalize;
pub mod retry;
pub mod tree;
pub mod vocab;

pub use blocks::Extraction;
pub use business::{extract_businesses, BusinessParser};
pub use client::{Fetch, FetchedPage, HttpFetcher};
pub use error::{ParseError, ScraperError};
pub use event::{extract_events, parse_event_timing, EventParser, EventTiming};
pub use news::{extract_news, parse_news};
pub use normalize::normalize_text;
pub use retry::RetryPolicy;
pub use tree::{scan_forward, TreeNode};
