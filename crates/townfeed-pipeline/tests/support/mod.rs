//! In-memory [`Store`] and canned [`Fetch`] for driving a `Pipeline` without
//! a network or database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use townfeed_core::{
    validate_interval_hours, BusinessRecord, EventRecord, Locale, NewRunLog, NewsRecord,
    ScraperConfig, ScraperType, SourceConfig, SourcesFile, UpsertOutcome, RUN_LOG_RETENTION,
};
use townfeed_db::{DbError, SEED_SOURCE_URLS};
use townfeed_pipeline::Store;
use townfeed_scraper::{Fetch, FetchedPage, ScraperError};

pub const BUSINESS_URL: &str = "https://www.example.ca/business-directory";
pub const EVENTS_URL: &str = "https://www.example.ca/community-events";
pub const NEWS_URL: &str = "https://www.example.ca/news";

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>().expect("valid RFC 3339 instant")
}

pub fn sources() -> SourcesFile {
    let source = |kind, name: &str, url: &str| SourceConfig {
        kind,
        name: name.to_string(),
        url: url.to_string(),
        interval_hours: None,
    };
    SourcesFile {
        locale: Locale {
            city: "Wetaskiwin".to_string(),
            province: "AB".to_string(),
            fallback_location: None,
        },
        sources: vec![
            source(ScraperType::Businesses, "Wetaskiwin Business Directory", BUSINESS_URL),
            source(ScraperType::Events, "Wetaskiwin Community Events", EVENTS_URL),
            source(ScraperType::News, "Wetaskiwin News", NEWS_URL),
        ],
    }
}

// ---------------------------------------------------------------------------
// Canned pages
// ---------------------------------------------------------------------------

pub const DIRECTORY_PAGE: &str = r##"
    <table>
      <tr><th>Business</th><th>Contact</th><th>Address</th></tr>
      <tr><td>Amen Thrift Shop</td><td>Tammy Becsko</td><td>5002 51 Avenue</td><td>Wetaskiwin, AB</td><td>T9A 0P3</td><td>Phone: 780-352-5555</td></tr>
      <tr><td>AEM Fabrication Ltd</td><td></td><td>3802 56 Street</td><td>Wetaskiwin, AB</td><td>T9A 2B1</td><td><a href="#">View Map</a></td></tr>
      <tr><td>Unknown Listing</td><td>No address here</td></tr>
    </table>
"##;

pub const EVENTS_PAGE: &str = r#"
    <h2>Upcoming Events</h2>
    <h3><a href="/events/fall-fair">Fall Fair</a></h3>
    <p>Family fun for all ages.</p>
    <p>Saturday, August 16, 2025 10:00 AM - 2:00 PM @ Agriplex</p>
    <h3><a href="/events/leap">Leap Day Dance</a></h3>
    <p>February 30, 2026, 7:00 PM</p>
    <h3><a href="/events/old">Canada Day</a></h3>
    <p>July 1, 2025, 10:00 AM</p>
"#;

pub const NEWS_PAGE: &str = r#"
    <div class="news-listing"><ul>
      <li>
        <h3><a href="/news/road-closure">Road Closure on 50 Street</a></h3>
        <span class="date">August 14, 2025</span>
        <p>Crews will be repaving 50 Street next week.</p>
      </li>
    </ul></div>
"#;

/// Serves fixed bodies by URL. Unknown URLs answer 404; URLs registered with
/// [`CannedFetcher::failing`] answer with the given status.
#[derive(Debug, Default)]
pub struct CannedFetcher {
    pages: Mutex<HashMap<String, Result<String, u16>>>,
    calls: AtomicUsize,
}

impl CannedFetcher {
    pub fn with_defaults() -> Self {
        Self::default()
            .page(BUSINESS_URL, DIRECTORY_PAGE)
            .page(EVENTS_URL, EVENTS_PAGE)
            .page(NEWS_URL, NEWS_PAGE)
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.set_page(url, html);
        self
    }

    pub fn failing(self, url: &str, status: u16) -> Self {
        self.pages().insert(url.to_string(), Err(status));
        self
    }

    /// Replaces the body served for `url`.
    pub fn set_page(&self, url: &str, html: &str) {
        self.pages().insert(url.to_string(), Ok(html.to_string()));
    }

    fn pages(&self) -> MutexGuard<'_, HashMap<String, Result<String, u16>>> {
        self.pages.lock().expect("fetcher mutex poisoned")
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let canned = self.pages().get(url).cloned();
        match canned {
            Some(Ok(html)) => Ok(FetchedPage {
                url: url.to_string(),
                status: 200,
                html,
            }),
            Some(Err(status)) => Err(ScraperError::UnexpectedStatus {
                status,
                url: url.to_string(),
            }),
            None => Err(ScraperError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StoredLog {
    pub created_at: DateTime<Utc>,
    pub log: NewRunLog,
}

#[derive(Debug, Default)]
pub struct State {
    /// Stamped onto run logs as `created_at`.
    pub now: Option<DateTime<Utc>>,
    pub configs: HashMap<ScraperType, ScraperConfig>,
    pub businesses: HashMap<(String, String, String), BusinessRecord>,
    pub events: HashMap<(String, String), EventRecord>,
    pub news: HashMap<String, NewsRecord>,
    pub logs: Vec<StoredLog>,
    /// Upserts of a record with this name or title fail.
    pub fail_on: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store mutex poisoned")
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        self.state().now = Some(now);
    }

    pub fn logs_for(&self, kind: ScraperType) -> Vec<NewRunLog> {
        self.state()
            .logs
            .iter()
            .filter(|l| l.log.kind == kind)
            .map(|l| l.log.clone())
            .collect()
    }
}

fn upsert<K: std::hash::Hash + Eq, V: PartialEq + Clone>(
    table: &mut HashMap<K, V>,
    key: K,
    record: &V,
) -> UpsertOutcome {
    match table.get(&key) {
        None => {
            table.insert(key, record.clone());
            UpsertOutcome::Inserted
        }
        Some(existing) if existing == record => UpsertOutcome::Unchanged,
        Some(_) => {
            table.insert(key, record.clone());
            UpsertOutcome::Updated
        }
    }
}

fn is_seed(source_url: &str) -> bool {
    let lower = source_url.to_lowercase();
    SEED_SOURCE_URLS.contains(&lower.as_str()) || source_url.starts_with("seed:")
}

impl Store for MemoryStore {
    async fn get_or_create_config(
        &self,
        kind: ScraperType,
        seed_interval_hours: i32,
    ) -> Result<ScraperConfig, DbError> {
        validate_interval_hours(seed_interval_hours)?;
        let mut state = self.state();
        let config = state.configs.entry(kind).or_insert_with(|| ScraperConfig {
            interval_hours: seed_interval_hours,
            ..ScraperConfig::seeded(kind)
        });
        Ok(config.clone())
    }

    async fn clear_seed(&self, kind: ScraperType) -> Result<u64, DbError> {
        let mut state = self.state();
        let removed = match kind {
            ScraperType::Businesses => {
                let before = state.businesses.len();
                state.businesses.retain(|_, r| !is_seed(&r.source_url));
                before - state.businesses.len()
            }
            ScraperType::Events => {
                let before = state.events.len();
                state.events.retain(|_, r| !is_seed(&r.source_url));
                before - state.events.len()
            }
            ScraperType::News => {
                let before = state.news.len();
                state.news.retain(|_, r| !is_seed(&r.source_url));
                before - state.news.len()
            }
        };
        Ok(removed as u64)
    }

    async fn upsert_business(&self, record: &BusinessRecord) -> Result<UpsertOutcome, DbError> {
        let mut state = self.state();
        if state.fail_on.as_deref() == Some(record.name.as_str()) {
            return Err(DbError::NotFound);
        }
        let key = (
            record.source_url.clone(),
            record.name_key(),
            record.address.clone(),
        );
        Ok(upsert(&mut state.businesses, key, record))
    }

    async fn upsert_event(&self, record: &EventRecord) -> Result<UpsertOutcome, DbError> {
        let mut state = self.state();
        if state.fail_on.as_deref() == Some(record.title.as_str()) {
            return Err(DbError::NotFound);
        }
        let key = (record.source_url.clone(), record.title.clone());
        Ok(upsert(&mut state.events, key, record))
    }

    async fn upsert_news(&self, record: &NewsRecord) -> Result<UpsertOutcome, DbError> {
        let mut state = self.state();
        if state.fail_on.as_deref() == Some(record.title.as_str()) {
            return Err(DbError::NotFound);
        }
        Ok(upsert(&mut state.news, record.source_url.clone(), record))
    }

    async fn insert_run_log(&self, log: &NewRunLog) -> Result<(), DbError> {
        let mut state = self.state();
        let created_at = state.now.unwrap_or_else(Utc::now);
        state.logs.push(StoredLog {
            created_at,
            log: log.clone(),
        });

        let retention = usize::try_from(RUN_LOG_RETENTION).expect("retention fits usize");
        let kept = state.logs.iter().filter(|l| l.log.kind == log.kind).count();
        if kept > retention {
            let mut excess = kept - retention;
            state.logs.retain(|l| {
                if excess > 0 && l.log.kind == log.kind {
                    excess -= 1;
                    false
                } else {
                    true
                }
            });
        }
        Ok(())
    }

    async fn record_run_times(
        &self,
        kind: ScraperType,
        last_run: DateTime<Utc>,
        next_run: DateTime<Utc>,
        succeeded: bool,
    ) -> Result<(), DbError> {
        let mut state = self.state();
        let config = state.configs.get_mut(&kind).ok_or(DbError::NotFound)?;
        config.last_run = Some(last_run);
        config.next_run = Some(next_run);
        if succeeded {
            config.last_success = Some(last_run);
        }
        Ok(())
    }
}
