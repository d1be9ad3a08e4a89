//! The persistence seam used by [`crate::Pipeline`].

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use townfeed_core::{
    BusinessRecord, EventRecord, NewRunLog, NewsRecord, ScraperConfig, ScraperType, UpsertOutcome,
};
use townfeed_db::DbError;

/// Storage operations a run needs. Upserts must be atomic by natural key.
pub trait Store: Send + Sync {
    fn get_or_create_config(
        &self,
        kind: ScraperType,
        seed_interval_hours: i32,
    ) -> impl Future<Output = Result<ScraperConfig, DbError>> + Send;

    fn clear_seed(&self, kind: ScraperType) -> impl Future<Output = Result<u64, DbError>> + Send;

    fn upsert_business(
        &self,
        record: &BusinessRecord,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send;

    fn upsert_event(
        &self,
        record: &EventRecord,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send;

    fn upsert_news(
        &self,
        record: &NewsRecord,
    ) -> impl Future<Output = Result<UpsertOutcome, DbError>> + Send;

    fn insert_run_log(&self, log: &NewRunLog) -> impl Future<Output = Result<(), DbError>> + Send;

    /// `succeeded` also moves `last_success`, which the interval gate reads.
    fn record_run_times(
        &self,
        kind: ScraperType,
        last_run: DateTime<Utc>,
        next_run: DateTime<Utc>,
        succeeded: bool,
    ) -> impl Future<Output = Result<(), DbError>> + Send;
}

/// [`Store`] backed by the Postgres tables in `townfeed-db`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    async fn get_or_create_config(
        &self,
        kind: ScraperType,
        seed_interval_hours: i32,
    ) -> Result<ScraperConfig, DbError> {
        townfeed_db::get_or_create_scraper_config(&self.pool, kind, seed_interval_hours).await
    }

    async fn clear_seed(&self, kind: ScraperType) -> Result<u64, DbError> {
        townfeed_db::clear_seed_records(&self.pool, kind).await
    }

    async fn upsert_business(&self, record: &BusinessRecord) -> Result<UpsertOutcome, DbError> {
        townfeed_db::upsert_business(&self.pool, record).await
    }

    async fn upsert_event(&self, record: &EventRecord) -> Result<UpsertOutcome, DbError> {
        townfeed_db::upsert_event(&self.pool, record).await
    }

    async fn upsert_news(&self, record: &NewsRecord) -> Result<UpsertOutcome, DbError> {
        townfeed_db::upsert_news_item(&self.pool, record).await
    }

    async fn insert_run_log(&self, log: &NewRunLog) -> Result<(), DbError> {
        townfeed_db::insert_run_log(&self.pool, log).await.map(|_| ())
    }

    async fn record_run_times(
        &self,
        kind: ScraperType,
        last_run: DateTime<Utc>,
        next_run: DateTime<Utc>,
        succeeded: bool,
    ) -> Result<(), DbError> {
        townfeed_db::record_run_times(&self.pool, kind, last_run, next_run, succeeded).await
    }
}
