//! Database operations for the `news_items` table.

use sqlx::PgPool;
use townfeed_core::{NewsRecord, UpsertOutcome};

use crate::{upsert_outcome, DbError};

/// Inserts a news item or refreshes its title, summary and publication
/// date when they changed. Keyed on `source_url`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_news_item(
    pool: &PgPool,
    record: &NewsRecord,
) -> Result<UpsertOutcome, DbError> {
    let inserted = sqlx::query_scalar::<_, bool>(
        "INSERT INTO news_items (title, summary, published_at, source_url, source_name) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT ON CONSTRAINT news_items_natural_key DO UPDATE SET \
             title = EXCLUDED.title, \
             summary = EXCLUDED.summary, \
             published_at = EXCLUDED.published_at, \
             updated_at = NOW() \
         WHERE (news_items.title, news_items.summary, news_items.published_at) \
               IS DISTINCT FROM (EXCLUDED.title, EXCLUDED.summary, EXCLUDED.published_at) \
         RETURNING (xmax = 0) AS inserted",
    )
    .bind(&record.title)
    .bind(&record.summary)
    .bind(record.published_at)
    .bind(&record.source_url)
    .bind(&record.source_name)
    .fetch_optional(pool)
    .await?;

    Ok(upsert_outcome(inserted))
}
