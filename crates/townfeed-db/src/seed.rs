//! Removal of placeholder rows left behind by demo data loaders.

use sqlx::PgPool;
use townfeed_core::ScraperType;

use crate::DbError;

/// `source_url` values that mark a row as seed data. Rows whose URL uses the
/// `seed:` scheme count as well.
pub const SEED_SOURCE_URLS: &[&str] = &["seed", "sample", "placeholder", "demo", "example"];

fn table_for(kind: ScraperType) -> &'static str {
    match kind {
        ScraperType::News => "news_items",
        ScraperType::Events => "events",
        ScraperType::Businesses => "businesses",
    }
}

/// Deletes seed rows from the table behind `kind`. Returns the number of
/// rows deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn clear_seed_records(pool: &PgPool, kind: ScraperType) -> Result<u64, DbError> {
    let markers: Vec<String> = SEED_SOURCE_URLS.iter().map(|s| (*s).to_owned()).collect();
    let sql = format!(
        "DELETE FROM {} WHERE lower(source_url) = ANY($1) OR source_url LIKE 'seed:%'",
        table_for(kind)
    );

    let result = sqlx::query(&sql).bind(markers).execute(pool).await?;
    Ok(result.rows_affected())
}
