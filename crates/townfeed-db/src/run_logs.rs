//! Database operations for `scraper_run_logs`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use townfeed_core::{NewRunLog, ScraperType, RUN_LOG_RETENTION};
use uuid::Uuid;

use crate::DbError;

/// A row from the `scraper_run_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RunLogRow {
    pub id: i64,
    pub public_id: Uuid,
    pub kind: String,
    pub status: String,
    pub message: String,
    pub duration_ms: i64,
    pub items_processed: i32,
    pub error_messages: Vec<String>,
    pub created_at: DateTime<Utc>,
}

const RUN_LOG_COLUMNS: &str = "id, public_id, kind, status, message, duration_ms, \
                               items_processed, error_messages, created_at";

/// Writes a run log and prunes the type's history to the
/// [`RUN_LOG_RETENTION`] most recent entries, in one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or prune fails; neither is
/// applied in that case.
pub async fn insert_run_log(pool: &PgPool, log: &NewRunLog) -> Result<RunLogRow, DbError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, RunLogRow>(&format!(
        "INSERT INTO scraper_run_logs \
             (public_id, kind, status, message, duration_ms, items_processed, error_messages) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {RUN_LOG_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(log.kind.as_str())
    .bind(log.status.as_str())
    .bind(&log.message)
    .bind(log.duration_ms)
    .bind(log.items_processed)
    .bind(&log.error_messages)
    .fetch_one(&mut *tx)
    .await?;

    let pruned = sqlx::query(
        "DELETE FROM scraper_run_logs \
         WHERE kind = $1 \
           AND id NOT IN ( \
               SELECT id FROM scraper_run_logs \
               WHERE kind = $1 \
               ORDER BY created_at DESC, id DESC \
               LIMIT $2 \
           )",
    )
    .bind(log.kind.as_str())
    .bind(RUN_LOG_RETENTION)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    if pruned > 0 {
        tracing::debug!(source = %log.kind, pruned, "pruned old run logs");
    }
    Ok(row)
}

/// Most recent logs for `kind`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_run_logs(
    pool: &PgPool,
    kind: ScraperType,
    limit: i64,
) -> Result<Vec<RunLogRow>, DbError> {
    let rows = sqlx::query_as::<_, RunLogRow>(&format!(
        "SELECT {RUN_LOG_COLUMNS} FROM scraper_run_logs \
         WHERE kind = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2"
    ))
    .bind(kind.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
