//! Database operations for the `events` table.

use sqlx::PgPool;
use townfeed_core::{EventRecord, UpsertOutcome};

use crate::{upsert_outcome, DbError};

/// Inserts an event or updates it when description, start, time or
/// location changed. Keyed on `(source_url, title)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_event(pool: &PgPool, record: &EventRecord) -> Result<UpsertOutcome, DbError> {
    let inserted = sqlx::query_scalar::<_, bool>(
        "INSERT INTO events (title, description, starts_at, time_display, location, \
                             category, organizer, source_url, source_name) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT ON CONSTRAINT events_natural_key DO UPDATE SET \
             description = EXCLUDED.description, \
             starts_at = EXCLUDED.starts_at, \
             time_display = EXCLUDED.time_display, \
             location = EXCLUDED.location, \
             updated_at = NOW() \
         WHERE (events.description, events.starts_at, events.time_display, events.location) \
               IS DISTINCT FROM \
               (EXCLUDED.description, EXCLUDED.starts_at, EXCLUDED.time_display, EXCLUDED.location) \
         RETURNING (xmax = 0) AS inserted",
    )
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.starts_at)
    .bind(&record.time)
    .bind(&record.location)
    .bind(&record.category)
    .bind(&record.organizer)
    .bind(&record.source_url)
    .bind(&record.source_name)
    .fetch_optional(pool)
    .await?;

    Ok(upsert_outcome(inserted))
}
