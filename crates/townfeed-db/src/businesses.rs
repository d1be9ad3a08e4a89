//! Database operations for the `businesses` table.

use sqlx::PgPool;
use townfeed_core::{BusinessRecord, UpsertOutcome};

use crate::{upsert_outcome, DbError};

/// Inserts a business or updates its contact and phone when they changed.
///
/// Keyed on `(source_url, name_key, address)`. A single statement, so
/// concurrent runs cannot create duplicates.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_business(
    pool: &PgPool,
    record: &BusinessRecord,
) -> Result<UpsertOutcome, DbError> {
    let inserted = sqlx::query_scalar::<_, bool>(
        "INSERT INTO businesses (name, name_key, contact, phone, address, source_url) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT ON CONSTRAINT businesses_natural_key DO UPDATE SET \
             name = EXCLUDED.name, \
             contact = EXCLUDED.contact, \
             phone = EXCLUDED.phone, \
             updated_at = NOW() \
         WHERE (businesses.contact, businesses.phone) \
               IS DISTINCT FROM (EXCLUDED.contact, EXCLUDED.phone) \
         RETURNING (xmax = 0) AS inserted",
    )
    .bind(&record.name)
    .bind(record.name_key())
    .bind(&record.contact)
    .bind(&record.phone)
    .bind(&record.address)
    .bind(&record.source_url)
    .fetch_optional(pool)
    .await?;

    Ok(upsert_outcome(inserted))
}
