//! Database operations for `scraper_configs`: one row per scraper type,
//! created on first access and never deleted.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use townfeed_core::{validate_interval_hours, ScraperConfig, ScraperType};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `scraper_configs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScraperConfigRow {
    pub kind: String,
    pub interval_hours: i32,
    pub is_enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ScraperConfigRow> for ScraperConfig {
    type Error = DbError;

    fn try_from(row: ScraperConfigRow) -> Result<Self, Self::Error> {
        Ok(ScraperConfig {
            kind: row.kind.parse::<ScraperType>()?,
            interval_hours: row.interval_hours,
            is_enabled: row.is_enabled,
            last_run: row.last_run,
            last_success: row.last_success,
            next_run: row.next_run,
        })
    }
}

/// Fields an admin may change. `None` leaves the stored value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub interval_hours: Option<i32>,
    pub is_enabled: Option<bool>,
}

const CONFIG_COLUMNS: &str =
    "kind, interval_hours, is_enabled, last_run, last_success, next_run, updated_at";

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Returns the config for `kind`, creating it with `seed_interval_hours`
/// and `is_enabled = true` if it does not exist yet.
///
/// # Errors
///
/// - [`DbError::InvalidConfig`] if `seed_interval_hours <= 0`.
/// - [`DbError::Sqlx`] if a query fails.
pub async fn get_or_create_scraper_config(
    pool: &PgPool,
    kind: ScraperType,
    seed_interval_hours: i32,
) -> Result<ScraperConfig, DbError> {
    validate_interval_hours(seed_interval_hours)?;

    sqlx::query(
        "INSERT INTO scraper_configs (kind, interval_hours, is_enabled) \
         VALUES ($1, $2, true) \
         ON CONFLICT (kind) DO NOTHING",
    )
    .bind(kind.as_str())
    .bind(seed_interval_hours)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, ScraperConfigRow>(&format!(
        "SELECT {CONFIG_COLUMNS} FROM scraper_configs WHERE kind = $1"
    ))
    .bind(kind.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    row.try_into()
}

/// Lists every stored config, ordered by type.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::Decode`] for
/// a row with an unknown type.
pub async fn list_scraper_configs(pool: &PgPool) -> Result<Vec<ScraperConfig>, DbError> {
    let rows = sqlx::query_as::<_, ScraperConfigRow>(&format!(
        "SELECT {CONFIG_COLUMNS} FROM scraper_configs ORDER BY kind"
    ))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ScraperConfig::try_from).collect()
}

/// Applies an admin change. Intervals are validated before anything is
/// written; a missing row is first created with `seed_interval_hours`, the
/// same seed a run would use.
///
/// # Errors
///
/// - [`DbError::InvalidConfig`] if `update.interval_hours` or
///   `seed_interval_hours` is `<= 0`.
/// - [`DbError::Sqlx`] if a query fails.
pub async fn update_scraper_config(
    pool: &PgPool,
    kind: ScraperType,
    seed_interval_hours: i32,
    update: ConfigUpdate,
) -> Result<ScraperConfig, DbError> {
    if let Some(hours) = update.interval_hours {
        validate_interval_hours(hours)?;
    }
    get_or_create_scraper_config(pool, kind, seed_interval_hours).await?;

    let row = sqlx::query_as::<_, ScraperConfigRow>(&format!(
        "UPDATE scraper_configs \
         SET interval_hours = COALESCE($2, interval_hours), \
             is_enabled = COALESCE($3, is_enabled), \
             updated_at = NOW() \
         WHERE kind = $1 \
         RETURNING {CONFIG_COLUMNS}"
    ))
    .bind(kind.as_str())
    .bind(update.interval_hours)
    .bind(update.is_enabled)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    tracing::info!(
        source = %kind,
        interval_hours = row.interval_hours,
        is_enabled = row.is_enabled,
        "scraper config updated"
    );
    row.try_into()
}

/// Stores when `kind` last ran and when it is next due. `last_success`
/// moves to `last_run` only when `succeeded` is set.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no config row exists, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn record_run_times(
    pool: &PgPool,
    kind: ScraperType,
    last_run: DateTime<Utc>,
    next_run: DateTime<Utc>,
    succeeded: bool,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE scraper_configs \
         SET last_run = $2, \
             next_run = $3, \
             last_success = CASE WHEN $4 THEN $2 ELSE last_success END, \
             updated_at = NOW() \
         WHERE kind = $1",
    )
    .bind(kind.as_str())
    .bind(last_run)
    .bind(next_run)
    .bind(succeeded)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
