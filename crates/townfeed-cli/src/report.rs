//! Read-only `status` and `logs` handlers.

use chrono::{DateTime, Utc};
use townfeed_core::ScraperType;

use crate::LivePipeline;

fn fmt_time(instant: Option<DateTime<Utc>>) -> String {
    instant.map_or_else(
        || "never".to_string(),
        |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

/// Prints last run, next run and countdown for one or every configured source.
///
/// # Errors
///
/// Returns an error if a source is not configured or its config cannot be read.
pub(crate) async fn run_status(
    pipeline: &LivePipeline,
    kind: Option<ScraperType>,
) -> anyhow::Result<()> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => pipeline.configured_kinds(),
    };

    println!(
        "{:<12}{:<22}{:<22}{:<10}STATUS",
        "SOURCE", "LAST RUN", "NEXT RUN", "INTERVAL"
    );
    for kind in kinds {
        let status = pipeline.status(kind).await?;
        let interval = format!("{}h", status.interval_hours);
        println!(
            "{:<12}{:<22}{:<22}{interval:<10}{}",
            kind.as_str(),
            fmt_time(status.last_run),
            fmt_time(Some(status.next_scheduled)),
            status.state
        );
    }
    Ok(())
}

/// Prints the retained run logs for `kind`, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub(crate) async fn run_logs(
    pool: &sqlx::PgPool,
    kind: ScraperType,
    limit: i64,
) -> anyhow::Result<()> {
    let logs = townfeed_db::list_run_logs(pool, kind, limit).await?;
    if logs.is_empty() {
        println!("no run logs for {kind}; run `townfeed run {kind}` first");
        return Ok(());
    }

    println!(
        "{:<22}{:<9}{:<8}{:<10}MESSAGE",
        "WHEN", "STATUS", "ITEMS", "DURATION"
    );
    for log in &logs {
        let duration = format!("{}ms", log.duration_ms);
        println!(
            "{:<22}{:<9}{:<8}{duration:<10}{}",
            fmt_time(Some(log.created_at)),
            log.status,
            log.items_processed,
            log.message
        );
        for error in &log.error_messages {
            println!("{:<49}- {error}", "");
        }
    }
    Ok(())
}
