//! Long-running scheduler.
//!
//! Every source type gets its own hourly job. A tick runs the source only
//! when its stored `next_run` has passed, so the cron expression sets the
//! polling resolution and the schedule policies set the actual run times.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tokio_util::sync::CancellationToken;
use townfeed_core::ScraperType;
use townfeed_pipeline::RunOutcome;

use crate::LivePipeline;

/// Top of every hour.
const TICK_CRON: &str = "0 0 * * * *";

/// Runs `kind` if it is due. Errors are logged; the next tick retries.
async fn tick(pipeline: &LivePipeline, kind: ScraperType) {
    match pipeline.run_if_due(kind, Utc::now()).await {
        Ok(None) => {}
        Ok(Some(RunOutcome::Skipped(reason))) => {
            tracing::info!(source = %kind, %reason, "scheduler: due source skipped");
        }
        Ok(Some(RunOutcome::Completed(summary))) => {
            tracing::info!(
                source = %kind,
                new = summary.new,
                updated = summary.updated,
                errors = summary.errors.len(),
                "scheduler: run complete"
            );
        }
        Err(e) => tracing::error!(source = %kind, error = %e, "scheduler: run failed"),
    }
}

/// Registers the hourly job for `kind`. A tick that fires while the previous
/// run of the same source is still going is dropped.
async fn register_source_job(
    scheduler: &JobScheduler,
    pipeline: Arc<LivePipeline>,
    kind: ScraperType,
) -> Result<(), JobSchedulerError> {
    let busy = Arc::new(Mutex::new(()));

    let job = Job::new_async(TICK_CRON, move |_uuid, _lock| {
        let pipeline = Arc::clone(&pipeline);
        let busy = Arc::clone(&busy);

        Box::pin(async move {
            let Ok(_guard) = busy.try_lock() else {
                tracing::warn!(source = %kind, "scheduler: previous run still in progress; skipping tick");
                return;
            };
            tick(&pipeline, kind).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(source = %kind, cron = TICK_CRON, "scheduler: registered source job");
    Ok(())
}

/// Catches up overdue sources, then ticks hourly until `cancel` fires.
///
/// # Errors
///
/// Returns an error if the scheduler cannot be built, started or shut down.
pub(crate) async fn run_daemon(
    pipeline: LivePipeline,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let pipeline = Arc::new(pipeline);
    let kinds = pipeline.configured_kinds();
    if kinds.is_empty() {
        anyhow::bail!("no sources configured; nothing to schedule");
    }

    for kind in &kinds {
        if cancel.is_cancelled() {
            return Ok(());
        }
        tick(&pipeline, *kind).await;
    }

    let mut scheduler = JobScheduler::new().await?;
    for kind in &kinds {
        register_source_job(&scheduler, Arc::clone(&pipeline), *kind).await?;
    }
    scheduler.start().await?;
    tracing::info!(sources = kinds.len(), "scheduler: started");

    cancel.cancelled().await;
    tracing::info!("scheduler: shutting down");
    scheduler.shutdown().await?;
    Ok(())
}
