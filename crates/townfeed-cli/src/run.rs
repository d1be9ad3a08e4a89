//! `run` command handler.

use tokio_util::sync::CancellationToken;
use townfeed_core::ScraperType;
use townfeed_pipeline::{RunOptions, RunOutcome};

use crate::LivePipeline;

/// Runs each source in turn, stopping before the next one once `cancel`
/// fires. A failing source is reported and the rest still run.
///
/// # Errors
///
/// Returns an error naming the failed sources if any run failed.
pub(crate) async fn run_sources(
    pipeline: &LivePipeline,
    kinds: &[ScraperType],
    options: RunOptions,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let mut failed: Vec<ScraperType> = Vec::new();

    for kind in kinds {
        if cancel.is_cancelled() {
            println!("interrupted; not starting {kind}");
            break;
        }

        match pipeline.run(*kind, options).await {
            Ok(RunOutcome::Skipped(reason)) => println!("{kind}: skipped ({reason})"),
            Ok(RunOutcome::Completed(summary)) => {
                println!(
                    "{kind}: {} found, {} new, {} updated, {} unchanged",
                    summary.total, summary.new, summary.updated, summary.unchanged
                );
                if summary.seed_cleared > 0 {
                    println!("  cleared {} seed record(s)", summary.seed_cleared);
                }
                for error in &summary.errors {
                    println!("  error: {error}");
                }
            }
            Err(e) => {
                eprintln!("{kind}: run failed: {e}");
                failed.push(*kind);
            }
        }
    }

    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|k| k.as_str()).collect();
        anyhow::bail!("{} source(s) failed: {}", failed.len(), names.join(", "));
    }
    Ok(())
}
