mod admin;
mod daemon;
mod report;
mod run;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use townfeed_core::ScraperType;
use townfeed_pipeline::{PgStore, Pipeline};
use townfeed_scraper::HttpFetcher;
use tracing_subscriber::EnvFilter;

use crate::admin::ConfigCommands;

pub(crate) type LivePipeline = Pipeline<HttpFetcher, PgStore>;

#[derive(Debug, Parser)]
#[command(name = "townfeed")]
#[command(about = "Scrape local business, event and news listings into Postgres")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one source now, or every configured source with --all
    Run {
        /// Source type: businesses, events or news
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        kind: Option<ScraperType>,
        /// Run every configured source in turn
        #[arg(long)]
        all: bool,
        /// Ignore the enabled flag and the minimum interval
        #[arg(long)]
        force: bool,
        /// Delete placeholder records before storing
        #[arg(long)]
        clear_seed: bool,
    },
    /// Show last and next run for each source
    Status {
        /// Restrict to one source type
        kind: Option<ScraperType>,
    },
    /// List retained run logs for a source
    Logs {
        kind: ScraperType,
        /// Maximum number of logs to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Show or change scraper configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run due sources on an hourly schedule until interrupted
    Daemon,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("townfeed: no command given; see `townfeed --help`");
        return Ok(());
    };

    let config = townfeed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = townfeed_db::PoolConfig::from_app_config(&config);
    let pool = townfeed_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Migrate => {
                let applied = townfeed_db::run_migrations(&pool).await?;
                println!("applied {applied} migration(s)");
            }
            DbCommands::Ping => {
                townfeed_db::ping(&pool).await?;
                println!("database reachable");
            }
        },
        Commands::Config { command } => {
            let sources = townfeed_core::load_sources(&config.sources_path)?;
            admin::run_config(&pool, &sources, command).await?;
        }
        Commands::Logs { kind, limit } => report::run_logs(&pool, kind, limit).await?,
        Commands::Status { kind } => {
            let pipeline = build_pipeline(&config, pool)?;
            report::run_status(&pipeline, kind).await?;
        }
        Commands::Run {
            kind,
            all,
            force,
            clear_seed,
        } => {
            let pipeline = build_pipeline(&config, pool)?;
            let kinds = if all {
                pipeline.configured_kinds()
            } else {
                kind.into_iter().collect()
            };
            let cancel = cancel_on_ctrl_c();
            let options = townfeed_pipeline::RunOptions { force, clear_seed };
            run::run_sources(&pipeline, &kinds, options, &cancel).await?;
        }
        Commands::Daemon => {
            let pipeline = build_pipeline(&config, pool)?;
            daemon::run_daemon(pipeline, cancel_on_ctrl_c()).await?;
        }
    }

    Ok(())
}

fn build_pipeline(
    config: &townfeed_core::AppConfig,
    pool: sqlx::PgPool,
) -> anyhow::Result<LivePipeline> {
    let sources = townfeed_core::load_sources(&config.sources_path)?;
    let fetcher = HttpFetcher::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP fetcher: {e}"))?;
    Ok(Pipeline::new(fetcher, PgStore::new(pool), sources))
}

/// A token cancelled on the first Ctrl-C. Work in progress finishes; the
/// caller checks the token between sources.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let child = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; stopping after the current source");
            child.cancel();
        }
    });
    cancel
}
