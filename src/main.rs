use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pantry_ingest::config::{Config, StoreBackend};
use pantry_ingest::logging;
use pantry_ingest::normalize::RowNormalizer;
use pantry_ingest::report::Reporter;
use pantry_ingest::source::Source;
use pantry_ingest::{storage, Pipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "pantry_ingest")]
#[command(about = "Import a pantry inventory CSV export into storage")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to pantry.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize every row and write it to storage
    Import {
        /// CSV file to import
        #[arg(long)]
        file: Option<PathBuf>,
        /// Storage backend: memory or libsql
        #[arg(long)]
        store: Option<StoreBackend>,
        /// Local database file for the libsql store
        #[arg(long)]
        database: Option<PathBuf>,
        /// Two-digit years below this are read as 20YY, the rest as 19YY
        #[arg(long)]
        year_pivot: Option<u32>,
    },
    /// Normalize every row and report problems without writing anything
    Check {
        /// CSV file to check
        #[arg(long)]
        file: Option<PathBuf>,
        /// Two-digit years below this are read as 20YY, the rest as 19YY
        #[arg(long)]
        year_pivot: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Import {
            file,
            store,
            database,
            year_pivot,
        } => {
            if let Some(file) = file {
                config.source.path = file;
            }
            if let Some(store) = store {
                config.store.backend = store;
            }
            if let Some(database) = database {
                config.store.database_path = database;
            }
            if let Some(pivot) = year_pivot {
                config.normalize.two_digit_year_pivot = pivot;
            }
            config.validate()?;

            let storage = storage::open(&config.store)
                .await
                .context("Failed to open storage")?;
            let normalizer = RowNormalizer::new(config.normalize.two_digit_year_pivot);
            let mut reporter = Reporter::stdout();

            match Pipeline::run(
                Source::path(&config.source.path),
                storage,
                normalizer,
                &mut reporter,
            )
            .await
            {
                Ok(outcome) => {
                    info!(
                        imported = outcome.success_count,
                        errors = outcome.error_count,
                        skipped = outcome.skip_count(),
                        "Import completed"
                    );
                    println!("✅ Import completed!");
                }
                // Already logged and reported by the pipeline
                Err(_) => return Ok(ExitCode::FAILURE),
            }
        }
        Commands::Check { file, year_pivot } => {
            if let Some(file) = file {
                config.source.path = file;
            }
            if let Some(pivot) = year_pivot {
                config.normalize.two_digit_year_pivot = pivot;
            }
            config.validate()?;

            let normalizer = RowNormalizer::new(config.normalize.two_digit_year_pivot);
            let mut reporter = Reporter::stdout();
            Pipeline::check(Source::path(&config.source.path), normalizer, &mut reporter)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
