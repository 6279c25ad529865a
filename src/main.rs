use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pamyat::config::Config;
use pamyat::models::QueryType;

mod commands;

#[derive(Parser)]
#[command(
    name = "pamyat",
    version,
    about = "Pamyat Naroda photo archive ID harvester",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// TOML config file (environment variables are used otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: harvest names, collect ids by year and by name
    Run,

    /// Harvest person names from the alphabet directory
    Names {
        /// Output file (defaults to {data_dir}/other/names.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Collect ids for a single query type
    Ids {
        /// Query type (year, find)
        #[arg(short, long, default_value = "year")]
        query_type: String,

        /// Name list to query with (find only; defaults to the harvested file)
        #[arg(long)]
        names_file: Option<PathBuf>,
    },

    /// Report ledger statistics without touching the archive
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate()?;

    tracing::info!("pamyat archive collector starting");

    match cli.command {
        Commands::Run => {
            commands::run::run(config).await?;
        }

        Commands::Names { output } => {
            commands::names::names(config, output).await?;
        }

        Commands::Ids {
            query_type,
            names_file,
        } => {
            let query_type = QueryType::parse(&query_type).ok_or_else(|| {
                anyhow::anyhow!("Unknown query type: {query_type} (expected year or find)")
            })?;
            commands::ids::ids(config, query_type, names_file).await?;
        }

        Commands::Stats => {
            commands::stats::stats(config)?;
        }
    }

    tracing::info!("pamyat completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("pamyat=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("pamyat=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
