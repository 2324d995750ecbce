mod ambee;
mod refresh;
mod render;
mod watch;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::render::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "volcwatch")]
#[command(about = "Volcano alert status from the USGS HANS and Ambee APIs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, reconcile, and print the current volcano set once
    Refresh {
        /// Skip the monitored list and show elevated volcanoes only
        #[arg(long)]
        elevated_only: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Refresh on a fixed interval until interrupted
    Watch {
        /// Seconds between refreshes (defaults to VOLCWATCH_REFRESH_INTERVAL_SECS)
        #[arg(long)]
        interval_secs: Option<u64>,
        #[arg(long)]
        elevated_only: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show volcano events from the Ambee disasters feed
    Ambee {
        /// ISO-3 country code (defaults to VOLCWATCH_AMBEE_COUNTRY)
        #[arg(long)]
        country: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: u32,
        /// Include active, non-erupting volcanoes
        #[arg(long)]
        all: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print the effective configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = volcwatch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Refresh {
            elevated_only,
            format,
        }) => refresh::run_refresh(&config, !elevated_only, format).await?,
        Some(Commands::Watch {
            interval_secs,
            elevated_only,
            format,
        }) => {
            let interval = interval_secs.unwrap_or(config.refresh_interval_secs);
            watch::run_watch(config, interval, !elevated_only, format).await?;
        }
        Some(Commands::Ambee {
            country,
            limit,
            all,
            format,
        }) => {
            let country = country.unwrap_or_else(|| config.ambee_country.clone());
            ambee::run_ambee(&config, &country, limit, all, format).await?;
        }
        Some(Commands::Config) => println!("{config:#?}"),
        None => println!("volcwatch: run `volcwatch --help` for commands"),
    }

    Ok(())
}
