mod commands;
mod render;

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sentimon_client::{AggregatePeriod, ApiClient};
use sentimon_dashboard::DashboardOptions;

#[derive(Debug, Parser)]
#[command(name = "sentimon")]
#[command(about = "Live sentiment dashboard for the sentiment analysis platform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Mount the live dashboard and redraw on every change until Ctrl-C
    Watch {
        /// Number of recent posts to load (1-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: Option<u32>,

        /// Distribution look-back window in hours (1-168)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=168))]
        hours: Option<u32>,
    },
    /// Fetch the distribution and recent posts once and print them
    Snapshot {
        /// Number of recent posts to load (1-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: Option<u32>,

        /// Distribution look-back window in hours (1-168)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=168))]
        hours: Option<u32>,
    },
    /// Print the server-side sentiment trend over a recent window
    Trend {
        /// Bucket width
        #[arg(long, value_enum, default_value_t = PeriodArg::Hour)]
        period: PeriodArg,

        /// Look-back window in hours (1-168)
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..=168))]
        hours: u32,
    },
    /// Show backend health
    Health,
    /// Show processing metrics and model usage
    Metrics,
    /// List triggered sentiment alerts
    Alerts {
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: u32,

        /// Only show alerts of this type
        #[arg(long = "type")]
        alert_type: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PeriodArg {
    Minute,
    Hour,
    Day,
}

impl From<PeriodArg> for AggregatePeriod {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Minute => AggregatePeriod::Minute,
            PeriodArg::Hour => AggregatePeriod::Hour,
            PeriodArg::Day => AggregatePeriod::Day,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = sentimon_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, api_url = %config.api_url, "configuration loaded");

    let client = Arc::new(ApiClient::from_app_config(&config)?);
    let mut options = DashboardOptions::from_app_config(&config);

    match cli.command {
        Commands::Watch { limit, hours } => {
            apply_overrides(&mut options, limit, hours);
            commands::run_watch(client, options).await
        }
        Commands::Snapshot { limit, hours } => {
            apply_overrides(&mut options, limit, hours);
            commands::run_snapshot(&client, &options).await;
            Ok(())
        }
        Commands::Trend { period, hours } => {
            commands::run_trend(&client, period.into(), hours).await
        }
        Commands::Health => commands::run_health(&client).await,
        Commands::Metrics => commands::run_metrics(&client).await,
        Commands::Alerts { limit, alert_type } => {
            commands::run_alerts(&client, limit, alert_type.as_deref()).await
        }
    }
}

fn apply_overrides(options: &mut DashboardOptions, limit: Option<u32>, hours: Option<u32>) {
    if let Some(limit) = limit {
        options.posts_limit = limit;
    }
    if let Some(hours) = hours {
        options.distribution_hours = Some(hours);
    }
}
