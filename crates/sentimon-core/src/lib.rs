//! Domain types and pure view derivations for the sentimon dashboard.
//!
//! Everything in this crate is synchronous and side-effect free apart from
//! configuration loading, so the dashboard and CLI crates can share it.

pub mod app_config;
pub mod config;
pub mod posts;
pub mod sentiment;
pub mod status;
pub mod trend;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use posts::{Post, SentimentResult};
pub use sentiment::{
    compute_percentage_breakdown, PercentageBreakdown, SentimentDistribution, SentimentLabel,
};
pub use status::{ChannelLifecycle, ConnectionStatus};
pub use trend::{compute_trend_buckets, TrendBucket};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
