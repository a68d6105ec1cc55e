//! Response bodies of the sentiment REST API.

use serde::{Deserialize, Serialize};

use sentimon_core::{Post, SentimentDistribution};

/// Body of `GET /api/sentiment/distribution`.
///
/// The server also sends precomputed percentages; they are ignored in favour
/// of [`sentimon_core::compute_percentage_breakdown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSnapshot {
    pub timeframe_hours: u32,
    pub distribution: SentimentDistribution,
    #[serde(default)]
    pub total: u64,
}

/// Body of `GET /api/posts`, after per-post decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct PostsPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Raw `GET /api/posts` envelope; posts are decoded one at a time so a single
/// bad record does not sink the batch.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPostsPage {
    #[serde(default)]
    pub posts: Vec<serde_json::Value>,
    #[serde(default)]
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub redis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStats {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_analyses: u64,
    #[serde(default)]
    pub recent_posts_1h: u64,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `healthy`, `unhealthy`, or `degraded`.
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub services: ServiceStatus,
    #[serde(default)]
    pub stats: HealthStats,
}

impl HealthReport {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// A triggered sentiment threshold alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    pub alert_type: String,
    #[serde(default)]
    pub threshold_value: Option<f64>,
    #[serde(default)]
    pub actual_value: Option<f64>,
    #[serde(default)]
    pub window_start: Option<String>,
    #[serde(default)]
    pub window_end: Option<String>,
    #[serde(default)]
    pub post_count: Option<u64>,
    pub triggered_at: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Body of `GET /api/alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsPage {
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Bucket width for `GET /api/sentiment/aggregate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatePeriod {
    Minute,
    #[default]
    Hour,
    Day,
}

impl AggregatePeriod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AggregatePeriod::Minute => "minute",
            AggregatePeriod::Hour => "hour",
            AggregatePeriod::Day => "day",
        }
    }
}

impl std::fmt::Display for AggregatePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One time bucket of the server-side trend. Unlike the client-side hourly
/// trend, buckets are truncated timestamps, so different days stay apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub timestamp: String,
    #[serde(default)]
    pub positive_count: u64,
    #[serde(default)]
    pub negative_count: u64,
    #[serde(default)]
    pub neutral_count: u64,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub average_confidence: f64,
}

impl AggregateBucket {
    #[must_use]
    pub fn counts(&self) -> SentimentDistribution {
        SentimentDistribution::new(self.positive_count, self.negative_count, self.neutral_count)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSummary {
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub positive_total: u64,
    #[serde(default)]
    pub negative_total: u64,
    #[serde(default)]
    pub neutral_total: u64,
}

/// Body of `GET /api/sentiment/aggregate`.
///
/// Per-bucket percentages sent by the server are ignored; use
/// [`sentimon_core::compute_percentage_breakdown`] on [`AggregateBucket::counts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub period: AggregatePeriod,
    pub start_date: String,
    pub end_date: String,
    pub data: Vec<AggregateBucket>,
    #[serde(default)]
    pub summary: AggregateSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsTotals {
    #[serde(default)]
    pub posts: u64,
    #[serde(default)]
    pub analyses: u64,
    #[serde(default)]
    pub alerts: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LastHourMetrics {
    #[serde(default)]
    pub total_processed: u64,
    #[serde(default)]
    pub avg_confidence: f64,
    #[serde(default)]
    pub sentiment_breakdown: SentimentDistribution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    /// `None` for analyses stored without a model name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub usage_count: u64,
}

/// Body of `GET /api/metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub totals: MetricsTotals,
    pub last_hour: LastHourMetrics,
    #[serde(default)]
    pub models: Vec<ModelUsage>,
}
