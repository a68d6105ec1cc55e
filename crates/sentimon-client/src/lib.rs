//! Clients for the sentiment platform's collaborator surfaces: the REST API
//! (distribution snapshot, posts, aggregate trend, health, metrics, alerts)
//! and the WebSocket push channel.

pub mod channel;
pub mod client;
pub mod error;
pub mod events;
pub mod types;

mod retry;

pub use channel::{ChannelSignal, PushChannel};
pub use client::ApiClient;
pub use error::ClientError;
pub use events::{ChannelEvent, LivePost, MetricsWindows, WindowCounts};
pub use types::{
    AggregateBucket, AggregatePeriod, AggregateReport, AggregateSummary, Alert, AlertsPage,
    DistributionSnapshot, HealthReport, LastHourMetrics, MetricsReport, MetricsTotals,
    ModelUsage, PostsPage,
};
