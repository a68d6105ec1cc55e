//! The dashboard's state and the reducer that applies events to it.

use chrono::{DateTime, Utc};

use sentimon_client::{ChannelSignal, ClientError};
use sentimon_core::{
    compute_percentage_breakdown, compute_trend_buckets, ChannelLifecycle, ConnectionStatus,
    PercentageBreakdown, Post, SentimentDistribution, TrendBucket,
};

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub distribution: SentimentDistribution,
    /// Always derived from `distribution`.
    pub breakdown: PercentageBreakdown,
    pub posts: Vec<Post>,
    /// Always derived from `posts`.
    pub trend: Vec<TrendBucket>,
    pub status: ConnectionStatus,
    /// Wall-clock time of the last push channel message.
    pub last_update: Option<DateTime<Utc>>,
    /// Error from the most recent failed distribution fetch, cleared on success.
    pub distribution_error: Option<String>,
    /// Error from the most recent failed posts fetch, cleared on success.
    pub posts_error: Option<String>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            distribution: SentimentDistribution::default(),
            breakdown: PercentageBreakdown::NoData,
            posts: Vec::new(),
            trend: Vec::new(),
            status: ConnectionStatus::Connecting,
            last_update: None,
            distribution_error: None,
            posts_error: None,
        }
    }
}

/// A completion delivered to the event loop.
#[derive(Debug)]
pub enum DashboardEvent {
    Distribution(Result<SentimentDistribution, ClientError>),
    Posts(Result<Vec<Post>, ClientError>),
    Channel(ChannelSignal),
}

#[derive(Debug, Default)]
pub struct DashboardState {
    view: DashboardView,
}

impl DashboardState {
    #[must_use]
    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Applies one event. Returns `true` if the view changed.
    ///
    /// REST results replace their slice of state wholesale and never touch
    /// the connection status; channel signals only touch the status and the
    /// last-update time.
    pub fn apply(&mut self, event: DashboardEvent, now: DateTime<Utc>) -> bool {
        match event {
            DashboardEvent::Distribution(Ok(distribution)) => {
                tracing::debug!(total = distribution.total(), "distribution snapshot received");
                self.view.distribution = distribution;
                self.view.breakdown = compute_percentage_breakdown(&distribution);
                self.view.distribution_error = None;
                true
            }
            DashboardEvent::Distribution(Err(e)) => {
                tracing::warn!(error = %e, "distribution fetch failed, keeping previous snapshot");
                self.view.distribution_error = Some(e.to_string());
                true
            }
            DashboardEvent::Posts(Ok(posts)) => {
                tracing::debug!(count = posts.len(), "post batch received");
                self.view.trend = compute_trend_buckets(&posts);
                self.view.posts = posts;
                self.view.posts_error = None;
                true
            }
            DashboardEvent::Posts(Err(e)) => {
                tracing::warn!(error = %e, "posts fetch failed, keeping previous batch");
                self.view.posts_error = Some(e.to_string());
                true
            }
            DashboardEvent::Channel(signal) => self.apply_channel(signal, now),
        }
    }

    fn apply_channel(&mut self, signal: ChannelSignal, now: DateTime<Utc>) -> bool {
        if self.view.status == ConnectionStatus::Disconnected {
            tracing::debug!(?signal, "ignoring channel signal after disconnect");
            return false;
        }

        match signal {
            ChannelSignal::Message(event) => {
                tracing::debug!(kind = event.kind(), "push channel message");
                self.view.status = self.view.status.transition(ChannelLifecycle::Message);
                self.view.last_update = Some(now);
                true
            }
            ChannelSignal::Malformed(reason) => {
                tracing::warn!(%reason, "ignoring malformed push channel frame");
                false
            }
            ChannelSignal::Error(reason) => {
                tracing::warn!(%reason, "push channel error");
                self.view.status = self.view.status.transition(ChannelLifecycle::Error);
                true
            }
            ChannelSignal::Closed => {
                tracing::info!("push channel closed");
                self.view.status = self.view.status.transition(ChannelLifecycle::Close);
                true
            }
        }
    }
}
